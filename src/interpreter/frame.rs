//! Call, tail-call and return: the ordinary (non-thunk) frame discipline
//! (spec §4.6).

use tracing::debug;

use crate::bytecode::{Instruction, PayloadReader};
use crate::closure::ClosureRef;
use crate::error::{Fault, MAX_CALLT_ARGS};
use crate::heap::Heap;
use crate::info_table::ClosureKind;
use crate::interpreter::{ExecuteState, Interpreter};
use crate::thread::STOP_PC;
use crate::word::RegisterId;

/// Checks `nargs == info.arity`, raising `UnimplementedArity` on mismatch —
/// partial/over-application is deferred to a future collaborator (spec §9).
fn check_arity(expected: usize, got: usize) -> Result<(), Fault> {
    if expected != got {
        return Err(Fault::UnimplementedArity { expected, got });
    }
    Ok(())
}

/// `CALL A, B(=arg0-reg), C(=nargs)`: push a new call frame at `top` and
/// transfer control into the callee's code (spec §4.6).
pub fn exec_call<H: Heap>(interp: &mut Interpreter<H>, ins: Instruction) -> Result<ExecuteState, Fault> {
    let pc = interp.thread.pc;
    let fnode = interp.thread.reg(ins.a()) as ClosureRef;
    let arg0 = interp.thread.reg(ins.b());
    let nargs = ins.c() as usize;

    let info = interp.heap.info_table(interp.heap.info_of(fnode));
    if info.kind != ClosureKind::Fun {
        return Err(Fault::UnimplementedOp);
    }
    let code = info.code.as_ref().ok_or(Fault::UnimplementedOp)?;
    check_arity(code.arity, nargs)?;
    let framesize = code.framesize;

    // Payload: one live-out pointer-mask word, then `nargs - 1` argument
    // register bytes packed and rounded to whole instruction words.
    let instrs = interp.instrs()?;
    let mut reader = PayloadReader::new(instrs, pc + 1);
    reader.skip_bitmap().ok_or(Fault::TruncatedStream(pc))?;
    let arg_bytes = if nargs > 0 {
        reader.read_bytes(nargs - 1).ok_or(Fault::TruncatedStream(pc))?
    } else {
        Vec::new()
    };
    let return_pc = reader.pos();

    let old_top = interp.thread.top;
    let new_base = old_top + 3;
    let new_top = new_base + framesize;
    interp.thread.check_extend(new_top)?;

    let saved_base = interp.thread.base as crate::word::Word;
    interp.thread.stack[old_top] = saved_base;
    interp.thread.stack[old_top + 1] = return_pc as crate::word::Word;
    interp.thread.stack[old_top + 2] = fnode as crate::word::Word;
    interp.thread.stack[old_top + 3] = arg0;
    for (i, &r) in arg_bytes.iter().enumerate() {
        let v = interp.thread.reg(r);
        interp.thread.stack[old_top + 4 + i] = v;
    }

    debug!(fnode, nargs, framesize, "call");

    interp.thread.base = new_base;
    interp.thread.top = new_top;
    interp.thread.pc = 0;
    Ok(ExecuteState::Proceed)
}

/// `CALLT A, B(=nargs), C(=arg0-reg)`: reuse the current frame, overwriting
/// its register window with the callee's arguments (spec §4.6).
pub fn exec_callt<H: Heap>(interp: &mut Interpreter<H>, ins: Instruction) -> Result<ExecuteState, Fault> {
    let pc = interp.thread.pc;
    let fnode = interp.thread.reg(ins.a()) as ClosureRef;
    let nargs = ins.b() as usize;
    let arg0_reg = ins.c();

    let info = interp.heap.info_table(interp.heap.info_of(fnode));
    if info.kind != ClosureKind::Fun {
        return Err(Fault::UnimplementedOp);
    }
    let code = info.code.as_ref().ok_or(Fault::UnimplementedOp)?;
    check_arity(code.arity, nargs)?;
    if nargs > MAX_CALLT_ARGS + 1 {
        return Err(Fault::TooManyCalltArgs { got: nargs });
    }
    let framesize = code.framesize;

    let arg0 = interp.thread.reg(arg0_reg);

    // Copy arguments aside before writing any of them back, so that an
    // argument register and a destination register can safely alias (spec
    // §4.6: "Copy arguments aside (to avoid aliasing)").
    let mut temp = Vec::with_capacity(nargs.saturating_sub(1));
    if nargs > 0 {
        let instrs = interp.instrs()?;
        let mut reader = PayloadReader::new(instrs, pc + 1);
        let regs = reader.read_bytes(nargs - 1).ok_or(Fault::TruncatedStream(pc))?;
        for r in regs {
            temp.push(interp.thread.reg(r));
        }
    }

    let cur_framesize = interp.thread.top - interp.thread.base;
    if framesize > cur_framesize {
        let new_top = interp.thread.base + framesize;
        interp.thread.check_extend(new_top)?;
        interp.thread.top = new_top;
    }

    interp.thread.set_reg(0, arg0);
    for (i, v) in temp.into_iter().enumerate() {
        interp.thread.set_reg((i + 1) as RegisterId, v);
    }

    debug!(fnode, nargs, framesize, "callt");

    interp.thread.pc = 0;
    Ok(ExecuteState::Proceed)
}

/// `RET1 A`: stash `base[A]` as `last_result`, then run the common return
/// sequence (spec §4.6).
pub fn exec_ret1<H: Heap>(interp: &mut Interpreter<H>, ins: Instruction) -> Result<ExecuteState, Fault> {
    let result = interp.thread.reg(ins.a());
    interp.thread.last_result = result;
    common_return(interp)
}

/// The return sequence shared by `RET1` and `UPDATE`: pop the call frame,
/// and either resume the caller or, if the caller was the synthetic entry
/// frame (`saved_return_pc == STOP_PC`), halt (spec §3, "Lifecycle"; §4.6).
pub(super) fn common_return<H: Heap>(interp: &mut Interpreter<H>) -> Result<ExecuteState, Fault> {
    let base = interp.thread.base;
    let saved_return_pc = interp.thread.saved_return_pc();
    let saved_base = interp.thread.saved_base();

    interp.thread.top = base - 3;

    if saved_return_pc == STOP_PC {
        return Ok(ExecuteState::Halted(interp.thread.last_result));
    }

    interp.thread.pc = saved_return_pc as usize;
    interp.thread.base = saved_base as usize;
    Ok(ExecuteState::Proceed)
}
