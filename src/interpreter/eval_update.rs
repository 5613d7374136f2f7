//! Lazy evaluation: `EVAL` forces a thunk through a call frame stacked under
//! a synthetic update frame; `UPDATE` folds the result back into the thunk
//! as an indirection (spec §4.7).

use tracing::debug;

use crate::bytecode::Instruction;
use crate::closure::ClosureRef;
use crate::consts::{CALL_FRAME_WORDS, UPDATE_FRAME_WORDS};
use crate::error::Fault;
use crate::heap::{rewrite_as_indirection, Heap};
use crate::interpreter::frame::common_return;
use crate::interpreter::{ExecuteState, Interpreter};
use crate::word::RegisterId;

/// `EVAL A` (spec §4.7). The `closure_HNF` fast path is a no-op; otherwise
/// pushes a call frame for the thunk immediately below a synthetic update
/// frame, so that the thunk's own `RET1` returns into `UPDATE` instead of
/// the caller.
///
/// The 8-word push (`CALL_FRAME_WORDS` + `UPDATE_FRAME_WORDS`) matches the
/// original source's `STACK_FRAME_SIZEW + UPDATE_FRAME_SIZEW` exactly; see
/// `DESIGN.md` for why this overrides `spec.md`'s prose value of `top + 6`.
pub fn exec_eval<H: Heap>(interp: &mut Interpreter<H>, ins: Instruction) -> Result<ExecuteState, Fault> {
    let pc = interp.thread.pc;
    let t = interp.thread.reg(ins.a()) as ClosureRef;

    if interp.heap.is_hnf(t) {
        interp.thread.last_result = t as crate::word::Word;
        interp.thread.pc = pc + 2; // skip the instruction and its live-out bitmap
        return Ok(ExecuteState::Proceed);
    }

    let info = interp.heap.info_table(interp.heap.info_of(t));
    let code = info.code.as_ref().ok_or(Fault::UnimplementedOp)?;
    let framesize = code.framesize;

    let return_pc = pc + 2; // after EVAL and its live-out bitmap
    let old_top = interp.thread.top;
    let new_base = old_top + CALL_FRAME_WORDS + UPDATE_FRAME_WORDS;
    let new_top = new_base + framesize;
    interp.thread.check_extend(new_top)?;

    let saved_base = interp.thread.base as crate::word::Word;
    let upd_closure = interp.heap.upd_closure() as crate::word::Word;
    let upd_return_pc = interp.heap.upd_return_pc() as crate::word::Word;

    interp.thread.stack[old_top] = saved_base;
    interp.thread.stack[old_top + 1] = return_pc as crate::word::Word;
    interp.thread.stack[old_top + 2] = upd_closure;
    interp.thread.stack[old_top + 3] = t as crate::word::Word; // update frame reg0: thunk
    interp.thread.stack[old_top + 4] = 0; // update frame reg1: reserved for the result
    interp.thread.stack[old_top + 5] = (old_top + 3) as crate::word::Word; // update frame's own base
    interp.thread.stack[old_top + 6] = upd_return_pc;
    interp.thread.stack[old_top + 7] = t as crate::word::Word; // Node for the thunk's own frame

    debug!(thunk = t, framesize, "eval: entering thunk");

    interp.thread.base = new_base;
    interp.thread.top = new_top;
    interp.thread.pc = 0;
    Ok(ExecuteState::Proceed)
}

/// `UPDATE A, D`: rewrite `base[A]` as an indirection to `base[D]`, then run
/// the common return sequence (spec §4.7).
pub fn exec_update<H: Heap>(interp: &mut Interpreter<H>, ins: Instruction) -> Result<ExecuteState, Fault> {
    let oldnode = interp.thread.reg(ins.a()) as ClosureRef;
    let newnode = interp.thread.reg(ins.d() as RegisterId) as ClosureRef;

    rewrite_as_indirection(&mut interp.heap, oldnode, newnode);
    debug!(oldnode, newnode, "update: thunk rewritten as indirection");

    interp.thread.last_result = newnode as crate::word::Word;
    common_return(interp)
}
