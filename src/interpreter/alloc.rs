//! Allocation ops (spec §4.4): `ALLOC1`, `ALLOC`, and `NEW_INT`'s
//! small-integer boxing. `ALLOCAP` (partial-application nodes) is
//! unimplemented in the core and handled directly in the dispatch loop.

use crate::bytecode::{Instruction, PayloadReader};
use crate::closure::{ClosureRef, InfoRef};
use crate::error::Fault;
use crate::heap::Heap;
use crate::interpreter::{ExecuteState, Interpreter};
use crate::word::RegisterId;

/// `NEW_INT A, C`: box the integer held in register `C`. Small values
/// (`-128..=127`) resolve to the shared `smallInt` cache; others allocate a
/// fresh `Izh_con_info` closure (spec §6). Per end-to-end scenario 1 (spec
/// §8), the register holding the value to box is itself encoded in the
/// instruction's `D` field (e.g. `NEW_INT r0, r0`), not an immediate.
pub fn exec_new_int<H: Heap>(interp: &mut Interpreter<H>, ins: Instruction) -> Result<ExecuteState, Fault> {
    let v = interp.thread.reg(ins.d() as RegisterId);
    let boxed = interp.heap.new_int(v);
    interp.thread.set_reg(ins.a(), boxed as crate::word::Word);
    interp.thread.pc += 1;
    Ok(ExecuteState::Proceed)
}

/// `ALLOC1 A, B, C`: allocate a header-plus-one-word closure, followed by an
/// inline liveness bitmap (spec §4.4).
pub fn exec_alloc1<H: Heap>(interp: &mut Interpreter<H>, ins: Instruction) -> Result<ExecuteState, Fault> {
    let pc = interp.thread.pc;
    let info = interp.thread.reg(ins.b()) as InfoRef;
    let payload0 = interp.thread.reg(ins.c());

    let cl = interp.heap.allocate(info, vec![payload0]);
    interp.thread.set_reg(ins.a(), cl as crate::word::Word);

    let instrs = interp.instrs()?;
    let mut reader = PayloadReader::new(instrs, pc + 1);
    reader.skip_bitmap().ok_or(Fault::TruncatedStream(pc))?;
    interp.thread.pc = reader.pos();
    Ok(ExecuteState::Proceed)
}

/// `ALLOC A, B, C, args…`: allocate a header-plus-`C`-word closure whose
/// payload is read from the argument registers following the instruction,
/// packed as a byte list rounded to whole instruction words, then one
/// liveness bitmap (spec §4.4).
pub fn exec_alloc<H: Heap>(interp: &mut Interpreter<H>, ins: Instruction) -> Result<ExecuteState, Fault> {
    let pc = interp.thread.pc;
    let info = interp.thread.reg(ins.b()) as InfoRef;
    let nargs = ins.c() as usize;

    let instrs = interp.instrs()?;
    let mut reader = PayloadReader::new(instrs, pc + 1);
    let arg_regs = reader.read_bytes(nargs).ok_or(Fault::TruncatedStream(pc))?;
    reader.skip_bitmap().ok_or(Fault::TruncatedStream(pc))?;

    let payload: Vec<crate::word::Word> = arg_regs.iter().map(|&r| interp.thread.reg(r)).collect();
    let cl: ClosureRef = interp.heap.allocate(info, payload);
    interp.thread.set_reg(ins.a(), cl as crate::word::Word);

    interp.thread.pc = reader.pos();
    Ok(ExecuteState::Proceed)
}
