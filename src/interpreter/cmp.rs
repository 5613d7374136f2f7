//! Comparison-and-branch and the standalone `JMP` (spec §4.3, §4.8).
//!
//! Every comparison opcode is always immediately followed by a `JMP`
//! instruction word; the comparison handler reads that following word's
//! branch offset itself rather than letting the dispatch loop decode it as
//! a separate step, since whether the branch is taken changes what `pc`
//! becomes but never whether the `JMP` word is consumed.

use crate::bytecode::{Instruction, Opcode};
use crate::error::Fault;
use crate::heap::Heap;
use crate::interpreter::{ExecuteState, Interpreter};
use crate::word::RegisterId;

/// `ISLT/ISGE/ISLE/ISGT/ISEQ/ISNE A, D` (spec §4.3): compare `base[A]` and
/// `base[D]`, then take or skip the following `JMP`'s offset.
pub fn exec_cmp<H: Heap>(interp: &mut Interpreter<H>, opcode: Opcode, ins: Instruction) -> Result<ExecuteState, Fault> {
    let pc = interp.thread.pc;
    let lhs = interp.thread.reg(ins.a());
    let rhs = interp.thread.reg(ins.d() as RegisterId);

    let holds = match opcode {
        Opcode::IsLt => lhs < rhs,
        Opcode::IsGe => lhs >= rhs,
        Opcode::IsLe => lhs <= rhs,
        Opcode::IsGt => lhs > rhs,
        Opcode::IsEq => lhs == rhs,
        Opcode::IsNe => lhs != rhs,
        _ => unreachable!("exec_cmp dispatched for a non-comparison opcode"),
    };

    let jmp = interp.fetch_at(pc + 1)?;
    let pc_after_jmp = pc + 2;
    interp.thread.pc = if holds {
        (pc_after_jmp as i64 + jmp.j() as i64) as usize
    } else {
        pc_after_jmp
    };
    Ok(ExecuteState::Proceed)
}

/// `JMP`: `pc += J`, offset relative to the instruction after the branch
/// (spec §4.8). `JMP 0` is a no-op forward step.
pub fn exec_jmp<H: Heap>(interp: &mut Interpreter<H>, ins: Instruction) -> Result<ExecuteState, Fault> {
    let pc_after = interp.thread.pc + 1;
    interp.thread.pc = (pc_after as i64 + ins.j() as i64) as usize;
    Ok(ExecuteState::Proceed)
}
