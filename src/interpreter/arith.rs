//! Arithmetic and logical ops (spec §4.2): `ADDRR`/`SUBRR`/`MULRR`/`DIVRR`/
//! `REMRR`, `NOT`/`NEG`, and the `KINT` immediate load.

use crate::bytecode::{Instruction, Opcode};
use crate::error::Fault;
use crate::heap::Heap;
use crate::interpreter::{ExecuteState, Interpreter};
use crate::word::RegisterId;

/// `NOT, NEG A, D`: bitwise complement / signed negation of `base[D]` into
/// `base[A]` (spec §4.2).
pub fn exec_unary<H: Heap>(interp: &mut Interpreter<H>, opcode: Opcode, ins: Instruction) -> Result<ExecuteState, Fault> {
    let src = interp.thread.reg(ins.d() as RegisterId);
    let result = match opcode {
        Opcode::Not => !src,
        Opcode::Neg => src.wrapping_neg(),
        _ => unreachable!("exec_unary dispatched for a non-unary opcode"),
    };
    interp.thread.set_reg(ins.a(), result);
    interp.thread.pc += 1;
    Ok(ExecuteState::Proceed)
}

/// `ADDRR/SUBRR/MULRR/DIVRR/REMRR A, B, C`: signed word arithmetic on
/// `base[B]` and `base[C]` into `base[A]` (spec §4.2). A zero divisor for
/// `DIVRR`/`REMRR` raises [`Fault::DivideByZero`] rather than the original
/// source's silent no-op — the redesign direction spec §9's open question
/// points to (see `DESIGN.md`).
pub fn exec_binary<H: Heap>(interp: &mut Interpreter<H>, opcode: Opcode, ins: Instruction) -> Result<ExecuteState, Fault> {
    let lhs = interp.thread.reg(ins.b());
    let rhs = interp.thread.reg(ins.c());

    let result = match opcode {
        Opcode::AddRR => lhs.wrapping_add(rhs),
        Opcode::SubRR => lhs.wrapping_sub(rhs),
        Opcode::MulRR => lhs.wrapping_mul(rhs),
        Opcode::DivRR => {
            if rhs == 0 {
                return Err(Fault::DivideByZero);
            }
            lhs.wrapping_div(rhs)
        }
        Opcode::RemRR => {
            if rhs == 0 {
                return Err(Fault::DivideByZero);
            }
            lhs.wrapping_rem(rhs)
        }
        _ => unreachable!("exec_binary dispatched for a non-binary opcode"),
    };

    interp.thread.set_reg(ins.a(), result);
    interp.thread.pc += 1;
    Ok(ExecuteState::Proceed)
}

/// `KINT A, SD`: write the sign-extended 16-bit literal `SD` into `base[A]`
/// (spec §4.2).
pub fn exec_kint<H: Heap>(interp: &mut Interpreter<H>, ins: Instruction) -> Result<ExecuteState, Fault> {
    interp.thread.set_reg(ins.a(), ins.sd() as crate::word::Word);
    interp.thread.pc += 1;
    Ok(ExecuteState::Proceed)
}
