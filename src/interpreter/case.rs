//! Algebraic `CASE`/`CASE_S` dispatch over a constructor's tag: a dense
//! packed jump table and a sparse binary-search table, both reading their
//! table inline as trailing payload (spec §4.5).

use crate::bytecode::{Instruction, PayloadReader};
use crate::closure::ClosureRef;
use crate::error::Fault;
use crate::heap::Heap;
use crate::interpreter::{ExecuteState, Interpreter};

/// `CASE A, n`: dense jump table. If `tag < n`, jump to the packed target;
/// otherwise fall through to the instruction after the table, the default
/// arm (spec §4.5).
pub fn exec_case<H: Heap>(interp: &mut Interpreter<H>, ins: Instruction) -> Result<ExecuteState, Fault> {
    let pc = interp.thread.pc;
    let subject = interp.thread.reg(ins.a()) as ClosureRef;
    let n = ins.d();
    let tag = interp.heap.tag_of(subject);

    let instrs = interp.instrs()?;
    let mut reader = PayloadReader::new(instrs, pc + 1);
    let targets = reader.read_dense_table(n).ok_or(Fault::TruncatedStream(pc))?;
    let after_table = reader.pos();

    interp.thread.pc = if tag < n {
        (after_table as i64 + targets[tag as usize] as i64) as usize
    } else {
        after_table
    };
    Ok(ExecuteState::Proceed)
}

/// `CASE_S A, n`: sparse table, sorted ascending by tag. Falls through to
/// the default arm on a miss or out-of-range tag (spec §4.5).
pub fn exec_case_s<H: Heap>(interp: &mut Interpreter<H>, ins: Instruction) -> Result<ExecuteState, Fault> {
    let pc = interp.thread.pc;
    let subject = interp.thread.reg(ins.a()) as ClosureRef;
    let n = ins.d();
    let tag = interp.heap.tag_of(subject);

    let instrs = interp.instrs()?;
    let mut reader = PayloadReader::new(instrs, pc + 1);
    let table = reader.read_sparse_table(n).ok_or(Fault::TruncatedStream(pc))?;
    let after_table = reader.pos();

    interp.thread.pc = match table.lookup(tag) {
        Some(target) => (after_table as i64 + target as i64) as usize,
        None => after_table,
    };
    Ok(ExecuteState::Proceed)
}
