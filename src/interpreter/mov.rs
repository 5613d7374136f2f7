//! Register-to-register moves, literal-pool and closure-field access (spec
//! §4.2): `MOV`, `MOV_RES`, `LOADK`, `LOADSLF`, `LOADBH`, `LOADFV`, `LOADF`,
//! `INITF`.

use crate::bytecode::Instruction;
use crate::closure::ClosureRef;
use crate::error::Fault;
use crate::heap::Heap;
use crate::interpreter::{ExecuteState, Interpreter};
use crate::word::RegisterId;

/// `MOV A, D`: `base[A] := base[D]`.
pub fn exec_mov<H: Heap>(interp: &mut Interpreter<H>, ins: Instruction) -> Result<ExecuteState, Fault> {
    let v = interp.thread.reg(ins.d() as RegisterId);
    interp.thread.set_reg(ins.a(), v);
    interp.thread.pc += 1;
    Ok(ExecuteState::Proceed)
}

/// `MOV_RES A`: `base[A] := last_result`. Placed by the compiler
/// immediately after call/eval sites that need the result.
pub fn exec_mov_res<H: Heap>(interp: &mut Interpreter<H>, ins: Instruction) -> Result<ExecuteState, Fault> {
    let v = interp.thread.last_result;
    interp.thread.set_reg(ins.a(), v);
    interp.thread.pc += 1;
    Ok(ExecuteState::Proceed)
}

/// `LOADK A, D`: `base[A] :=` literal-pool entry `D` of the currently
/// executing `Code`.
pub fn exec_loadk<H: Heap>(interp: &mut Interpreter<H>, ins: Instruction) -> Result<ExecuteState, Fault> {
    let v = *interp
        .current_code()?
        .lits
        .get(ins.d() as usize)
        .ok_or(Fault::TruncatedStream(interp.thread.pc))?;
    interp.thread.set_reg(ins.a(), v);
    interp.thread.pc += 1;
    Ok(ExecuteState::Proceed)
}

/// `LOADSLF A`: `base[A] := base[-1]`, the Node.
pub fn exec_loadslf<H: Heap>(interp: &mut Interpreter<H>, ins: Instruction) -> Result<ExecuteState, Fault> {
    let node = interp.thread.node();
    interp.thread.set_reg(ins.a(), node);
    interp.thread.pc += 1;
    Ok(ExecuteState::Proceed)
}

/// `LOADBH A`: `base[A] :=` the address of the static `BLACKHOLE` closure.
pub fn exec_loadbh<H: Heap>(interp: &mut Interpreter<H>, ins: Instruction) -> Result<ExecuteState, Fault> {
    let bh = interp.heap.blackhole() as crate::word::Word;
    interp.thread.set_reg(ins.a(), bh);
    interp.thread.pc += 1;
    Ok(ExecuteState::Proceed)
}

/// `LOADFV A, D`: `base[A] :=` payload slot `D` of the Node.
pub fn exec_loadfv<H: Heap>(interp: &mut Interpreter<H>, ins: Instruction) -> Result<ExecuteState, Fault> {
    let node = interp.thread.node() as ClosureRef;
    let offset = ins.d() as usize;
    let v = *interp.heap.payload(node).get(offset).ok_or(Fault::TruncatedStream(interp.thread.pc))?;
    interp.thread.set_reg(ins.a(), v);
    interp.thread.pc += 1;
    Ok(ExecuteState::Proceed)
}

/// `LOADF A, B, C`: `base[A] :=` payload slot `C` of the closure in
/// `base[B]`.
pub fn exec_loadf<H: Heap>(interp: &mut Interpreter<H>, ins: Instruction) -> Result<ExecuteState, Fault> {
    let cl = interp.thread.reg(ins.b()) as ClosureRef;
    let offset = ins.c() as usize;
    let v = *interp.heap.payload(cl).get(offset).ok_or(Fault::TruncatedStream(interp.thread.pc))?;
    interp.thread.set_reg(ins.a(), v);
    interp.thread.pc += 1;
    Ok(ExecuteState::Proceed)
}

/// `INITF A, B, C`: write `base[A]` into payload slot `C` of the closure in
/// `base[B]`. Used only on freshly allocated, not-yet-shared closures.
pub fn exec_initf<H: Heap>(interp: &mut Interpreter<H>, ins: Instruction) -> Result<ExecuteState, Fault> {
    let v = interp.thread.reg(ins.a());
    let cl = interp.thread.reg(ins.b()) as ClosureRef;
    let offset = ins.c() as usize;
    let slot = interp
        .heap
        .payload_mut(cl)
        .get_mut(offset)
        .ok_or(Fault::TruncatedStream(interp.thread.pc))?;
    *slot = v;
    interp.thread.pc += 1;
    Ok(ExecuteState::Proceed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::{Code, Opcode};
    use crate::heap::ArenaHeap;
    use crate::info_table::ClosureKind;
    use crate::interpreter::Interpreter;
    use crate::word::Word;

    fn interp_executing(instrs: Vec<u32>, lits: Vec<Word>, node_payload: Vec<Word>) -> Interpreter<ArenaHeap> {
        let mut heap = ArenaHeap::new();
        let info = heap.define_code_info(ClosureKind::Thunk, Code::new(instrs, lits, 4, 0));
        let node = heap.allocate(info, node_payload);
        let mut interp = Interpreter::new(heap, 16);
        interp.thread.base = 1;
        interp.thread.stack[0] = node as Word;
        interp
    }

    #[test]
    fn mov_copies_a_register() {
        let mut interp = interp_executing(vec![Instruction::ad(Opcode::Mov, 1, 0).into_raw()], vec![], vec![]);
        interp.thread.set_reg(0, 55);
        let ins = interp.fetch().unwrap();
        exec_mov(&mut interp, ins).unwrap();
        assert_eq!(interp.thread.reg(1), 55);
    }

    #[test]
    fn mov_res_reads_last_result() {
        let mut interp = interp_executing(vec![Instruction::ad(Opcode::MovRes, 0, 0).into_raw()], vec![], vec![]);
        interp.thread.last_result = 123;
        let ins = interp.fetch().unwrap();
        exec_mov_res(&mut interp, ins).unwrap();
        assert_eq!(interp.thread.reg(0), 123);
    }

    #[test]
    fn loadk_reads_the_literal_pool_of_the_executing_code() {
        let mut interp = interp_executing(vec![Instruction::ad(Opcode::LoadK, 0, 1).into_raw()], vec![10, 20], vec![]);
        let ins = interp.fetch().unwrap();
        exec_loadk(&mut interp, ins).unwrap();
        assert_eq!(interp.thread.reg(0), 20);
    }

    #[test]
    fn loadslf_reads_the_node() {
        let mut interp = interp_executing(vec![Instruction::ad(Opcode::LoadSlf, 0, 0).into_raw()], vec![], vec![]);
        let node = interp.thread.node();
        let ins = interp.fetch().unwrap();
        exec_loadslf(&mut interp, ins).unwrap();
        assert_eq!(interp.thread.reg(0), node);
    }

    #[test]
    fn loadbh_reads_the_static_blackhole_address() {
        let mut interp = interp_executing(vec![Instruction::ad(Opcode::LoadBh, 0, 0).into_raw()], vec![], vec![]);
        let bh = interp.heap.blackhole();
        let ins = interp.fetch().unwrap();
        exec_loadbh(&mut interp, ins).unwrap();
        assert_eq!(interp.thread.reg(0), bh as Word);
    }

    #[test]
    fn loadfv_reads_a_payload_slot_of_the_node() {
        let mut interp = interp_executing(vec![Instruction::ad(Opcode::LoadFv, 0, 1).into_raw()], vec![], vec![7, 9]);
        let ins = interp.fetch().unwrap();
        exec_loadfv(&mut interp, ins).unwrap();
        assert_eq!(interp.thread.reg(0), 9);
    }

    #[test]
    fn loadf_reads_a_payload_slot_of_an_arbitrary_closure() {
        let mut interp = interp_executing(vec![Instruction::abc(Opcode::LoadF, 0, 1, 1).into_raw()], vec![], vec![]);
        let constr_info = interp.heap.define_constr_info(0);
        let other = interp.heap.allocate(constr_info, vec![4, 5]);
        interp.thread.set_reg(1, other as Word);

        let ins = interp.fetch().unwrap();
        exec_loadf(&mut interp, ins).unwrap();
        assert_eq!(interp.thread.reg(0), 5);
    }

    #[test]
    fn initf_writes_a_payload_slot_of_a_fresh_closure() {
        let mut interp = interp_executing(vec![Instruction::abc(Opcode::InitF, 0, 1, 0).into_raw()], vec![], vec![]);
        let constr_info = interp.heap.define_constr_info(0);
        let fresh = interp.heap.allocate(constr_info, vec![0]);
        interp.thread.set_reg(0, 42);
        interp.thread.set_reg(1, fresh as Word);

        let ins = interp.fetch().unwrap();
        exec_initf(&mut interp, ins).unwrap();
        assert_eq!(interp.heap.payload(fresh)[0], 42);
    }
}
