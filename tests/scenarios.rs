//! End-to-end interpreter scenarios (spec §8, "End-to-end scenarios"),
//! driven entirely through the public `Interpreter`/`Heap` surface rather
//! than a single submodule's internal helpers.

use lazyvm_core::bytecode::{Code, Instruction, Opcode};
use lazyvm_core::info_table::ClosureKind;
use lazyvm_core::{ArenaHeap, Heap, Interpreter};

/// Scenario 1: a zero-arity thunk `silly1` with code
/// `[KINT r0, 42; NEW_INT r0, r0; RET1 r0]` boxes `42` and, on return,
/// rewrites itself into an indirection pointing at the boxed value.
#[test]
fn silly1_identity_thunk_boxes_its_literal_and_updates_itself() {
    let mut heap = ArenaHeap::new();
    let code = Code::new(
        vec![
            Instruction::asd(Opcode::Kint, 0, 42).into_raw(),
            Instruction::ad(Opcode::NewInt, 0, 0).into_raw(),
            Instruction::ad(Opcode::Ret1, 0, 0).into_raw(),
        ],
        vec![],
        1,
        0,
    );
    let info = heap.define_code_info(ClosureKind::Thunk, code);
    let silly1 = heap.allocate(info, vec![]);

    let mut interp = Interpreter::new(heap, 32);
    let result = interp.run_closure(silly1).expect("silly1 should run to completion");

    let expected = interp.heap.new_int(42);
    assert_eq!(result as usize, expected, "result should be the boxed 42 closure");

    assert_eq!(
        interp.heap.info_of(silly1),
        interp.heap.ind_info(),
        "the thunk must be rewritten to an indirection on return"
    );
    assert_eq!(
        interp.heap.payload(silly1)[0] as usize,
        expected,
        "the indirection's payload[0] must point at the boxed result"
    );

    // Invariant 4 (spec §8): a second force of the same thunk must still
    // resolve to the same underlying value (through the indirection), not
    // panic or diverge.
    let second = interp.run_closure(silly1).expect("forcing an already-updated thunk must not fail");
    assert_eq!(second as usize, expected);
}

/// Scenario 5: mutually tail-recursive `even`/`odd` on a small-int argument
/// reach their base case without growing the stack beyond one call frame's
/// worth, because `CALLT` reuses the current frame instead of pushing a new
/// one. A stack sized for exactly one `even`/`odd` frame (plus the driver's
/// own call into it) is enough to run an arbitrarily deep recursion.
#[test]
fn mutual_tail_recursion_runs_in_bounded_stack() {
    let mut heap = ArenaHeap::new();

    // Placeholder info just to mint two closure refs before either's real
    // Code (which embeds the other's ref in its literal pool) exists.
    let placeholder = heap.define_constr_info(0);
    let even_closure = heap.allocate(placeholder, vec![]);
    let odd_closure = heap.allocate(placeholder, vec![]);

    // even(n): if n == 0, return 1 (True); else tail-call odd(n - 1).
    // r0 = n, r1 = scratch/zero/fnode, r2 = n - 1, r3 = result.
    let even_code = Code::new(
        vec![
            Instruction::asd(Opcode::Kint, 1, 0).into_raw(), // r1 = 0
            Instruction::ad(Opcode::IsEq, 0, 1).into_raw(),  // r0 == r1 ?
            Instruction::aj(Opcode::Jmp, 0, 4).into_raw(),   // if equal, skip the recursive block (4 instrs)
            Instruction::asd(Opcode::Kint, 2, 1).into_raw(), // r2 = 1
            Instruction::abc(Opcode::SubRR, 2, 0, 2).into_raw(), // r2 = n - 1
            Instruction::ad(Opcode::LoadK, 1, 0).into_raw(), // r1 = odd closure
            Instruction::abc(Opcode::Callt, 1, 1, 2).into_raw(), // tail-call odd(r2)
            Instruction::asd(Opcode::Kint, 3, 1).into_raw(), // r3 = 1 (True)
            Instruction::ad(Opcode::Ret1, 3, 0).into_raw(),
        ],
        vec![odd_closure as i64],
        4,
        1,
    );

    // odd(n): if n == 0, return 0 (False); else tail-call even(n - 1).
    let odd_code = Code::new(
        vec![
            Instruction::asd(Opcode::Kint, 1, 0).into_raw(),
            Instruction::ad(Opcode::IsEq, 0, 1).into_raw(),
            Instruction::aj(Opcode::Jmp, 0, 4).into_raw(),
            Instruction::asd(Opcode::Kint, 2, 1).into_raw(),
            Instruction::abc(Opcode::SubRR, 2, 0, 2).into_raw(),
            Instruction::ad(Opcode::LoadK, 1, 0).into_raw(), // r1 = even closure
            Instruction::abc(Opcode::Callt, 1, 1, 2).into_raw(),
            Instruction::asd(Opcode::Kint, 3, 0).into_raw(), // r3 = 0 (False)
            Instruction::ad(Opcode::Ret1, 3, 0).into_raw(),
        ],
        vec![even_closure as i64],
        4,
        1,
    );

    let even_info = heap.define_code_info(ClosureKind::Fun, even_code);
    let odd_info = heap.define_code_info(ClosureKind::Fun, odd_code);
    heap.set_info(even_closure, even_info);
    heap.set_info(odd_closure, odd_info);

    // Driver thunk: call even(50), a deep enough recursion that a
    // non-tail-call implementation would overflow the tiny stack below.
    let driver_code = Code::new(
        vec![
            Instruction::asd(Opcode::Kint, 0, 50).into_raw(), // r0 = 50 (arg0)
            Instruction::ad(Opcode::LoadK, 1, 0).into_raw(),  // r1 = even closure
            Instruction::abc(Opcode::Call, 1, 0, 1).into_raw(), // CALL r1(fnode), arg0=r0, nargs=1
            0,                                                // live-out bitmap
            Instruction::ad(Opcode::MovRes, 0, 0).into_raw(),
            Instruction::ad(Opcode::Ret1, 0, 0).into_raw(),
        ],
        vec![even_closure as i64],
        2,
        0,
    );
    let driver_info = heap.define_code_info(ClosureKind::Thunk, driver_code);
    let driver = heap.allocate(driver_info, vec![]);

    // Entry frame (framesize 1) forces the driver thunk via EVAL, which
    // pushes an 8-word call+update frame before the driver's own 2-register
    // window; the driver's CALL into `even` then pushes an ordinary 3-word
    // call frame plus even/odd's 4-register window. Total: 4 + (8 + 2) + (3
    // + 4) = 21 words, with no further growth however deep the even/odd
    // mutual recursion goes, since CALLT reuses that one frame.
    let mut interp = Interpreter::new(heap, 24);
    let result = interp.run_closure(driver).expect("bounded-stack mutual recursion should not overflow");

    assert_eq!(result, 1, "even(50) should return True (1)");
}

/// `CALL`/`CALLT` reject an arity mismatch rather than silently truncating
/// or padding arguments (spec §8, scenario 6; spec §9, partial application
/// deferred to a future collaborator).
#[test]
fn calling_with_the_wrong_arity_halts_with_unimplemented_arity() {
    use lazyvm_core::Fault;

    let mut heap = ArenaHeap::new();
    let callee_info = heap.define_code_info(
        ClosureKind::Fun,
        Code::new(vec![Instruction::ad(Opcode::Ret1, 0, 0).into_raw()], vec![], 2, 2),
    );
    let callee = heap.allocate(callee_info, vec![]);

    let driver_code = Code::new(
        vec![
            Instruction::ad(Opcode::LoadK, 0, 0).into_raw(), // r0 = callee
            Instruction::asd(Opcode::Kint, 1, 7).into_raw(), // r1 = 7 (single arg)
            Instruction::abc(Opcode::Call, 0, 1, 1).into_raw(), // nargs=1, but callee wants 2
            0,                                                // live-out bitmap
            Instruction::ad(Opcode::MovRes, 0, 0).into_raw(),
            Instruction::ad(Opcode::Ret1, 0, 0).into_raw(),
        ],
        vec![callee as i64],
        2,
        0,
    );
    let driver_info = heap.define_code_info(ClosureKind::Thunk, driver_code);
    let driver = heap.allocate(driver_info, vec![]);

    let mut interp = Interpreter::new(heap, 32);
    let err = interp.run_closure(driver).unwrap_err();
    assert_eq!(err.fault, Fault::UnimplementedArity { expected: 2, got: 1 });
}
