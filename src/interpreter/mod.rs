//! Interpreter dispatch loop (spec §2, "Interpreter dispatch loop"; §4).
//!
//! Dispatch strategy: a single `match` over [`Opcode`], which the compiler
//! lowers to a jump table — one of the three platform-neutral strategies the
//! spec calls out in place of the source's "labels as values" threading
//! (§9, "Computed-goto dispatch → abstract dispatch").

mod alloc;
mod arith;
mod case;
mod cmp;
mod eval_update;
mod frame;
mod mov;

use tracing::trace;

use crate::bytecode::{Code, Instruction, Opcode};
use crate::closure::ClosureRef;
use crate::error::{Fault, InterpreterError};
use crate::heap::Heap;
use crate::thread::Thread;
use crate::word::Word;

/// Outcome of decoding and executing one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteState {
    /// Keep dispatching.
    Proceed,
    /// Control returned into the entry frame; the interpreter halts with
    /// this value (spec §3, "Lifecycle").
    Halted(Word),
}

/// The interpreter core: one thread plus the heap collaborator it reads
/// closures and info tables through (spec §3, §6).
pub struct Interpreter<H: Heap> {
    pub thread: Thread,
    pub heap: H,
}

impl<H: Heap> Interpreter<H> {
    pub fn new(heap: H, stack_size: usize) -> Self {
        Self {
            thread: Thread::new(stack_size),
            heap,
        }
    }

    /// Runs `target` to normal form through the synthetic entry frame (spec
    /// §3, "Lifecycle"): pushes a 3-word frame whose Node is
    /// [`Heap::entry_closure`] (code `[EVAL 0, <bitmap>, MOV_RES 0, RET1 0]`) and whose
    /// saved return pc is the `STOP` sentinel, places `target` in its
    /// register 0, and runs until the interpreter halts. The result is both
    /// returned and, mirroring the reference interpreter's `T->stack[1]`,
    /// left in `stack[1]` as a well-known slot (spec §6).
    pub fn run_closure(&mut self, target: ClosureRef) -> Result<Word, InterpreterError> {
        let entry = self.heap.entry_closure();
        let framesize = self
            .heap
            .code_of(entry)
            .ok_or_else(|| InterpreterError::new(Fault::UnimplementedOp, 0))?
            .framesize;

        self.thread.stack[0] = 0; // saved base of the entry frame; never read
        self.thread.stack[1] = crate::thread::STOP_PC;
        self.thread.stack[2] = entry as Word;
        self.thread.base = 3;
        self.thread.top = 3 + framesize;
        self.thread.stack[3] = target as Word;
        self.thread.pc = 0;

        let result = self.run()?;
        self.thread.stack[1] = result;
        Ok(result)
    }

    /// `Code` of the closure currently executing (`base[-1]`), per
    /// invariant 2 (§3): always re-derived from the Node rather than cached,
    /// so it can never go stale the way a literal cached pointer could.
    fn current_code(&self) -> Result<&Code, Fault> {
        let node = self.thread.node() as ClosureRef;
        self.heap.code_of(node).ok_or(Fault::UnimplementedOp)
    }

    /// Decodes the instruction at `self.thread.pc`, without consuming it.
    fn fetch(&self) -> Result<Instruction, Fault> {
        self.fetch_at(self.thread.pc)
    }

    /// Decodes the raw instruction word at an arbitrary `pc`, used by
    /// handlers that peek trailing payload or a following `JMP` (spec §4.3,
    /// §4.4-§4.6).
    fn fetch_at(&self, pc: usize) -> Result<Instruction, Fault> {
        self.current_code()?.fetch(pc).ok_or(Fault::TruncatedStream(pc))
    }

    /// The raw instruction words of the code currently executing, for
    /// handlers that read a trailing payload of several words
    /// (`PayloadReader`).
    fn instrs(&self) -> Result<&[u32], Fault> {
        Ok(&self.current_code()?.instrs)
    }

    /// Runs one decode-execute step.
    pub fn step(&mut self) -> Result<ExecuteState, Fault> {
        let pc = self.thread.pc;
        let ins = self.fetch()?;
        let opcode = ins.opcode().ok_or_else(|| Fault::InvalidOpcode(ins.raw_opcode()))?;
        trace!(?opcode, pc, a = ins.a(), "dispatch");

        match opcode {
            Opcode::IsLt | Opcode::IsGe | Opcode::IsLe | Opcode::IsGt | Opcode::IsEq | Opcode::IsNe => {
                cmp::exec_cmp(self, opcode, ins)
            }
            Opcode::Jmp => cmp::exec_jmp(self, ins),
            Opcode::Not | Opcode::Neg => arith::exec_unary(self, opcode, ins),
            Opcode::AddRR | Opcode::SubRR | Opcode::MulRR | Opcode::DivRR | Opcode::RemRR => {
                arith::exec_binary(self, opcode, ins)
            }
            Opcode::Kint => arith::exec_kint(self, ins),
            Opcode::Mov => mov::exec_mov(self, ins),
            Opcode::MovRes => mov::exec_mov_res(self, ins),
            Opcode::LoadK => mov::exec_loadk(self, ins),
            Opcode::LoadSlf => mov::exec_loadslf(self, ins),
            Opcode::LoadBh => mov::exec_loadbh(self, ins),
            Opcode::LoadFv => mov::exec_loadfv(self, ins),
            Opcode::LoadF => mov::exec_loadf(self, ins),
            Opcode::InitF => mov::exec_initf(self, ins),
            Opcode::NewInt => alloc::exec_new_int(self, ins),
            Opcode::Alloc1 => alloc::exec_alloc1(self, ins),
            Opcode::Alloc => alloc::exec_alloc(self, ins),
            Opcode::AllocAp => Err(Fault::UnimplementedOp),
            Opcode::Call => frame::exec_call(self, ins),
            Opcode::Callt => frame::exec_callt(self, ins),
            Opcode::Ret1 => frame::exec_ret1(self, ins),
            Opcode::Eval => eval_update::exec_eval(self, ins),
            Opcode::Update => eval_update::exec_update(self, ins),
            Opcode::Case => case::exec_case(self, ins),
            Opcode::CaseS => case::exec_case_s(self, ins),
            Opcode::Func | Opcode::Ifunc | Opcode::Jfunc | Opcode::Jret | Opcode::Iret | Opcode::Sync => {
                self.thread.pc += 1;
                Ok(ExecuteState::Proceed)
            }
            Opcode::Stop => Ok(ExecuteState::Halted(self.thread.last_result)),
        }
    }

    /// Runs until the interpreter halts or a fault occurs. Unlike [`step`](Self::step),
    /// this pairs a fault with the `pc` it was raised at (mirroring the
    /// teacher's `PanicReason`/`InterpreterError` split), since by the time
    /// the error reaches a caller here the thread that raised it is no
    /// longer available to inspect.
    pub fn run(&mut self) -> Result<Word, InterpreterError> {
        loop {
            let pc = self.thread.pc;
            match self.step() {
                Ok(ExecuteState::Halted(v)) => return Ok(v),
                Ok(ExecuteState::Proceed) => continue,
                Err(fault) => return Err(InterpreterError::new(fault, pc)),
            }
        }
    }
}
