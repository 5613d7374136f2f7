//! Per-execution-context state (spec §3, "Thread / execution context").

use crate::error::Fault;
use crate::word::{RegisterId, Word};

/// Sentinel return-pc value stored in the entry frame's `base[-2]`, standing
/// in for the synthetic `STOP` instruction (spec §3, "Lifecycle"; §4.8). Real
/// code pc values are always non-negative instruction indices, so `-1` can
/// never collide with one.
pub const STOP_PC: Word = -1;

/// One execution context: a single stack shared by call frames and update
/// frames, plus the registers the dispatch loop threads through every
/// instruction (spec §3).
pub struct Thread {
    /// Next instruction to decode, as a word-index into the current code's
    /// `instrs` (invariant 6, §3).
    pub pc: usize,
    /// Start of the current register window, as an index into `stack`.
    pub base: usize,
    /// First unused stack slot above the window.
    pub top: usize,
    pub stack_size: usize,
    /// Return-value slot between `RET1`/`UPDATE` and the following
    /// `MOV_RES`.
    pub last_result: Word,
    pub stack: Vec<Word>,
}

impl Thread {
    pub fn new(stack_size: usize) -> Self {
        Self {
            pc: 0,
            base: 0,
            top: 0,
            stack_size,
            last_result: 0,
            stack: vec![0; stack_size],
        }
    }

    /// Reads register `r` of the current window.
    pub fn reg(&self, r: RegisterId) -> Word {
        self.stack[self.base + r as usize]
    }

    /// Writes register `r` of the current window.
    pub fn set_reg(&mut self, r: RegisterId, v: Word) {
        self.stack[self.base + r as usize] = v;
    }

    /// The Node: the closure whose code is currently executing
    /// (invariant 2, §3).
    pub fn node(&self) -> Word {
        self.stack[self.base - 1]
    }

    pub fn set_node(&mut self, v: Word) {
        self.stack[self.base - 1] = v;
    }

    /// The caller's saved return pc (invariant 3, §3).
    pub fn saved_return_pc(&self) -> Word {
        self.stack[self.base - 2]
    }

    /// The caller's saved base (invariant 4, §3).
    pub fn saved_base(&self) -> Word {
        self.stack[self.base - 3]
    }

    /// Checks that extending `top` to `new_top` stays within `stack_size`
    /// (spec §5: "`CALL`, `EVAL`, and `CALLT` test whether extending `top`
    /// would exceed `stack + stack_size`"). There is no growth path — the
    /// spec treats automatic stack growth as a future collaborator (§5) and
    /// a Non-goal (§1) — so this is the only outcome besides proceeding.
    pub fn check_extend(&self, new_top: usize) -> Result<(), Fault> {
        if new_top > self.stack_size {
            Err(Fault::StackOverflow)
        } else {
            Ok(())
        }
    }
}
