//! Threaded bytecode interpreter core for a lazy, graph-reducing virtual
//! machine: closures, self-updating thunks, call/return frames and
//! algebraic-data-type case dispatch. See `SPEC_FULL.md` for the full
//! requirements this crate implements and `DESIGN.md` for how each module is
//! grounded.
//!
//! The heap allocator and garbage collector, the bytecode loader, the
//! disassembler, the top-level driver and any JIT are external
//! collaborators; this crate specifies and consumes their contract (see
//! [`heap::Heap`]) but does not implement a production instance of any of
//! them beyond the in-process [`heap::ArenaHeap`] needed to run and test the
//! interpreter.
#![warn(missing_docs)]

pub mod bytecode;
pub mod closure;
pub mod consts;
pub mod error;
pub mod heap;
pub mod info_table;
pub mod interpreter;
pub mod thread;
pub mod word;

pub use bytecode::{Code, Instruction, Opcode};
pub use closure::{Closure, ClosureRef, InfoRef};
pub use error::{Fault, InterpreterError};
pub use heap::{ArenaHeap, Heap};
pub use info_table::{ClosureKind, InfoTable};
pub use interpreter::{ExecuteState, Interpreter};
pub use thread::Thread;
pub use word::{RegisterId, Word};
