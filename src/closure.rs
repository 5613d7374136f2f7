//! Heap-resident closure record (spec §3).

use crate::word::Word;

/// Opaque reference to an [`InfoTable`](crate::info_table::InfoTable) inside
/// a [`Heap`](crate::heap::Heap). Concretely an arena index in
/// [`ArenaHeap`](crate::heap::ArenaHeap); other `Heap` implementations may
/// use a real pointer.
pub type InfoRef = usize;

/// Opaque reference to a [`Closure`] inside a [`Heap`](crate::heap::Heap).
/// Register and stack slots carry this reinterpreted as a plain [`Word`]
/// (spec §9, "Raw-pointer register file") — the core never distinguishes "is
/// this slot a pointer" except by the opcode currently executing.
pub type ClosureRef = usize;

/// A closure: an info-table reference plus zero or more payload words.
#[derive(Debug, Clone)]
pub struct Closure {
    pub info: InfoRef,
    pub payload: Vec<Word>,
}

impl Closure {
    pub fn new(info: InfoRef, payload: Vec<Word>) -> Self {
        Self { info, payload }
    }
}
