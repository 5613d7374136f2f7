//! The machine word.

/// The unit of storage for every register, stack slot and payload word.
///
/// A `Word` is tag-free: the same slot holds a signed integer at one moment
/// and a [`crate::closure::ClosureRef`] (reinterpreted via `as`) at another.
/// Bytecode semantics rely on this raw bit reinterpretation, notably `KINT`
/// followed by arithmetic and by `NEW_INT` (spec §9, "Raw-pointer register
/// file").
pub type Word = i64;

/// Index of a register within the current call frame's window (`base[..]`).
pub type RegisterId = u8;
