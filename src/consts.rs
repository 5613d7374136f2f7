//! VM-wide parameters, centralized as `pub const` items rather than a config
//! file — the core has no persisted configuration (spec §6).

/// Words reserved per ordinary call frame: saved base, return pc, Node
/// (spec §4.6, `top[0..2]`).
pub const CALL_FRAME_WORDS: usize = 3;

/// Words reserved per update frame pushed above a thunk's call frame
/// (spec §4.7, `top[3..4]` plus the thunk's own `top[5..7]`).
pub const UPDATE_FRAME_WORDS: usize = 5;

/// Default stack size, in words, for a freshly created thread.
pub const DEFAULT_STACK_WORDS: usize = 4096;

/// `stg_UPD_closure`'s register-window size: reg0 holds the thunk being
/// updated, reg1 holds its result once `MOV_RES` runs (spec §4.7,
/// "SUPPLEMENTED FROM ORIGINAL SOURCE").
pub const UPD_CLOSURE_FRAMESIZE: usize = 2;

/// Lower/upper bound of the small-integer cache populated at heap
/// construction (spec §6, `smallInt(v)`).
pub const SMALL_INT_MIN: i64 = -128;
pub const SMALL_INT_MAX: i64 = 127;
