//! Info-table contract the core consumes (spec §3, §6, "Closure/info-table
//! interface"). Layout of real info tables is an external collaborator's
//! concern (the loader and its info-table layout definitions, §1); the core
//! only needs the fields below.

use crate::bytecode::Code;

/// The closure variant an info table describes (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosureKind {
    Constr,
    Thunk,
    Fun,
    Ind,
    Pap,
    Blackhole,
}

impl ClosureKind {
    /// `closure_HNF` (spec §6): true iff the closure is already in head
    /// normal form and `EVAL` can take its no-op fast path.
    pub fn is_hnf(self) -> bool {
        matches!(self, ClosureKind::Constr | ClosureKind::Fun | ClosureKind::Pap)
    }
}

/// Immutable metadata shared by every closure of a kind (spec §3).
#[derive(Debug, Clone)]
pub struct InfoTable {
    pub kind: ClosureKind,
    /// Meaningful for `Constr` only.
    pub tag: u16,
    /// Present for `Fun`/`Thunk`; absent otherwise.
    pub code: Option<Code>,
}

impl InfoTable {
    pub fn constr(tag: u16) -> Self {
        Self {
            kind: ClosureKind::Constr,
            tag,
            code: None,
        }
    }

    pub fn thunk(code: Code) -> Self {
        Self {
            kind: ClosureKind::Thunk,
            tag: 0,
            code: Some(code),
        }
    }

    pub fn fun(code: Code) -> Self {
        Self {
            kind: ClosureKind::Fun,
            tag: 0,
            code: Some(code),
        }
    }

    /// `stg_IND_info`. Unlike `pap()`/`blackhole()`, an indirection carries
    /// real `Code` (the chase routine `EVAL` enters when it meets a non-HNF
    /// closure): `closure_HNF` does not special-case `IND` (spec §6), so the
    /// dispatch loop never does either — an indirection is forced exactly
    /// like a thunk, and its code is what does the chasing.
    pub fn ind(chase_code: Code) -> Self {
        Self {
            kind: ClosureKind::Ind,
            tag: 0,
            code: Some(chase_code),
        }
    }

    pub fn pap() -> Self {
        Self {
            kind: ClosureKind::Pap,
            tag: 0,
            code: None,
        }
    }

    pub fn blackhole() -> Self {
        Self {
            kind: ClosureKind::Blackhole,
            tag: 0,
            code: None,
        }
    }

    pub fn is_hnf(&self) -> bool {
        self.kind.is_hnf()
    }
}
