//! The instruction catalogue (spec §6).

use strum::EnumIter;

/// Every opcode the core dispatches, in the order the original `BCDEF` table
/// lists them (`vm/bytecode.hh`). The core defines this numbering itself —
/// the bytecode loader that would need wire compatibility with an external
/// compiler is out of scope (spec §1).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Opcode {
    IsLt,
    IsGe,
    IsLe,
    IsGt,
    IsEq,
    IsNe,
    Not,
    Neg,
    Mov,
    MovRes,
    Update,
    LoadF,
    LoadFv,
    LoadBh,
    LoadSlf,
    InitF,
    AddRR,
    SubRR,
    MulRR,
    DivRR,
    RemRR,
    LoadK,
    Kint,
    NewInt,
    Alloc1,
    Alloc,
    AllocAp,
    Call,
    Callt,
    Ret1,
    Jmp,
    Eval,
    Case,
    CaseS,
    Func,
    Ifunc,
    Jfunc,
    Jret,
    Iret,
    Sync,
    Stop,
}

impl Opcode {
    /// Total number of defined opcodes; also the first unused byte value.
    pub const COUNT: u8 = 41;

    /// Decodes a raw opcode byte, rejecting anything outside the catalogue.
    pub fn from_u8(raw: u8) -> Option<Self> {
        use strum::IntoEnumIterator;
        Self::iter().nth(raw as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_opcode_round_trips_through_its_byte() {
        for (idx, op) in Opcode::iter().enumerate() {
            assert_eq!(Opcode::from_u8(idx as u8), Some(op));
        }
    }

    #[test]
    fn count_matches_variant_total() {
        assert_eq!(Opcode::iter().count(), Opcode::COUNT as usize);
    }

    #[test]
    fn unknown_byte_is_none() {
        assert_eq!(Opcode::from_u8(Opcode::COUNT), None);
        assert_eq!(Opcode::from_u8(255), None);
    }
}
