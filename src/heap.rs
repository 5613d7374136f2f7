//! Allocation and closure/info-table collaborator interfaces (spec §6), plus
//! one concrete in-process implementation sufficient to run and test the
//! interpreter. The real garbage collector, its root scanning, and the
//! bytecode loader that would populate [`InfoTable`] layouts from a compiled
//! module remain external (spec §1).

use crate::bytecode::Code;
use crate::closure::{Closure, ClosureRef, InfoRef};
use crate::consts::{SMALL_INT_MAX, SMALL_INT_MIN, UPD_CLOSURE_FRAMESIZE};
use crate::info_table::{ClosureKind, InfoTable};
use crate::word::Word;

/// The contract the interpreter core requires from allocation and
/// info-table access (spec §6, "Collaborator interfaces consumed").
pub trait Heap {
    /// `allocate(cap, words)`: produces a fresh closure with the given info
    /// and payload. The core treats the result as already initialised
    /// (spec §4.4).
    fn allocate(&mut self, info: InfoRef, payload: Vec<Word>) -> ClosureRef;

    /// `getInfo(c)`.
    fn info_of(&self, c: ClosureRef) -> InfoRef;

    /// `setInfo(c, it)` — used only by `UPDATE` to rewrite a thunk into an
    /// indirection (spec §4.7, invariant 8).
    fn set_info(&mut self, c: ClosureRef, info: InfoRef);

    fn info_table(&self, info: InfoRef) -> &InfoTable;

    /// `getTag(c)`.
    fn tag_of(&self, c: ClosureRef) -> u16 {
        self.info_table(self.info_of(c)).tag
    }

    /// `closure_HNF(c)`.
    fn is_hnf(&self, c: ClosureRef) -> bool {
        self.info_table(self.info_of(c)).is_hnf()
    }

    fn payload(&self, c: ClosureRef) -> &[Word];

    fn payload_mut(&mut self, c: ClosureRef) -> &mut [Word];

    /// Overwrites payload slot 0, the shape every `UPDATE` rewrite needs
    /// (spec §4.7: "its first payload word is the target closure"). A
    /// zero-free-variable thunk is allocated with an empty payload (e.g.
    /// `silly1`), so implementations must grow the payload to at least one
    /// word rather than indexing a slice that may be empty.
    fn set_payload0(&mut self, c: ClosureRef, v: Word);

    /// `Code` of a `FUN`/`THUNK` closure's info table. `None` for any other
    /// kind — callers only reach here after checking the kind themselves.
    fn code_of(&self, c: ClosureRef) -> Option<&Code> {
        self.info_table(self.info_of(c)).code.as_ref()
    }

    /// `stg_IND_info`: the singleton `IND` info table.
    fn ind_info(&self) -> InfoRef;

    /// The distinguished static `BLACKHOLE` closure (`stg_BLACKHOLE_closure`).
    fn blackhole(&self) -> ClosureRef;

    /// The synthetic `stg_UPD_closure` Node pushed above a forced thunk
    /// (spec §4.7).
    fn upd_closure(&self) -> ClosureRef;

    /// Index, within `stg_UPD_closure`'s code, of `stg_UPD_return_pc`: the
    /// instruction a forced thunk's `RET1` returns into (spec §9, resolved
    /// in `SPEC_FULL.md` as the `MOV_RES 1` that precedes `UPDATE 0, 1`).
    fn upd_return_pc(&self) -> usize;

    /// `smallInt(v)` / `stg_Izh_con_info`: small-integer boxing (spec §6,
    /// `NEW_INT`).
    fn new_int(&mut self, v: Word) -> ClosureRef;

    /// The synthetic root `FUN` closure a driver enters a thread through:
    /// code `[EVAL 0, <bitmap>, MOV_RES 0, RET1 0]`, framesize 1, arity 0. Not part of
    /// spec §6's collaborator list verbatim, but needed to give the
    /// "entry frame" of spec §3's Lifecycle a real `Code` to execute rather
    /// than special-casing the dispatch loop for the outermost frame.
    fn entry_closure(&self) -> ClosureRef;
}

/// A concrete in-process arena `Heap`. Closures and info tables live in
/// plain `Vec`s indexed by `InfoRef`/`ClosureRef`; there is no collection —
/// matching the spec's stance that the real allocator and GC are external
/// (§1).
pub struct ArenaHeap {
    infos: Vec<InfoTable>,
    closures: Vec<Closure>,
    ind_info: InfoRef,
    blackhole_closure: ClosureRef,
    upd_closure: ClosureRef,
    entry_closure: ClosureRef,
    izh_con_info: InfoRef,
    small_ints: Vec<Option<ClosureRef>>,
}

impl ArenaHeap {
    pub fn new() -> Self {
        let mut infos = Vec::new();
        let mut closures = Vec::new();

        let ind_info = infos.len();
        infos.push(InfoTable::ind(Code::new(
            vec![
                crate::bytecode::Instruction::ad(crate::bytecode::Opcode::LoadFv, 0, 0).into_raw(),
                crate::bytecode::Instruction::ad(crate::bytecode::Opcode::Eval, 0, 0).into_raw(),
                0, // live-out bitmap, opaque to the core
                crate::bytecode::Instruction::ad(crate::bytecode::Opcode::MovRes, 0, 0).into_raw(),
                crate::bytecode::Instruction::ad(crate::bytecode::Opcode::Ret1, 0, 0).into_raw(),
            ],
            Vec::new(),
            1,
            0,
        )));

        let blackhole_info = infos.len();
        infos.push(InfoTable::blackhole());
        let blackhole_closure = closures.len();
        closures.push(Closure::new(blackhole_info, Vec::new()));

        let upd_info = infos.len();
        infos.push(InfoTable::fun(Code::new(
            vec![
                crate::bytecode::Instruction::ad(crate::bytecode::Opcode::MovRes, 1, 0).into_raw(),
                crate::bytecode::Instruction::ad(crate::bytecode::Opcode::Update, 0, 1).into_raw(),
            ],
            Vec::new(),
            UPD_CLOSURE_FRAMESIZE,
            0,
        )));
        let upd_closure = closures.len();
        closures.push(Closure::new(upd_info, Vec::new()));

        let entry_info = infos.len();
        infos.push(InfoTable::fun(Code::new(
            vec![
                crate::bytecode::Instruction::ad(crate::bytecode::Opcode::Eval, 0, 0).into_raw(),
                0, // live-out bitmap, opaque to the core
                crate::bytecode::Instruction::ad(crate::bytecode::Opcode::MovRes, 0, 0).into_raw(),
                crate::bytecode::Instruction::ad(crate::bytecode::Opcode::Ret1, 0, 0).into_raw(),
            ],
            Vec::new(),
            1,
            0,
        )));
        let entry_closure = closures.len();
        closures.push(Closure::new(entry_info, Vec::new()));

        let izh_con_info = infos.len();
        infos.push(InfoTable::constr(0));

        let span = (SMALL_INT_MAX - SMALL_INT_MIN + 1) as usize;
        let mut small_ints = Vec::with_capacity(span);
        for i in 0..span {
            let v = SMALL_INT_MIN + i as Word;
            let idx = closures.len();
            closures.push(Closure::new(izh_con_info, vec![v]));
            small_ints.push(Some(idx));
        }

        Self {
            infos,
            closures,
            ind_info,
            blackhole_closure,
            upd_closure,
            entry_closure,
            izh_con_info,
            small_ints,
        }
    }

    /// Registers a new `FUN`/`THUNK` info table and returns its `InfoRef`.
    pub fn define_code_info(&mut self, kind: ClosureKind, code: Code) -> InfoRef {
        let info = match kind {
            ClosureKind::Fun => InfoTable::fun(code),
            ClosureKind::Thunk => InfoTable::thunk(code),
            other => panic!("define_code_info: {other:?} has no Code"),
        };
        self.infos.push(info);
        self.infos.len() - 1
    }

    /// Registers a new `CONSTR` info table with the given tag.
    pub fn define_constr_info(&mut self, tag: u16) -> InfoRef {
        self.infos.push(InfoTable::constr(tag));
        self.infos.len() - 1
    }

    fn small_int_index(v: Word) -> Option<usize> {
        if (SMALL_INT_MIN..=SMALL_INT_MAX).contains(&v) {
            Some((v - SMALL_INT_MIN) as usize)
        } else {
            None
        }
    }
}

impl Default for ArenaHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heap for ArenaHeap {
    fn allocate(&mut self, info: InfoRef, payload: Vec<Word>) -> ClosureRef {
        self.closures.push(Closure::new(info, payload));
        self.closures.len() - 1
    }

    fn ind_info(&self) -> InfoRef {
        self.ind_info
    }

    fn info_of(&self, c: ClosureRef) -> InfoRef {
        self.closures[c].info
    }

    fn set_info(&mut self, c: ClosureRef, info: InfoRef) {
        self.closures[c].info = info;
    }

    fn info_table(&self, info: InfoRef) -> &InfoTable {
        &self.infos[info]
    }

    fn payload(&self, c: ClosureRef) -> &[Word] {
        &self.closures[c].payload
    }

    fn payload_mut(&mut self, c: ClosureRef) -> &mut [Word] {
        &mut self.closures[c].payload
    }

    fn set_payload0(&mut self, c: ClosureRef, v: Word) {
        let payload = &mut self.closures[c].payload;
        if payload.is_empty() {
            payload.push(v);
        } else {
            payload[0] = v;
        }
    }

    fn blackhole(&self) -> ClosureRef {
        self.blackhole_closure
    }

    fn upd_closure(&self) -> ClosureRef {
        self.upd_closure
    }

    fn upd_return_pc(&self) -> usize {
        0
    }

    fn new_int(&mut self, v: Word) -> ClosureRef {
        if let Some(idx) = Self::small_int_index(v) {
            return self.small_ints[idx].expect("small-int cache fully populated at construction");
        }
        self.allocate(self.izh_con_info, vec![v])
    }

    fn entry_closure(&self) -> ClosureRef {
        self.entry_closure
    }
}

/// Rewrites `oldnode` into an indirection targeting `newnode` (spec §4.7,
/// `UPDATE`'s effect). A free function rather than a trait method: every
/// `Heap` implementation gets the same rewrite in terms of `set_info` /
/// `set_payload0`, so there is nothing implementation-specific left to
/// customize.
pub fn rewrite_as_indirection<H: Heap>(heap: &mut H, oldnode: ClosureRef, newnode: ClosureRef) {
    heap.set_payload0(oldnode, newnode as Word);
    heap.set_info(oldnode, heap.ind_info());
}
