//! Reads the trailing variable-length payload of `___`-format instructions:
//! argument byte lists, case-dispatch tables, and liveness bitmaps (spec
//! §4.4-§4.6 and the "Instruction stream reader" component, §2).
//!
//! The payload lives inline in the same `u32` instruction stream as ordinary
//! instructions; bytes are packed little-endian within each word, matching
//! the bit order `Instruction` itself uses (`OPC` in the low byte).

/// Rounds an argument count up to a whole number of instruction words, four
/// bytes each (spec §4.4, `BC_ROUND`).
pub const fn bc_round(nbytes: usize) -> usize {
    (nbytes + 3) / 4
}

/// A cursor over a code vector's raw instruction words, used to read the
/// payload trailing a `___`-format opcode.
pub struct PayloadReader<'c> {
    code: &'c [u32],
    pos: usize,
}

impl<'c> PayloadReader<'c> {
    /// Starts reading immediately after the instruction at `pos`.
    pub fn new(code: &'c [u32], pos: usize) -> Self {
        Self { code, pos }
    }

    /// Current position, in instruction words, within `code`.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Reads one raw instruction word and advances.
    pub fn next_word(&mut self) -> Option<u32> {
        let w = *self.code.get(self.pos)?;
        self.pos += 1;
        Some(w)
    }

    /// Reads `n` packed bytes (e.g. argument register indices), consuming
    /// `bc_round(n)` whole instruction words, and returns them in stream
    /// order.
    pub fn read_bytes(&mut self, n: usize) -> Option<Vec<u8>> {
        let words = bc_round(n);
        let mut out = Vec::with_capacity(n);
        for _ in 0..words {
            let w = self.next_word()?;
            out.extend_from_slice(&w.to_le_bytes());
        }
        out.truncate(n);
        Some(out)
    }

    /// Skips one liveness-bitmap instruction word (opaque to the core; spec
    /// §9, "Live-out bitmaps").
    pub fn skip_bitmap(&mut self) -> Option<()> {
        self.next_word()?;
        Some(())
    }

    /// Reads a packed dense `CASE` table of `n` tags: `⌈n/2⌉` words, two
    /// 16-bit targets each, low half first (spec §4.5).
    pub fn read_dense_table(&mut self, n: u16) -> Option<Vec<i16>> {
        let n = n as usize;
        let mut targets = Vec::with_capacity(n);
        let words = (n + 1) / 2;
        for i in 0..words {
            let w = self.next_word()?;
            let lo = (w & 0xffff) as u16 as i16;
            let hi = (w >> 16) as u16 as i16;
            targets.push(lo);
            if i * 2 + 1 < n {
                targets.push(hi);
            }
        }
        Some(targets)
    }

    /// Reads a sparse `CASE_S` table: one `[maxtag:16][mintag:16]` header
    /// word followed by `n` `[target:16][tag:16]` entries (spec §4.5).
    pub fn read_sparse_table(&mut self, n: u16) -> Option<SparseTable> {
        let header = self.next_word()?;
        let mintag = (header & 0xffff) as u16;
        let maxtag = (header >> 16) as u16;
        let mut entries = Vec::with_capacity(n as usize);
        for _ in 0..n {
            let w = self.next_word()?;
            let target = (w & 0xffff) as u16 as i16;
            let tag = (w >> 16) as u16;
            entries.push((tag, target));
        }
        Some(SparseTable {
            mintag,
            maxtag,
            entries,
        })
    }
}

/// A decoded `CASE_S` table: sorted `(tag, target)` entries plus the tag
/// range they cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseTable {
    pub mintag: u16,
    pub maxtag: u16,
    /// Ascending by `tag`, as the encoding requires (spec §4.5, invariant 8).
    pub entries: Vec<(u16, i16)>,
}

impl SparseTable {
    /// Binary-search the sorted entries while more than 4 remain, then
    /// linear-search the remainder — matching the exact degrade-to-linear
    /// strategy the spec calls out (§4.5) so that invariant 8 (binary-search
    /// result equals linear-search result) is provable by construction
    /// rather than by coincidence.
    pub fn lookup(&self, tag: u16) -> Option<i16> {
        if tag < self.mintag || tag > self.maxtag {
            return None;
        }
        let mut lo = 0usize;
        let mut hi = self.entries.len();
        while hi - lo > 4 {
            let mid = lo + (hi - lo) / 2;
            match self.entries[mid].0.cmp(&tag) {
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
                std::cmp::Ordering::Equal => return Some(self.entries[mid].1),
            }
        }
        self.entries[lo..hi]
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, target)| *target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bc_round_rounds_up_to_whole_words() {
        assert_eq!(bc_round(0), 0);
        assert_eq!(bc_round(1), 1);
        assert_eq!(bc_round(4), 1);
        assert_eq!(bc_round(5), 2);
    }

    #[test]
    fn read_bytes_packs_little_endian_within_words() {
        let code = [0x0403_0201u32];
        let mut r = PayloadReader::new(&code, 0);
        assert_eq!(r.read_bytes(4), Some(vec![1, 2, 3, 4]));
    }

    #[test]
    fn dense_table_reads_packed_pairs_with_odd_padding() {
        // n=4: [0,5,3,9] packed into two words: (5<<16|0), (9<<16|3)
        let code = [0x0005_0000u32, 0x0009_0003u32];
        let mut r = PayloadReader::new(&code, 0);
        let targets = r.read_dense_table(4).unwrap();
        assert_eq!(targets, vec![0, 5, 3, 9]);
    }

    #[test]
    fn sparse_table_binary_and_linear_search_agree() {
        // mintag=5, maxtag=9; entries (5,->A=1),(7,->B=2),(9,->C=3)
        let header = (9u32 << 16) | 5u32;
        let e1 = (1u32 << 16) | 5u32;
        let e2 = (2u32 << 16) | 7u32;
        let e3 = (3u32 << 16) | 9u32;
        let code = [header, e1, e2, e3];
        let mut r = PayloadReader::new(&code, 0);
        let table = r.read_sparse_table(3).unwrap();
        assert_eq!(table.lookup(6), None);
        assert_eq!(table.lookup(7), Some(2));
        assert_eq!(table.lookup(5), Some(1));
        assert_eq!(table.lookup(9), Some(3));
        assert_eq!(table.lookup(4), None);
        assert_eq!(table.lookup(10), None);
    }
}
