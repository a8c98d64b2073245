//! Transposition table: a direct-address cache of search results.
//!
//! Each slot holds at most one entry; a probe matches only when the
//! full 64-bit key agrees, so index collisions simply miss. The table
//! persists across searches and entries carry the game ply they were
//! stored at as an age, letting stale analysis be overwritten first.

use rampart_core::Move;

/// How a stored score relates to the true value of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Exact score (PV node).
    Pv,
    /// Lower bound: the node failed high (beta cutoff).
    Cut,
    /// Upper bound: no move raised alpha.
    All,
}

/// A stored search result.
#[derive(Debug, Clone, Copy)]
pub struct TtEntry {
    /// Full position hash, for collision rejection.
    pub key: u64,
    /// Depth the entry was searched to.
    pub depth: i16,
    /// Score, raw (no mate-distance adjustment).
    pub eval: i32,
    /// Best move found, or null for fail-low nodes.
    pub best_move: Move,
    /// What the score bounds.
    pub bound: Bound,
    /// Game ply at the root of the search that stored this entry.
    pub age: u32,
}

/// Fixed-capacity transposition table.
pub struct TranspositionTable {
    slots: Box<[Option<TtEntry>]>,
    mask: usize,
}

impl TranspositionTable {
    /// Default size in megabytes.
    pub const DEFAULT_MB: usize = 16;

    /// Create a table of roughly the given size in megabytes.
    ///
    /// The slot count is the largest power of two that fits, so the
    /// index is a mask of the hash's low bits.
    pub fn new(mb: usize) -> TranspositionTable {
        let bytes = mb.max(1) * 1024 * 1024;
        let count = (bytes / std::mem::size_of::<Option<TtEntry>>()).max(1);
        let count = 1usize << (usize::BITS - 1 - count.leading_zeros());
        TranspositionTable {
            slots: vec![None; count].into_boxed_slice(),
            mask: count - 1,
        }
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        hash as usize & self.mask
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Look up the entry for `hash`, if one is stored and matches.
    pub fn probe(&self, hash: u64) -> Option<TtEntry> {
        match self.slots[self.index(hash)] {
            Some(entry) if entry.key == hash => Some(entry),
            _ => None,
        }
    }

    /// Store unconditionally, evicting whatever occupies the slot.
    pub fn store(&mut self, hash: u64, depth: i16, eval: i32, best_move: Move, bound: Bound, age: u32) {
        let index = self.index(hash);
        self.slots[index] = Some(TtEntry {
            key: hash,
            depth,
            eval,
            best_move,
            bound,
            age,
        });
    }

    /// Store unless the slot holds a deeper entry from the same or a
    /// newer search. Prefers keeping deep, fresh analysis.
    pub fn try_store(
        &mut self,
        hash: u64,
        depth: i16,
        eval: i32,
        best_move: Move,
        bound: Bound,
        age: u32,
    ) {
        let index = self.index(hash);
        if let Some(existing) = self.slots[index] {
            if existing.age >= age && existing.depth > depth {
                return;
            }
        }
        self.slots[index] = Some(TtEntry {
            key: hash,
            depth,
            eval,
            best_move,
            bound,
            age,
        });
    }

    /// Drop every entry, keeping the allocation.
    pub fn clear(&mut self) {
        self.slots.fill(None);
    }
}

impl std::fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("capacity", &self.slots.len())
            .finish()
    }
}
