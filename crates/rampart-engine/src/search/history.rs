//! The line currently being searched: position hashes and moves.
//!
//! Two parallel stacks are seeded from the game history at the start
//! of a search; a watermark separates pre-search history from
//! search-local entries. Every recursion level pushes on entry and
//! pops on every exit path, so the stacks always mirror the current
//! line exactly.

use rampart_core::Move;

/// Parallel stacks of position hashes and moves along the current line.
#[derive(Debug, Default)]
pub struct HistoryStack {
    positions: Vec<u64>,
    moves: Vec<Move>,
    initial_positions: usize,
    initial_moves: usize,
}

impl HistoryStack {
    /// An empty history.
    pub fn new() -> HistoryStack {
        HistoryStack::default()
    }

    /// Replace the contents with the game history and record the
    /// watermarks that mark where search-local entries begin.
    pub fn seed(&mut self, moves: &[Move], positions: &[u64]) {
        self.moves.clear();
        self.moves.extend_from_slice(moves);
        self.positions.clear();
        self.positions.extend_from_slice(positions);
        self.initial_moves = self.moves.len();
        self.initial_positions = self.positions.len();
    }

    #[inline]
    pub fn push_position(&mut self, hash: u64) {
        self.positions.push(hash);
    }

    #[inline]
    pub fn pop_position(&mut self) {
        self.positions.pop();
    }

    #[inline]
    pub fn push_move(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    #[inline]
    pub fn pop_move(&mut self) {
        self.moves.pop();
    }

    /// Distance from the search root, in plies.
    pub fn ply(&self) -> usize {
        self.positions.len() - self.initial_positions
    }

    /// Number of pre-search positions; doubles as the age tag for
    /// transposition-table entries.
    pub fn initial_positions(&self) -> usize {
        self.initial_positions
    }

    /// Number of positions currently on the stack.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the stack holds no positions at all.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Whether the position on top of the stack has occurred at least
    /// three times at the same side to move.
    ///
    /// Scans downward in steps of two: a repetition requires the same
    /// side to move, so odd distances can never match and are not
    /// inspected.
    pub fn threefold(&self) -> bool {
        let Some(&current) = self.positions.last() else {
            return false;
        };
        self.positions
            .iter()
            .rev()
            .step_by(2)
            .filter(|&&hash| hash == current)
            .take(3)
            .count()
            >= 3
    }
}
