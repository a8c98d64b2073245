//! Move ordering for the main search.
//!
//! Moves are handed out one at a time: the transposition-table move
//! first, then captures in MVV/LVA order, then quiet moves in
//! generator order. A capture whose cheap score is negative gets a
//! full exchange evaluation on demand; if that also comes out
//! negative the capture is deferred behind the quiets rather than
//! searched among the good captures.

use rampart_core::{generate_moves, Board, GenKind, Move, MoveList};

use crate::eval;
use crate::search::see::see;
use crate::search::tt::TranspositionTable;

enum Stage {
    TtMove,
    Captures,
    Quiets,
    BadCaptures,
}

/// Staged move supplier for one node.
pub struct MoveOrderer {
    moves: MoveList,
    scores: [i32; 256],
    capture_count: usize,
    bad_captures: MoveList,
    tt_move: Move,
    stage: Stage,
    cursor: usize,
    bad_cursor: usize,
}

impl MoveOrderer {
    /// Generate and stage the legal moves of `board`.
    ///
    /// The table move is taken from the slot for `hash`; a stored move
    /// that is not actually available in this position (an index
    /// collision) is silently dropped.
    pub fn new(tt: Option<&TranspositionTable>, board: &Board, hash: u64) -> MoveOrderer {
        let mut moves = generate_moves(board, GenKind::Captures);
        let capture_count = moves.len();
        for &quiet in &generate_moves(board, GenKind::Quiets) {
            moves.push(quiet);
        }

        let mut scores = [0i32; 256];
        for i in 0..capture_count {
            scores[i] = eval::mvv_lva(board, moves[i]);
        }

        let mut tt_move = tt
            .and_then(|tt| tt.probe(hash))
            .map(|entry| entry.best_move)
            .unwrap_or(Move::NULL);
        if !tt_move.is_null() && !moves.as_slice().contains(&tt_move) {
            tt_move = Move::NULL;
        }

        MoveOrderer {
            moves,
            scores,
            capture_count,
            bad_captures: MoveList::new(),
            tt_move,
            stage: Stage::TtMove,
            cursor: 0,
            bad_cursor: 0,
        }
    }

    /// Hand out the next move, or `None` when every move has been
    /// yielded exactly once.
    pub fn next(&mut self, board: &Board) -> Option<Move> {
        loop {
            match self.stage {
                Stage::TtMove => {
                    self.stage = Stage::Captures;
                    if !self.tt_move.is_null() {
                        return Some(self.tt_move);
                    }
                }
                Stage::Captures => {
                    if self.cursor >= self.capture_count {
                        self.stage = Stage::Quiets;
                        continue;
                    }
                    // Selection pass: bring the best remaining capture
                    // to the cursor.
                    let mut best = self.cursor;
                    for i in (self.cursor + 1)..self.capture_count {
                        if self.scores[i] > self.scores[best] {
                            best = i;
                        }
                    }
                    self.moves.swap(self.cursor, best);
                    self.scores.swap(self.cursor, best);

                    let mv = self.moves[self.cursor];
                    let cheap_score = self.scores[self.cursor];
                    self.cursor += 1;

                    if mv == self.tt_move {
                        continue;
                    }
                    if cheap_score < 0 && see(board, mv) < 0 {
                        self.bad_captures.push(mv);
                        continue;
                    }
                    return Some(mv);
                }
                Stage::Quiets => {
                    if self.cursor >= self.moves.len() {
                        self.stage = Stage::BadCaptures;
                        continue;
                    }
                    let mv = self.moves[self.cursor];
                    self.cursor += 1;
                    if mv == self.tt_move {
                        continue;
                    }
                    return Some(mv);
                }
                Stage::BadCaptures => {
                    if self.bad_cursor >= self.bad_captures.len() {
                        return None;
                    }
                    let mv = self.bad_captures[self.bad_cursor];
                    self.bad_cursor += 1;
                    return Some(mv);
                }
            }
        }
    }
}
