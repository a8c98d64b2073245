//! The search subsystem: iterative-deepening negamax with alpha-beta
//! pruning, quiescence, null-move pruning, a transposition table, and
//! cooperative cancellation.
//!
//! The searcher owns a running Zobrist hash and a pair of history
//! stacks mirroring the line under consideration. Every recursion
//! level pushes on entry and pops on every exit path — including the
//! cancellation unwind — so the stacks and the hash are restored
//! exactly on return.

pub mod control;
pub mod history;
pub mod ordering;
pub mod see;
pub mod tt;

use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use rampart_core::{generate_moves, is_in_check, zobrist, Board, GenKind, Move};

use crate::eval;
use control::{SearchSettings, TimeController};
use history::HistoryStack;
use ordering::MoveOrderer;
use tt::{Bound, TranspositionTable};

/// Lower bound on every score; also the mated score (no mate-distance
/// adjustment is applied).
pub const NEG_INF: i32 = -500_000;

/// Upper bound on every score.
pub const POS_INF: i32 = 500_000;

/// Ceiling on iterative-deepening depth.
const MAX_ID_DEPTH: u32 = 128;

/// Margin for quiescence delta pruning: a capture is skipped when even
/// this bonus on top of the captured material cannot lift stand-pat
/// back to alpha.
const DELTA_MARGIN: i32 = 200;

/// Unwind token raised when the stop flag clears mid-search.
///
/// Not an error: intermediate frames propagate it untouched (restoring
/// their scoped state on the way out) and only the root driver catches
/// it.
#[derive(Debug)]
struct Cancelled;

/// A root move with its score from the latest completed iteration.
#[derive(Debug, Clone, Copy)]
struct RootMove {
    mv: Move,
    score: i32,
}

/// Iterative-deepening searcher.
pub struct Searcher {
    settings: SearchSettings,
    tt: Option<TranspositionTable>,
    searching: Arc<AtomicBool>,
    timer: TimeController,
    history: HistoryStack,
    nodes: u64,
    hash: u64,
    current_depth: u32,
    root_moves: Vec<RootMove>,
    main_pv: Vec<Move>,
    eval: i32,
}

impl Searcher {
    /// A searcher with a default-sized transposition table.
    pub fn new() -> Searcher {
        Searcher::with_ttable(Some(TranspositionTable::new(TranspositionTable::DEFAULT_MB)))
    }

    /// A searcher with no transposition table (and therefore no
    /// hashing): still correct, just slower.
    pub fn without_ttable() -> Searcher {
        Searcher::with_ttable(None)
    }

    fn with_ttable(tt: Option<TranspositionTable>) -> Searcher {
        let settings = SearchSettings::default();
        let timer = TimeController::new(&settings, rampart_core::Color::White, 0, Instant::now());
        Searcher {
            settings,
            tt,
            searching: Arc::new(AtomicBool::new(false)),
            timer,
            history: HistoryStack::new(),
            nodes: 0,
            hash: 0,
            current_depth: 0,
            root_moves: Vec::new(),
            main_pv: Vec::new(),
            eval: NEG_INF,
        }
    }

    /// Install the limits for subsequent searches.
    pub fn set_settings(&mut self, settings: SearchSettings) {
        self.settings = settings;
    }

    /// Install or remove the transposition table.
    pub fn set_ttable(&mut self, tt: Option<TranspositionTable>) {
        self.tt = tt;
    }

    /// Clear the transposition table, keeping its allocation.
    pub fn clear_ttable(&mut self) {
        if let Some(tt) = self.tt.as_mut() {
            tt.clear();
        }
    }

    /// The cooperative stop flag. The controller raises it before
    /// dispatching a search and clears it to cancel; the search clears
    /// it itself once a limit is hit.
    pub fn searching_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.searching)
    }

    /// Score of the best root move from the latest iteration.
    pub fn eval(&self) -> i32 {
        self.eval
    }

    /// Nodes visited by the last search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Best move found by the last search, if the root had any moves.
    pub fn best_move(&self) -> Option<Move> {
        self.root_moves.first().map(|root| root.mv)
    }

    /// Principal variation of the last search.
    pub fn principal_variation(&self) -> &[Move] {
        &self.main_pv
    }

    /// Search `board` and print telemetry and the chosen move.
    ///
    /// `start` is the instant the controller received the command, so
    /// reported times include dispatch latency. `move_history` and
    /// `position_history` describe the game so far; the last entry of
    /// `position_history` is the hash of `board` itself. Returns after
    /// emitting `bestmove`; the stop flag is clear on return.
    pub fn root_search(
        &mut self,
        board: &Board,
        start: Instant,
        move_history: &[Move],
        position_history: &[u64],
    ) {
        self.timer = TimeController::new(
            &self.settings,
            board.side_to_move(),
            position_history.len(),
            start,
        );
        self.nodes = 0;
        self.current_depth = 0;
        self.eval = NEG_INF;
        self.history.seed(move_history, position_history);
        self.hash = if self.tt.is_some() {
            position_history
                .last()
                .copied()
                .unwrap_or_else(|| zobrist::hash_from_scratch(board))
        } else {
            0
        };

        self.root_moves.clear();
        for &mv in &generate_moves(board, GenKind::All) {
            self.root_moves.push(RootMove { mv, score: NEG_INF });
        }
        self.main_pv.clear();

        if self.root_moves.is_empty() {
            self.searching.store(false, Ordering::Release);
            emit(format_args!("bestmove 0000"));
            return;
        }

        'deepening: for depth in 1..=MAX_ID_DEPTH {
            debug!(depth, "starting iteration");
            self.current_depth = depth;
            let mut worst_case = NEG_INF;
            let mut child_pv: Vec<Move> = Vec::new();

            for i in 0..self.root_moves.len() {
                if !self.searching.load(Ordering::Acquire) {
                    // Abandoned mid-iteration: the standing order still
                    // reflects the last completed iteration.
                    break 'deepening;
                }
                let mv = self.root_moves[i].mv;
                let child = board.make_move(mv);
                let old_hash = self.hash;
                if self.tt.is_some() {
                    self.hash ^= zobrist::incremental_update(mv, board, &child);
                }
                self.history.push_move(mv);
                child_pv.clear();

                let outcome = self.alpha_beta(
                    &child,
                    &mut child_pv,
                    NEG_INF,
                    -worst_case,
                    depth as i32 - 1,
                    false,
                );
                self.history.pop_move();
                self.hash = old_hash;

                let score = match outcome {
                    Ok(value) => -value,
                    Err(Cancelled) => break 'deepening,
                };
                self.root_moves[i].score = score;
                if score > worst_case {
                    worst_case = score;
                    self.main_pv.clear();
                    self.main_pv.push(mv);
                    self.main_pv.extend_from_slice(&child_pv);
                }
            }

            self.root_moves.sort_by(|a, b| b.score.cmp(&a.score));
            self.eval = self.root_moves[0].score;
            self.print_pv();

            if let Some(max_depth) = self.settings.max_depth {
                if depth >= max_depth {
                    break;
                }
            }
        }

        self.searching.store(false, Ordering::Release);
        emit(format_args!("bestmove {}", self.root_moves[0].mv));
    }

    /// Negamax with alpha-beta pruning.
    ///
    /// Returns the score of `board` from its side to move's
    /// perspective, or unwinds with [`Cancelled`] when the stop flag
    /// has been cleared. On success `pv` holds this node's principal
    /// variation whenever the node turned out to be a PV node.
    fn alpha_beta(
        &mut self,
        board: &Board,
        pv: &mut Vec<Move>,
        alpha: i32,
        beta: i32,
        depth: i32,
        null_branch: bool,
    ) -> Result<i32, Cancelled> {
        if depth <= 0 {
            return self.quiesce(board, alpha, beta, depth);
        }

        if self.should_stop() {
            self.searching.store(false, Ordering::Release);
        }
        self.periodic_update();

        if board.halfmove_clock() == 50 {
            return Ok(0);
        }

        self.history.push_position(self.hash);
        let result = self.alpha_beta_frame(board, pv, alpha, beta, depth, null_branch);
        self.history.pop_position();
        result
    }

    /// Body of [`alpha_beta`]; the caller owns the position push/pop.
    fn alpha_beta_frame(
        &mut self,
        board: &Board,
        pv: &mut Vec<Move>,
        mut alpha: i32,
        beta: i32,
        depth: i32,
        null_branch: bool,
    ) -> Result<i32, Cancelled> {
        if self.tt.is_some() && self.history.threefold() {
            return Ok(0);
        }
        self.nodes += 1;

        if let Some(tt) = self.tt.as_ref() {
            if let Some(entry) = tt.probe(self.hash) {
                if i32::from(entry.depth) > depth {
                    match entry.bound {
                        // An exact entry is used for ordering only; the
                        // node is re-searched so the PV stays intact.
                        Bound::Pv => {}
                        Bound::All if entry.eval < alpha => return Ok(entry.eval),
                        Bound::Cut if entry.eval > beta => return Ok(entry.eval),
                        _ => {}
                    }
                }
            }
        }

        let mut child_pv: Vec<Move> = Vec::new();

        // Null move: hand the opponent a free shot at reduced depth.
        // If passing still fails high, the real position surely would.
        if !null_branch && !is_in_check(board) {
            let null_child = board.make_null();
            let old_hash = self.hash;
            if self.tt.is_some() {
                self.hash ^= zobrist::null_update(board);
            }
            self.history.push_move(Move::NULL);
            let outcome = self.alpha_beta(
                &null_child,
                &mut child_pv,
                -beta,
                -beta + 1,
                depth - 3,
                true,
            );
            self.history.pop_move();
            self.hash = old_hash;
            let null_eval = -outcome?;
            if null_eval >= beta {
                return Ok(null_eval);
            }
            // The speculative line is worthless as a PV.
            child_pv.clear();
        }

        let mut node_type = Bound::All;
        let mut top_move = Move::NULL;
        let mut best_eval = NEG_INF;
        let mut moves_searched = 0usize;
        let age = self.history.initial_positions() as u32;
        let mut orderer = MoveOrderer::new(self.tt.as_ref(), board, self.hash);

        while let Some(mv) = orderer.next(board) {
            if !self.searching.load(Ordering::Acquire) {
                return Err(Cancelled);
            }
            moves_searched += 1;

            let child = board.make_move(mv);
            let old_hash = self.hash;
            if self.tt.is_some() {
                self.hash ^= zobrist::incremental_update(mv, board, &child);
            }
            self.history.push_move(mv);
            child_pv.clear();

            let outcome =
                self.alpha_beta(&child, &mut child_pv, -beta, -alpha, depth - 1, null_branch);
            self.history.pop_move();
            self.hash = old_hash;

            let current = -outcome?;
            if current > best_eval {
                best_eval = current;
            }
            if best_eval >= beta {
                if let Some(tt) = self.tt.as_mut() {
                    tt.try_store(self.hash, depth as i16, best_eval, mv, Bound::Cut, age);
                }
                return Ok(best_eval);
            }
            if current >= alpha {
                node_type = Bound::Pv;
                top_move = mv;
                alpha = current;
                pv.clear();
                pv.push(mv);
                pv.extend_from_slice(&child_pv);
            }
        }

        if moves_searched == 0 {
            return Ok(if is_in_check(board) { NEG_INF } else { 0 });
        }

        if let Some(tt) = self.tt.as_mut() {
            match node_type {
                Bound::Pv => tt.store(self.hash, depth as i16, best_eval, top_move, Bound::Pv, age),
                _ => tt.try_store(self.hash, depth as i16, best_eval, top_move, Bound::All, age),
            }
        }
        Ok(best_eval)
    }

    /// Quiescence search: resolve captures (and check evasions) so the
    /// static evaluation is only ever taken in quiet positions.
    ///
    /// `depth` is non-positive here; it only feeds telemetry and the
    /// transposition-table depth comparison.
    fn quiesce(
        &mut self,
        board: &Board,
        alpha: i32,
        beta: i32,
        depth: i32,
    ) -> Result<i32, Cancelled> {
        self.history.push_position(self.hash);
        let result = self.quiesce_frame(board, alpha, beta, depth);
        self.history.pop_position();
        result
    }

    /// Body of [`quiesce`]; the caller owns the position push/pop.
    fn quiesce_frame(
        &mut self,
        board: &Board,
        mut alpha: i32,
        beta: i32,
        depth: i32,
    ) -> Result<i32, Cancelled> {
        if self.tt.is_some() && self.history.threefold() {
            return Ok(0);
        }
        if board.halfmove_clock() == 50 {
            return Ok(0);
        }
        if self.should_stop() {
            self.searching.store(false, Ordering::Release);
        }
        self.nodes += 1;

        if let Some(tt) = self.tt.as_ref() {
            if let Some(entry) = tt.probe(self.hash) {
                if i32::from(entry.depth) > depth {
                    match entry.bound {
                        Bound::Pv => return Ok(entry.eval),
                        Bound::All if entry.eval < alpha => return Ok(entry.eval),
                        Bound::Cut if entry.eval > beta => return Ok(entry.eval),
                        _ => {}
                    }
                }
            }
        }

        let mut moves = generate_moves(board, GenKind::Captures);
        let capture_count = moves.len();
        let check = is_in_check(board);

        let mut stand_pat = NEG_INF;
        if !check {
            stand_pat = eval::evaluate(board);
            if stand_pat >= beta {
                return Ok(stand_pat);
            }
            if stand_pat >= alpha {
                alpha = stand_pat;
            }
        }

        if moves.is_empty() {
            // No captures: mate and stalemate must still be told apart.
            let quiets = generate_moves(board, GenKind::Quiets);
            if !check {
                return Ok(if quiets.is_empty() { 0 } else { stand_pat });
            }
            if quiets.is_empty() {
                return Ok(NEG_INF);
            }
            // In check with quiet evasions only: search them below.
            moves = quiets;
        }

        let mut scores = [0i32; 256];
        for i in 0..capture_count {
            scores[i] = eval::mvv_lva(board, moves[i]);
        }

        let mut current_eval = stand_pat;
        let mut i = 0;
        while i < moves.len() {
            if i + 1 < capture_count {
                let mut best = i;
                for j in (i + 1)..capture_count {
                    if scores[j] > scores[best] {
                        best = j;
                    }
                }
                moves.swap(i, best);
                scores.swap(i, best);
            }
            let mv = moves[i];

            if i < capture_count {
                // Delta pruning: even a generous margin on top of the
                // captured material cannot reach alpha.
                if !check && eval::capture_value(board, mv) + DELTA_MARGIN + stand_pat <= alpha {
                    i += 1;
                    continue;
                }
                // Lazy exchange check for captures that look losing.
                if scores[i] < 0 && see::see(board, mv) < 0 {
                    if check && i + 1 == capture_count {
                        for &quiet in &generate_moves(board, GenKind::Quiets) {
                            moves.push(quiet);
                        }
                    }
                    i += 1;
                    continue;
                }
            }

            if !self.searching.load(Ordering::Acquire) {
                return Err(Cancelled);
            }

            let child = board.make_move(mv);
            let old_hash = self.hash;
            if self.tt.is_some() {
                self.hash ^= zobrist::incremental_update(mv, board, &child);
            }
            self.history.push_move(mv);

            let outcome = self.quiesce(&child, -beta, -alpha, depth - 1);
            self.history.pop_move();
            self.hash = old_hash;

            let score = -outcome?;
            if score > current_eval {
                current_eval = score;
            }
            if current_eval > alpha {
                alpha = current_eval;
            }
            if alpha >= beta {
                return Ok(current_eval);
            }

            // Once the captures run dry while in check, fall back to
            // quiet evasions.
            if check && i + 1 == capture_count {
                for &quiet in &generate_moves(board, GenKind::Quiets) {
                    moves.push(quiet);
                }
            }
            i += 1;
        }

        Ok(current_eval)
    }

    fn should_stop(&self) -> bool {
        self.timer.should_stop(self.nodes)
    }

    /// Periodic `info` telemetry, at most one line every two seconds.
    fn periodic_update(&mut self) {
        if self.timer.should_emit_update() {
            let seconds = self.timer.elapsed().as_secs();
            if seconds > 0 {
                emit(format_args!(
                    "info depth {} nodes {} nps {}",
                    self.current_depth,
                    self.nodes,
                    self.nodes / seconds
                ));
            }
        }
    }

    /// Emit the `info` line for a completed iteration.
    fn print_pv(&self) {
        let millis = self.timer.elapsed().as_millis().max(1);
        let nps = self.nodes as u128 * 1000 / millis;
        let pv = self
            .main_pv
            .iter()
            .map(|mv| mv.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        emit(format_args!(
            "info depth {} score cp {} time {} nodes {} nps {} pv {}",
            self.current_depth, self.eval, millis, self.nodes, nps, pv
        ));
    }
}

/// Write one protocol line to stdout and flush.
///
/// Write failures are swallowed: a vanished controller must not unwind
/// through the search.
fn emit(args: fmt::Arguments<'_>) {
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_fmt(args);
    let _ = stdout.write_all(b"\n");
    let _ = stdout.flush();
}

impl Default for Searcher {
    fn default() -> Searcher {
        Searcher::new()
    }
}

impl std::fmt::Debug for Searcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Searcher")
            .field("nodes", &self.nodes)
            .field("depth", &self.current_depth)
            .field("tt", &self.tt.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A searcher primed the way `root_search` would prime it, ready
    /// for direct `alpha_beta` calls.
    fn prepared(board: &Board, with_tt: bool) -> Searcher {
        let mut searcher = if with_tt {
            Searcher::new()
        } else {
            Searcher::without_ttable()
        };
        searcher.searching.store(true, Ordering::Release);
        let hash = if with_tt {
            zobrist::hash_from_scratch(board)
        } else {
            0
        };
        searcher.hash = hash;
        searcher.history.seed(&[], &[hash]);
        searcher
    }

    fn full_window_search(board: &Board, depth: i32, with_tt: bool) -> i32 {
        let mut searcher = prepared(board, with_tt);
        let mut pv = Vec::new();
        searcher
            .alpha_beta(board, &mut pv, NEG_INF, POS_INF, depth, false)
            .expect("no limits set, search cannot be cancelled")
    }

    #[test]
    fn stalemate_scores_zero() {
        let board: Board = "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1".parse().unwrap();
        for depth in 1..=4 {
            assert_eq!(full_window_search(&board, depth, true), 0);
        }
    }

    #[test]
    fn checkmated_position_scores_neg_inf() {
        let board: Board = "7k/6Q1/5K2/8/8/8/8/8 b - - 0 1".parse().unwrap();
        assert_eq!(full_window_search(&board, 3, true), NEG_INF);
    }

    #[test]
    fn fifty_move_counter_draws() {
        let board: Board = "7k/8/8/8/8/8/8/R6K w - - 50 1".parse().unwrap();
        assert_eq!(full_window_search(&board, 3, true), 0);
        // The quiescence path applies the same rule.
        assert_eq!(full_window_search(&board, 0, true), 0);
    }

    #[test]
    fn threefold_returns_zero_without_searching() {
        let board = Board::starting_position();
        let mut searcher = prepared(&board, true);
        let hash = searcher.hash;
        // Two same-side occurrences already in the game history; the
        // node itself is the third.
        searcher.history.seed(&[], &[hash, 0xAAAA, hash, 0xBBBB]);
        let mut pv = Vec::new();
        let result = searcher
            .alpha_beta(&board, &mut pv, NEG_INF, POS_INF, 5, false)
            .unwrap();
        assert_eq!(result, 0);
        assert_eq!(searcher.nodes, 0, "draw must be detected before expanding the node");
    }

    #[test]
    fn history_and_hash_restored_after_search() {
        let board: Board = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
            .parse()
            .unwrap();
        let mut searcher = prepared(&board, true);
        let hash_before = searcher.hash;
        let len_before = searcher.history.len();
        let mut pv = Vec::new();
        searcher
            .alpha_beta(&board, &mut pv, NEG_INF, POS_INF, 3, false)
            .unwrap();
        assert_eq!(searcher.hash, hash_before);
        assert_eq!(searcher.history.len(), len_before);
        assert_eq!(searcher.history.ply(), 0);
    }

    #[test]
    fn history_and_hash_restored_after_cancellation() {
        let board = Board::starting_position();
        let mut searcher = prepared(&board, true);
        let settings = SearchSettings {
            max_nodes: Some(50),
            ..SearchSettings::default()
        };
        searcher.timer =
            TimeController::new(&settings, rampart_core::Color::White, 0, Instant::now());
        let hash_before = searcher.hash;
        let len_before = searcher.history.len();
        let mut pv = Vec::new();
        let outcome = searcher.alpha_beta(&board, &mut pv, NEG_INF, POS_INF, 8, false);
        assert!(outcome.is_err(), "node cap must cancel the search");
        assert_eq!(searcher.hash, hash_before);
        assert_eq!(searcher.history.len(), len_before);
        assert!(!searcher.searching.load(Ordering::Acquire));
    }

    #[test]
    fn negamax_symmetry_on_mirrored_positions() {
        // Mirrored quiet positions must agree on the score seen by
        // their respective sides to move.
        let pairs = [
            (
                "4k3/8/8/8/8/2N5/PPP5/4K3 w - - 0 1",
                "4k3/ppp5/2n5/8/8/8/8/4K3 b - - 0 1",
            ),
            (
                "4k3/8/8/8/8/8/PPP5/4K3 w - - 0 1",
                "4k3/ppp5/8/8/8/8/8/4K3 b - - 0 1",
            ),
        ];
        for (white_fen, black_fen) in pairs {
            let white: Board = white_fen.parse().unwrap();
            let black: Board = black_fen.parse().unwrap();
            assert_eq!(
                full_window_search(&white, 1, false),
                full_window_search(&black, 1, false),
                "asymmetry between {white_fen} and {black_fen}"
            );
        }
    }

    #[test]
    fn widening_the_window_never_lowers_the_score() {
        let board = Board::starting_position();
        for depth in 1..=2 {
            let narrow = {
                let mut searcher = prepared(&board, false);
                let mut pv = Vec::new();
                searcher
                    .alpha_beta(&board, &mut pv, -10, 10, depth, false)
                    .unwrap()
            };
            let wide = full_window_search(&board, depth, false);
            assert!(
                wide >= narrow,
                "wide {wide} < narrow {narrow} at depth {depth}"
            );
        }
    }

    #[test]
    fn tt_cut_entry_short_circuits() {
        let board = Board::starting_position();
        let mut searcher = prepared(&board, true);
        let hash = searcher.hash;
        searcher
            .tt
            .as_mut()
            .unwrap()
            .store(hash, 10, 5_000, Move::NULL, Bound::Cut, 0);
        let mut pv = Vec::new();
        // Lower bound 5000 lies above beta = 100.
        let result = searcher.alpha_beta(&board, &mut pv, -100, 100, 3, false).unwrap();
        assert_eq!(result, 5_000);
        assert_eq!(searcher.nodes, 1, "cutoff must come straight from the table");
    }

    #[test]
    fn tt_all_entry_short_circuits_below_alpha() {
        let board = Board::starting_position();
        let mut searcher = prepared(&board, true);
        let hash = searcher.hash;
        searcher
            .tt
            .as_mut()
            .unwrap()
            .store(hash, 10, -5_000, Move::NULL, Bound::All, 0);
        let mut pv = Vec::new();
        let result = searcher.alpha_beta(&board, &mut pv, -100, 100, 3, false).unwrap();
        assert_eq!(result, -5_000);
    }

    #[test]
    fn tt_exact_entry_is_not_returned_by_main_search() {
        let board = Board::starting_position();
        let mut searcher = prepared(&board, true);
        let hash = searcher.hash;
        // A wildly wrong "exact" score: the main search must re-search
        // rather than trust it.
        searcher
            .tt
            .as_mut()
            .unwrap()
            .store(hash, 10, 123_456, Move::NULL, Bound::Pv, 0);
        let mut pv = Vec::new();
        let result = searcher.alpha_beta(&board, &mut pv, -100, 100, 2, false).unwrap();
        assert_ne!(result, 123_456);
    }

    #[test]
    fn tt_exact_entry_is_returned_by_quiescence() {
        let board = Board::starting_position();
        let mut searcher = prepared(&board, true);
        let hash = searcher.hash;
        searcher
            .tt
            .as_mut()
            .unwrap()
            .store(hash, 10, 777, Move::NULL, Bound::Pv, 0);
        let mut pv = Vec::new();
        // Depth 0 delegates straight to quiescence, which honors
        // exact entries.
        let result = searcher.alpha_beta(&board, &mut pv, NEG_INF, POS_INF, 0, false).unwrap();
        assert_eq!(result, 777);
    }

    #[test]
    fn null_move_prunes_nodes_in_won_positions() {
        let board: Board = "1k6/ppp5/8/8/8/8/PPP5/1KQ5 w - - 0 1".parse().unwrap();

        let mut with_null = prepared(&board, false);
        let mut pv = Vec::new();
        let score_with = with_null
            .alpha_beta(&board, &mut pv, -50, 50, 4, false)
            .unwrap();

        let mut without_null = prepared(&board, false);
        let mut pv = Vec::new();
        let score_without = without_null
            .alpha_beta(&board, &mut pv, -50, 50, 4, true)
            .unwrap();

        assert!(
            with_null.nodes < without_null.nodes,
            "null move should shrink the tree: {} vs {}",
            with_null.nodes,
            without_null.nodes
        );
        // Both classify the node the same way: fail-high.
        assert!(score_with >= 50);
        assert!(score_without >= 50);
    }

    #[test]
    fn pv_moves_are_legal_along_the_line() {
        let board: Board = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3"
            .parse()
            .unwrap();
        let mut searcher = prepared(&board, true);
        let mut pv = Vec::new();
        searcher
            .alpha_beta(&board, &mut pv, NEG_INF, POS_INF, 4, false)
            .unwrap();
        assert!(!pv.is_empty());
        let mut position = board;
        for mv in pv {
            let legal = generate_moves(&position, GenKind::All);
            assert!(
                legal.as_slice().contains(&mv),
                "PV move {mv} is illegal in {}",
                position.to_fen()
            );
            position = position.make_move(mv);
        }
    }

    #[test]
    fn root_search_finds_mate_in_one() {
        let board: Board = "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1".parse().unwrap();
        let hash = zobrist::hash_from_scratch(&board);
        let mut searcher = Searcher::new();
        searcher.set_settings(SearchSettings {
            max_depth: Some(2),
            ..SearchSettings::default()
        });
        searcher.searching_flag().store(true, Ordering::Release);
        searcher.root_search(&board, Instant::now(), &[], &[hash]);

        let best = searcher.best_move().expect("position has moves");
        assert_eq!(best.to_string(), "a1a8");
        assert!(searcher.eval() > POS_INF / 2, "mate score expected, got {}", searcher.eval());
        assert_eq!(searcher.principal_variation()[0], best);
        assert!(!searcher.searching_flag().load(Ordering::Acquire));
    }

    #[test]
    fn root_search_depth_one_basics() {
        let board = Board::starting_position();
        let hash = zobrist::hash_from_scratch(&board);
        let mut searcher = Searcher::new();
        searcher.set_settings(SearchSettings {
            max_depth: Some(1),
            ..SearchSettings::default()
        });
        searcher.searching_flag().store(true, Ordering::Release);
        searcher.root_search(&board, Instant::now(), &[], &[hash]);

        let best = searcher.best_move().expect("starting position has moves");
        let legal = generate_moves(&board, GenKind::All);
        assert!(legal.as_slice().contains(&best));
        assert_eq!(searcher.principal_variation().len(), 1);
        assert!(searcher.eval().abs() < POS_INF);
    }

    #[test]
    fn root_search_with_no_moves_reports_null() {
        let board: Board = "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1".parse().unwrap();
        let hash = zobrist::hash_from_scratch(&board);
        let mut searcher = Searcher::new();
        searcher.searching_flag().store(true, Ordering::Release);
        searcher.root_search(&board, Instant::now(), &[], &[hash]);
        assert_eq!(searcher.best_move(), None);
        assert!(!searcher.searching_flag().load(Ordering::Acquire));
    }

    #[test]
    fn identical_searches_agree() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        let board: Board = fen.parse().unwrap();
        let hash = zobrist::hash_from_scratch(&board);
        let settings = SearchSettings {
            max_depth: Some(4),
            ..SearchSettings::default()
        };

        let run = || {
            let mut searcher = Searcher::new();
            searcher.set_settings(settings.clone());
            searcher.searching_flag().store(true, Ordering::Release);
            searcher.root_search(&board, Instant::now(), &[], &[hash]);
            (
                searcher.best_move(),
                searcher.eval(),
                searcher.principal_variation().to_vec(),
            )
        };

        let (best_a, eval_a, pv_a) = run();
        let (best_b, eval_b, pv_b) = run();
        assert_eq!(best_a, best_b);
        assert_eq!(eval_a, eval_b);
        assert_eq!(pv_a, pv_b);
    }

    #[test]
    fn max_nodes_limit_stops_root_search() {
        let board = Board::starting_position();
        let hash = zobrist::hash_from_scratch(&board);
        let mut searcher = Searcher::new();
        searcher.set_settings(SearchSettings {
            max_nodes: Some(2_000),
            ..SearchSettings::default()
        });
        searcher.searching_flag().store(true, Ordering::Release);
        searcher.root_search(&board, Instant::now(), &[], &[hash]);
        assert!(searcher.best_move().is_some());
        assert!(!searcher.searching_flag().load(Ordering::Acquire));
    }
}
