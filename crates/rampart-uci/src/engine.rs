//! Event-driven UCI engine loop.
//!
//! The main thread owns the game state and processes commands from a
//! stdin reader thread; searches run on their own worker thread, which
//! takes ownership of the [`Searcher`] and hands it back when the
//! search completes. Controller and search communicate only through
//! the shared `searching` flag and the settings snapshot taken at
//! `go`.

use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Instant;

use tracing::{debug, warn};

use rampart_core::{zobrist, Board, Move};
use rampart_engine::{SearchSettings, Searcher};

use crate::command::{parse_command, Command, GoParams, PositionCommand};
use crate::error::UciError;

enum EngineState {
    Idle,
    Searching,
}

enum EngineEvent {
    UciCommand(Result<Command, UciError>),
    SearchDone(Box<Searcher>),
    InputClosed,
}

/// The UCI engine: game state plus the searcher.
pub struct UciEngine {
    board: Board,
    moves_played: Vec<Move>,
    position_hashes: Vec<u64>,
    searcher: Option<Box<Searcher>>,
    searching: Arc<AtomicBool>,
    state: EngineState,
    pending_tt_clear: bool,
}

impl UciEngine {
    /// An engine set up at the starting position.
    pub fn new() -> UciEngine {
        let board = Board::starting_position();
        let searcher = Box::new(Searcher::new());
        let searching = searcher.searching_flag();
        UciEngine {
            board,
            moves_played: Vec::new(),
            position_hashes: vec![zobrist::hash_from_scratch(&board)],
            searcher: Some(searcher),
            searching,
            state: EngineState::Idle,
            pending_tt_clear: false,
        }
    }

    /// Run the event loop until `quit` or stdin closes.
    pub fn run(mut self) -> Result<(), UciError> {
        let (tx, rx) = mpsc::channel::<EngineEvent>();

        let stdin_tx = tx.clone();
        std::thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        let trimmed = line.trim();
                        if trimmed.is_empty() {
                            continue;
                        }
                        debug!(command = trimmed, "received");
                        if stdin_tx
                            .send(EngineEvent::UciCommand(parse_command(trimmed)))
                            .is_err()
                        {
                            return;
                        }
                    }
                    Err(_) => break,
                }
            }
            let _ = stdin_tx.send(EngineEvent::InputClosed);
        });

        for event in &rx {
            match event {
                EngineEvent::UciCommand(Ok(command)) => match command {
                    Command::Uci => self.handle_uci(),
                    Command::IsReady => println!("readyok"),
                    Command::UciNewGame => self.handle_ucinewgame(),
                    Command::Position(position) => self.handle_position(position),
                    Command::Go(params) => self.handle_go(params, &tx),
                    Command::PonderHit => {
                        // Pondering beyond the stop-predicate flag is
                        // not implemented; the search keeps running
                        // until told to stop.
                        debug!("ponderhit received");
                    }
                    Command::Stop => self.handle_stop(),
                    Command::Quit => {
                        if !matches!(self.state, EngineState::Idle) {
                            self.handle_stop();
                            for pending in &rx {
                                if let EngineEvent::SearchDone(searcher) = pending {
                                    self.finish_search(searcher);
                                    break;
                                }
                            }
                        }
                        break;
                    }
                    Command::Unknown(_) => {}
                },
                EngineEvent::UciCommand(Err(error)) => {
                    warn!(%error, "ignoring malformed command");
                }
                EngineEvent::SearchDone(searcher) => self.finish_search(searcher),
                EngineEvent::InputClosed => break,
            }
        }

        debug!("rampart shutting down");
        Ok(())
    }

    fn handle_uci(&self) {
        println!("id name rampart");
        println!("id author the rampart developers");
        println!("option name Ponder type check default false");
        println!("uciok");
    }

    fn handle_ucinewgame(&mut self) {
        let board = Board::starting_position();
        self.board = board;
        self.moves_played.clear();
        self.position_hashes = vec![zobrist::hash_from_scratch(&board)];
        match self.searcher.as_mut() {
            Some(searcher) => searcher.clear_ttable(),
            // The worker owns the searcher; clear once it returns.
            None => self.pending_tt_clear = true,
        }
    }

    /// Install a new game state, rebuilding the hash history the
    /// search consumes for repetition detection.
    fn handle_position(&mut self, position: PositionCommand) {
        let mut board = position.board;
        let mut hash = zobrist::hash_from_scratch(&board);
        let mut hashes = vec![hash];
        for &mv in &position.moves {
            let next = board.make_move(mv);
            hash ^= zobrist::incremental_update(mv, &board, &next);
            hashes.push(hash);
            board = next;
        }
        self.board = board;
        self.moves_played = position.moves;
        self.position_hashes = hashes;
    }

    fn handle_go(&mut self, params: GoParams, tx: &mpsc::Sender<EngineEvent>) {
        if !matches!(self.state, EngineState::Idle) {
            warn!("go received while searching, ignoring");
            return;
        }
        let Some(mut searcher) = self.searcher.take() else {
            warn!("searcher unavailable, ignoring go");
            return;
        };
        let start = Instant::now();

        searcher.set_settings(SearchSettings {
            max_depth: params.depth,
            max_nodes: params.nodes,
            movestogo: params.movestogo,
            infinite: params.infinite,
            ponder: params.ponder,
            max_time: params.movetime,
            wtime: params.wtime,
            btime: params.btime,
            winc: params.winc,
            binc: params.binc,
        });

        let board = self.board;
        let moves = self.moves_played.clone();
        let hashes = self.position_hashes.clone();
        let tx = tx.clone();

        self.searching.store(true, Ordering::Release);
        std::thread::spawn(move || {
            searcher.root_search(&board, start, &moves, &hashes);
            let _ = tx.send(EngineEvent::SearchDone(searcher));
        });
        self.state = EngineState::Searching;
    }

    fn handle_stop(&mut self) {
        self.searching.store(false, Ordering::Release);
    }

    fn finish_search(&mut self, mut searcher: Box<Searcher>) {
        if self.pending_tt_clear {
            searcher.clear_ttable();
            self.pending_tt_clear = false;
        }
        self.searcher = Some(searcher);
        self.state = EngineState::Idle;
    }
}

impl Default for UciEngine {
    fn default() -> UciEngine {
        UciEngine::new()
    }
}
