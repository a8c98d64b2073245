//! UCI command parsing.

use std::time::Duration;

use rampart_core::{Board, Move};

use crate::error::UciError;

/// Parameters of the `go` command. All optional; a bare `go` searches
/// without limits.
#[derive(Debug, Clone, Default)]
pub struct GoParams {
    /// White's remaining clock time.
    pub wtime: Option<Duration>,
    /// Black's remaining clock time.
    pub btime: Option<Duration>,
    /// White's increment per move.
    pub winc: Option<Duration>,
    /// Black's increment per move.
    pub binc: Option<Duration>,
    /// Moves until the next time control.
    pub movestogo: Option<u32>,
    /// Maximum search depth.
    pub depth: Option<u32>,
    /// Exact time to spend on this move.
    pub movetime: Option<Duration>,
    /// Maximum nodes to search.
    pub nodes: Option<u64>,
    /// Search until `stop`.
    pub infinite: bool,
    /// Ponder on the opponent's expected move.
    pub ponder: bool,
}

/// A `position` command: the initial board plus the moves played from
/// it. The moves are kept separate so the engine can rebuild the
/// position-hash history the search needs for repetition detection.
#[derive(Debug, Clone)]
pub struct PositionCommand {
    /// The board before any of `moves` is applied.
    pub board: Board,
    /// Moves played from `board`, already context-parsed.
    pub moves: Vec<Move>,
}

/// A parsed UCI command.
#[derive(Debug)]
pub enum Command {
    /// `uci` -- identify the engine.
    Uci,
    /// `isready` -- synchronization ping.
    IsReady,
    /// `ucinewgame` -- reset game state.
    UciNewGame,
    /// `position` -- set up the current game.
    Position(PositionCommand),
    /// `go` -- start a search.
    Go(GoParams),
    /// `ponderhit` -- the pondered move was played.
    PonderHit,
    /// `stop` -- halt the search.
    Stop,
    /// `quit` -- exit.
    Quit,
    /// Anything unrecognized; ignored per UCI convention.
    Unknown(String),
}

/// Parse one line of UCI input.
pub fn parse_command(line: &str) -> Result<Command, UciError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(&first) = tokens.first() else {
        return Ok(Command::Unknown(String::new()));
    };

    match first {
        "uci" => Ok(Command::Uci),
        "isready" => Ok(Command::IsReady),
        "ucinewgame" => Ok(Command::UciNewGame),
        "ponderhit" => Ok(Command::PonderHit),
        "stop" => Ok(Command::Stop),
        "quit" => Ok(Command::Quit),
        "position" => parse_position(&tokens[1..]),
        "go" => parse_go(&tokens[1..]),
        _ => Ok(Command::Unknown(first.to_string())),
    }
}

/// Parse `position startpos|fen <fen> [moves ...]`.
fn parse_position(tokens: &[&str]) -> Result<Command, UciError> {
    if tokens.is_empty() {
        return Err(UciError::MalformedPosition);
    }

    let (board, rest) = if tokens[0] == "startpos" {
        (Board::starting_position(), &tokens[1..])
    } else if tokens[0] == "fen" {
        // A full FEN is six space-separated fields.
        if tokens.len() < 7 {
            return Err(UciError::MalformedPosition);
        }
        let fen = tokens[1..7].join(" ");
        let board: Board = fen.parse().map_err(|source| UciError::InvalidFen {
            fen: fen.clone(),
            source,
        })?;
        (board, &tokens[7..])
    } else {
        return Err(UciError::MalformedPosition);
    };

    let mut moves = Vec::new();
    if let Some((&"moves", move_tokens)) = rest.split_first() {
        // Each move is parsed in the context of the position it is
        // played from.
        let mut current = board;
        for token in move_tokens {
            let mv = Move::from_uci(token, &current).ok_or_else(|| UciError::InvalidMove {
                uci_move: token.to_string(),
            })?;
            current = current.make_move(mv);
            moves.push(mv);
        }
    }

    Ok(Command::Position(PositionCommand { board, moves }))
}

/// Parse the `go` parameter list. Unknown tokens are skipped.
fn parse_go(tokens: &[&str]) -> Result<Command, UciError> {
    let mut params = GoParams::default();

    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            "wtime" => {
                params.wtime = Some(parse_millis(tokens.get(i + 1), "wtime")?);
                i += 2;
            }
            "btime" => {
                params.btime = Some(parse_millis(tokens.get(i + 1), "btime")?);
                i += 2;
            }
            "winc" => {
                params.winc = Some(parse_millis(tokens.get(i + 1), "winc")?);
                i += 2;
            }
            "binc" => {
                params.binc = Some(parse_millis(tokens.get(i + 1), "binc")?);
                i += 2;
            }
            "movestogo" => {
                params.movestogo = Some(parse_number(tokens.get(i + 1), "movestogo")?);
                i += 2;
            }
            "depth" => {
                params.depth = Some(parse_number(tokens.get(i + 1), "depth")?);
                i += 2;
            }
            "movetime" => {
                params.movetime = Some(parse_millis(tokens.get(i + 1), "movetime")?);
                i += 2;
            }
            "nodes" => {
                params.nodes = Some(parse_number(tokens.get(i + 1), "nodes")?);
                i += 2;
            }
            "infinite" => {
                params.infinite = true;
                i += 1;
            }
            "ponder" => {
                params.ponder = true;
                i += 1;
            }
            _ => {
                i += 1;
            }
        }
    }

    Ok(Command::Go(params))
}

fn parse_millis(token: Option<&&str>, param: &str) -> Result<Duration, UciError> {
    let value: u64 = parse_number(token, param)?;
    Ok(Duration::from_millis(value))
}

fn parse_number<T: std::str::FromStr>(token: Option<&&str>, param: &str) -> Result<T, UciError> {
    let value = token.ok_or_else(|| UciError::MissingGoValue {
        param: param.to_string(),
    })?;
    value.parse().map_err(|_| UciError::InvalidGoValue {
        param: param.to_string(),
        value: value.to_string(),
    })
}
