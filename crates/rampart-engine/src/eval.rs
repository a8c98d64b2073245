//! Static evaluation: material plus piece-square tables.
//!
//! Scores are centipawns from the side to move's perspective, the
//! convention the negamax search expects.

use rampart_core::{Board, Color, Move, MoveKind, PieceKind, Square};

/// Base piece values in centipawns, indexed by [`PieceKind::index()`].
pub const PIECE_VALUE: [i32; PieceKind::COUNT] = [100, 320, 330, 500, 900, 0];

// Piece-square tables, written as seen on a diagram (top row = rank 8).
// White reads them through a vertical mirror; Black reads them directly.

#[rustfmt::skip]
const PAWN_PST: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_PST: [i32; 64] = [
   -50,-40,-30,-30,-30,-30,-40,-50,
   -40,-20,  0,  0,  0,  0,-20,-40,
   -30,  0, 10, 15, 15, 10,  0,-30,
   -30,  5, 15, 20, 20, 15,  5,-30,
   -30,  0, 15, 20, 20, 15,  0,-30,
   -30,  5, 10, 15, 15, 10,  5,-30,
   -40,-20,  0,  5,  5,  0,-20,-40,
   -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_PST: [i32; 64] = [
   -20,-10,-10,-10,-10,-10,-10,-20,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -10,  0,  5, 10, 10,  5,  0,-10,
   -10,  5,  5, 10, 10,  5,  5,-10,
   -10,  0, 10, 10, 10, 10,  0,-10,
   -10, 10, 10, 10, 10, 10, 10,-10,
   -10,  5,  0,  0,  0,  0,  5,-10,
   -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_PST: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_PST: [i32; 64] = [
   -20,-10,-10, -5, -5,-10,-10,-20,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -10,  0,  5,  5,  5,  5,  0,-10,
    -5,  0,  5,  5,  5,  5,  0, -5,
     0,  0,  5,  5,  5,  5,  0, -5,
   -10,  5,  5,  5,  5,  5,  0,-10,
   -10,  0,  5,  0,  0,  0,  0,-10,
   -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_PST: [i32; 64] = [
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -20,-30,-30,-40,-40,-30,-30,-20,
   -10,-20,-20,-20,-20,-20,-20,-10,
    20, 20,  0,  0,  0,  0, 20, 20,
    20, 30, 10,  0,  0, 10, 30, 20,
];

const PST: [&[i32; 64]; PieceKind::COUNT] = [
    &PAWN_PST,
    &KNIGHT_PST,
    &BISHOP_PST,
    &ROOK_PST,
    &QUEEN_PST,
    &KING_PST,
];

fn piece_square(kind: PieceKind, color: Color, sq: Square) -> i32 {
    let index = match color {
        Color::White => sq.index() ^ 56,
        Color::Black => sq.index(),
    };
    PST[kind.index()][index]
}

/// Evaluate a position from the side to move's perspective.
pub fn evaluate(board: &Board) -> i32 {
    let mut white = 0;
    let mut black = 0;
    for kind in PieceKind::ALL {
        for sq in board.pieces(kind) & board.side(Color::White) {
            white += PIECE_VALUE[kind.index()] + piece_square(kind, Color::White, sq);
        }
        for sq in board.pieces(kind) & board.side(Color::Black) {
            black += PIECE_VALUE[kind.index()] + piece_square(kind, Color::Black, sq);
        }
    }
    match board.side_to_move() {
        Color::White => white - black,
        Color::Black => black - white,
    }
}

/// Value of the piece a move captures, or 0 for a non-capture.
pub fn capture_value(board: &Board, mv: Move) -> i32 {
    if mv.kind() == MoveKind::EnPassant {
        return PIECE_VALUE[PieceKind::Pawn.index()];
    }
    match board.piece_on(mv.dest()) {
        Some(victim) => PIECE_VALUE[victim.index()],
        None => 0,
    }
}

/// Cheap capture-ordering score: victim value minus attacker value.
///
/// Positive when winning material looks likely; a negative score is
/// the trigger for running the full exchange evaluation.
pub fn mvv_lva(board: &Board, mv: Move) -> i32 {
    let attacker = board
        .piece_on(mv.source())
        .unwrap_or(PieceKind::Pawn);
    capture_value(board, mv) - PIECE_VALUE[attacker.index()]
}
