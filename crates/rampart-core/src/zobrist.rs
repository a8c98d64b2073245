//! Zobrist position hashing.
//!
//! The search owns a running 64-bit hash and folds XOR deltas into it
//! as moves are applied and unmade; this module supplies the key
//! material, the from-scratch hash, and the per-move deltas.

use crate::board::Board;
use crate::chess_move::{Move, MoveKind};
use crate::color::Color;
use crate::piece::{Piece, PieceKind};
use crate::square::{File, Square};

struct Keys {
    piece_square: [[u64; 64]; Piece::COUNT],
    side_to_move: u64,
    castling: [u64; 16],
    en_passant_file: [u64; 8],
}

const SEED: u64 = 0x5241_4D50_4152_5421; // "RAMPART!"

/// One step of splitmix64. Returns (output, next state).
const fn splitmix64(state: u64) -> (u64, u64) {
    let state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    (z ^ (z >> 31), state)
}

static KEYS: Keys = {
    let mut keys = Keys {
        piece_square: [[0; 64]; Piece::COUNT],
        side_to_move: 0,
        castling: [0; 16],
        en_passant_file: [0; 8],
    };
    let mut state = SEED;
    let mut piece = 0;
    while piece < Piece::COUNT {
        let mut sq = 0;
        while sq < 64 {
            let (key, next) = splitmix64(state);
            keys.piece_square[piece][sq] = key;
            state = next;
            sq += 1;
        }
        piece += 1;
    }
    let (key, next) = splitmix64(state);
    keys.side_to_move = key;
    state = next;
    let mut i = 0;
    while i < 16 {
        let (key, next) = splitmix64(state);
        keys.castling[i] = key;
        state = next;
        i += 1;
    }
    let mut i = 0;
    while i < 8 {
        let (key, next) = splitmix64(state);
        keys.en_passant_file[i] = key;
        state = next;
        i += 1;
    }
    keys
};

#[inline]
fn piece_key(piece: Piece, sq: Square) -> u64 {
    KEYS.piece_square[piece.index()][sq.index()]
}

fn en_passant_key(ep: Option<Square>) -> u64 {
    match ep {
        Some(sq) => KEYS.en_passant_file[sq.file().index()],
        None => 0,
    }
}

/// Compute the hash of a position from scratch.
pub fn hash_from_scratch(board: &Board) -> u64 {
    let mut hash = 0u64;
    for color in [Color::White, Color::Black] {
        for kind in PieceKind::ALL {
            for sq in board.pieces(kind) & board.side(color) {
                hash ^= piece_key(Piece::new(color, kind), sq);
            }
        }
    }
    if board.side_to_move() == Color::Black {
        hash ^= KEYS.side_to_move;
    }
    hash ^= KEYS.castling[board.castling().bits() as usize];
    hash ^= en_passant_key(board.en_passant());
    hash
}

/// The XOR delta between a position and its successor under `mv`.
///
/// `before` must be the position the move was applied to and `after`
/// the board returned by [`Board::make_move`]; folding the delta into
/// a running hash of `before` yields the hash of `after`.
pub fn incremental_update(mv: Move, before: &Board, after: &Board) -> u64 {
    let us = before.side_to_move();
    let them = !us;
    let src = mv.source();
    let dst = mv.dest();

    let mut delta = KEYS.side_to_move;
    delta ^= KEYS.castling[before.castling().bits() as usize]
        ^ KEYS.castling[after.castling().bits() as usize];
    delta ^= en_passant_key(before.en_passant()) ^ en_passant_key(after.en_passant());

    let moved = before.piece_on(src).expect("move source square is empty");
    match mv.kind() {
        MoveKind::Normal => {
            delta ^= piece_key(Piece::new(us, moved), src) ^ piece_key(Piece::new(us, moved), dst);
            if let Some(victim) = before.piece_on(dst) {
                delta ^= piece_key(Piece::new(them, victim), dst);
            }
        }
        MoveKind::Promotion => {
            delta ^= piece_key(Piece::new(us, PieceKind::Pawn), src)
                ^ piece_key(Piece::new(us, mv.promotion_piece().kind()), dst);
            if let Some(victim) = before.piece_on(dst) {
                delta ^= piece_key(Piece::new(them, victim), dst);
            }
        }
        MoveKind::EnPassant => {
            let dr = if us == Color::White { -1 } else { 1 };
            let captured = dst.offset(0, dr).expect("en passant capture off board");
            delta ^= piece_key(Piece::new(us, PieceKind::Pawn), src)
                ^ piece_key(Piece::new(us, PieceKind::Pawn), dst)
                ^ piece_key(Piece::new(them, PieceKind::Pawn), captured);
        }
        MoveKind::Castling => {
            delta ^= piece_key(Piece::new(us, PieceKind::King), src)
                ^ piece_key(Piece::new(us, PieceKind::King), dst);
            let rank = src.rank();
            let (rook_src, rook_dst) = if dst.file() == File::G {
                (Square::new(File::H, rank), Square::new(File::F, rank))
            } else {
                (Square::new(File::A, rank), Square::new(File::D, rank))
            };
            delta ^= piece_key(Piece::new(us, PieceKind::Rook), rook_src)
                ^ piece_key(Piece::new(us, PieceKind::Rook), rook_dst);
        }
    }
    delta
}

/// The XOR delta for a null move applied to `board`.
///
/// A null move flips the side to move and clears the en-passant
/// square; nothing else changes.
pub fn null_update(board: &Board) -> u64 {
    KEYS.side_to_move ^ en_passant_key(board.en_passant())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::{generate_moves, GenKind};

    const FENS: [&str; 5] = [
        crate::fen::STARTING_FEN,
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3",
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 b - - 0 1",
    ];

    #[test]
    fn keys_are_distinct() {
        let mut all: Vec<u64> = KEYS
            .piece_square
            .iter()
            .flatten()
            .copied()
            .chain(KEYS.castling)
            .chain(KEYS.en_passant_file)
            .chain([KEYS.side_to_move])
            .collect();
        let n = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), n, "Zobrist keys collide");
    }

    #[test]
    fn different_positions_hash_differently() {
        let hashes: Vec<u64> = FENS
            .iter()
            .map(|fen| hash_from_scratch(&fen.parse().unwrap()))
            .collect();
        for i in 0..hashes.len() {
            for j in (i + 1)..hashes.len() {
                assert_ne!(hashes[i], hashes[j]);
            }
        }
    }

    #[test]
    fn incremental_matches_scratch_for_every_move() {
        for fen in FENS {
            let board: Board = fen.parse().unwrap();
            let before = hash_from_scratch(&board);
            for &mv in &generate_moves(&board, GenKind::All) {
                let child = board.make_move(mv);
                let delta = incremental_update(mv, &board, &child);
                assert_eq!(
                    before ^ delta,
                    hash_from_scratch(&child),
                    "delta mismatch for {mv} in {fen}"
                );
            }
        }
    }

    #[test]
    fn incremental_matches_two_plies_deep() {
        let board: Board = FENS[1].parse().unwrap();
        for &mv in &generate_moves(&board, GenKind::All) {
            let mid = board.make_move(mv);
            let mid_hash = hash_from_scratch(&board) ^ incremental_update(mv, &board, &mid);
            for &reply in &generate_moves(&mid, GenKind::All) {
                let leaf = mid.make_move(reply);
                assert_eq!(
                    mid_hash ^ incremental_update(reply, &mid, &leaf),
                    hash_from_scratch(&leaf)
                );
            }
        }
    }

    #[test]
    fn null_update_matches_scratch() {
        for fen in FENS {
            let board: Board = fen.parse().unwrap();
            let null = board.make_null();
            assert_eq!(
                hash_from_scratch(&board) ^ null_update(&board),
                hash_from_scratch(&null),
                "null delta mismatch for {fen}"
            );
        }
    }

    #[test]
    fn side_to_move_changes_hash() {
        let board = Board::starting_position();
        let flipped = board.make_null();
        assert_ne!(hash_from_scratch(&board), hash_from_scratch(&flipped));
    }
}
