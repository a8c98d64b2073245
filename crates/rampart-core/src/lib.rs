//! Core chess types for rampart: board representation, move generation,
//! and Zobrist hashing.

mod attacks;
mod bitboard;
mod board;
mod castle_rights;
mod chess_move;
mod color;
mod error;
mod fen;
mod make_move;
mod movegen;
mod perft;
mod piece;
mod square;
pub mod zobrist;

pub use attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks,
};
pub use bitboard::Bitboard;
pub use board::Board;
pub use castle_rights::{CastleRights, CastleSide};
pub use chess_move::{Move, MoveKind, PromotionPiece};
pub use color::Color;
pub use error::FenError;
pub use fen::STARTING_FEN;
pub use movegen::{generate_moves, is_in_check, is_square_attacked, GenKind, MoveList};
pub use perft::perft;
pub use piece::{Piece, PieceKind};
pub use square::{File, Rank, Square};
