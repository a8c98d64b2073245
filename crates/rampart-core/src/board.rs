//! The board: an immutable-by-value chess position.

use std::fmt;

use crate::bitboard::Bitboard;
use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::piece::{Piece, PieceKind};
use crate::square::Square;

/// A chess position.
///
/// Boards are small `Copy` values; applying a move produces a new
/// board and never mutates the original (see
/// [`make_move`](Board::make_move)).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    pub(crate) by_kind: [Bitboard; PieceKind::COUNT],
    pub(crate) by_color: [Bitboard; Color::COUNT],
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastleRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u16,
    pub(crate) fullmove_number: u16,
}

impl Board {
    /// The standard starting position.
    pub fn starting_position() -> Board {
        crate::fen::STARTING_FEN
            .parse()
            .expect("starting FEN is valid")
    }

    pub(crate) const fn empty() -> Board {
        Board {
            by_kind: [Bitboard::EMPTY; PieceKind::COUNT],
            by_color: [Bitboard::EMPTY; Color::COUNT],
            side_to_move: Color::White,
            castling: CastleRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// All squares occupied by pieces of the given kind (both colors).
    #[inline]
    pub fn pieces(&self, kind: PieceKind) -> Bitboard {
        self.by_kind[kind.index()]
    }

    /// All squares occupied by the given color.
    #[inline]
    pub fn side(&self, color: Color) -> Bitboard {
        self.by_color[color.index()]
    }

    /// All occupied squares.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.by_color[0] | self.by_color[1]
    }

    /// The kind of the piece on `sq`, if any.
    pub fn piece_on(&self, sq: Square) -> Option<PieceKind> {
        if !self.occupied().contains(sq) {
            return None;
        }
        PieceKind::ALL
            .into_iter()
            .find(|&kind| self.by_kind[kind.index()].contains(sq))
    }

    /// The color of the piece on `sq`, if any.
    pub fn color_on(&self, sq: Square) -> Option<Color> {
        if self.by_color[Color::White.index()].contains(sq) {
            Some(Color::White)
        } else if self.by_color[Color::Black.index()].contains(sq) {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// The colored piece on `sq`, if any.
    pub fn colored_piece_on(&self, sq: Square) -> Option<Piece> {
        let color = self.color_on(sq)?;
        let kind = self.piece_on(sq)?;
        Some(Piece::new(color, kind))
    }

    /// The square of the given side's king.
    pub fn king_square(&self, color: Color) -> Square {
        (self.pieces(PieceKind::King) & self.side(color))
            .lsb()
            .expect("board has no king")
    }

    /// The side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// The castling rights still available.
    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    /// The en-passant target square, if the last move was a double push.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Plies since the last capture or pawn move.
    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    /// The full-move number, starting at 1.
    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    pub(crate) fn put_piece(&mut self, piece: Piece, sq: Square) {
        self.by_kind[piece.kind().index()] |= Bitboard::square(sq);
        self.by_color[piece.color().index()] |= Bitboard::square(sq);
    }

    pub(crate) fn remove_piece(&mut self, piece: Piece, sq: Square) {
        self.by_kind[piece.kind().index()] &= !Bitboard::square(sq);
        self.by_color[piece.color().index()] &= !Bitboard::square(sq);
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.to_fen())
    }
}
