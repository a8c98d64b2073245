//! Castling availability flags.

use std::fmt;

use crate::color::Color;
use crate::square::Square;

/// Which wing a castling move is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastleSide {
    King,
    Queen,
}

const WHITE_KING: u8 = 0b0001;
const WHITE_QUEEN: u8 = 0b0010;
const BLACK_KING: u8 = 0b0100;
const BLACK_QUEEN: u8 = 0b1000;

/// The set of castling rights still available, packed into four bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastleRights(u8);

impl CastleRights {
    /// No rights remain.
    pub const NONE: CastleRights = CastleRights(0);

    /// All four rights available.
    pub const ALL: CastleRights = CastleRights(0b1111);

    /// Return the packed bits (0..16).
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    const fn mask(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::King) => WHITE_KING,
            (Color::White, CastleSide::Queen) => WHITE_QUEEN,
            (Color::Black, CastleSide::King) => BLACK_KING,
            (Color::Black, CastleSide::Queen) => BLACK_QUEEN,
        }
    }

    /// Whether the given right is still available.
    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::mask(color, side) != 0
    }

    /// The rights with one right added.
    pub const fn with(self, color: Color, side: CastleSide) -> CastleRights {
        CastleRights(self.0 | Self::mask(color, side))
    }

    /// The rights remaining after a move touches `sq`.
    ///
    /// Moving from, or capturing on, a king or rook home square voids
    /// the corresponding rights; any move of the king voids both of a
    /// side's rights because the king square is stripped.
    pub const fn strip_square(self, sq: Square) -> CastleRights {
        let cleared = match sq.index() {
            0 => WHITE_QUEEN,              // a1
            4 => WHITE_KING | WHITE_QUEEN, // e1
            7 => WHITE_KING,               // h1
            56 => BLACK_QUEEN,             // a8
            60 => BLACK_KING | BLACK_QUEEN, // e8
            63 => BLACK_KING,              // h8
            _ => 0,
        };
        CastleRights(self.0 & !cleared)
    }
}

impl fmt::Display for CastleRights {
    /// FEN rendering: `KQkq` subset, or `-` when empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "-");
        }
        if self.0 & WHITE_KING != 0 {
            write!(f, "K")?;
        }
        if self.0 & WHITE_QUEEN != 0 {
            write!(f, "Q")?;
        }
        if self.0 & BLACK_KING != 0 {
            write!(f, "k")?;
        }
        if self.0 & BLACK_QUEEN != 0 {
            write!(f, "q")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::{File, Rank};

    #[test]
    fn all_has_everything() {
        for color in [Color::White, Color::Black] {
            for side in [CastleSide::King, CastleSide::Queen] {
                assert!(CastleRights::ALL.has(color, side));
                assert!(!CastleRights::NONE.has(color, side));
            }
        }
    }

    #[test]
    fn king_square_strips_both() {
        let e1 = Square::new(File::E, Rank::R1);
        let rights = CastleRights::ALL.strip_square(e1);
        assert!(!rights.has(Color::White, CastleSide::King));
        assert!(!rights.has(Color::White, CastleSide::Queen));
        assert!(rights.has(Color::Black, CastleSide::King));
        assert!(rights.has(Color::Black, CastleSide::Queen));
    }

    #[test]
    fn rook_square_strips_one_wing() {
        let h8 = Square::new(File::H, Rank::R8);
        let rights = CastleRights::ALL.strip_square(h8);
        assert!(!rights.has(Color::Black, CastleSide::King));
        assert!(rights.has(Color::Black, CastleSide::Queen));
        assert!(rights.has(Color::White, CastleSide::King));
    }

    #[test]
    fn unrelated_square_strips_nothing() {
        let e4 = Square::new(File::E, Rank::R4);
        assert_eq!(CastleRights::ALL.strip_square(e4), CastleRights::ALL);
    }

    #[test]
    fn display_fen() {
        assert_eq!(CastleRights::ALL.to_string(), "KQkq");
        assert_eq!(CastleRights::NONE.to_string(), "-");
        let white_only = CastleRights::NONE
            .with(Color::White, CastleSide::King)
            .with(Color::White, CastleSide::Queen);
        assert_eq!(white_only.to_string(), "KQ");
    }
}
