//! FEN parsing and formatting.

use std::str::FromStr;

use crate::board::Board;
use crate::castle_rights::{CastleRights, CastleSide};
use crate::color::Color;
use crate::error::FenError;
use crate::piece::Piece;
use crate::square::{File, Rank, Square};

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl FromStr for Board {
    type Err = FenError;

    /// Parse a FEN string.
    ///
    /// The halfmove clock and fullmove number are optional and default
    /// to 0 and 1.
    fn from_str(s: &str) -> Result<Board, FenError> {
        let mut fields = s.split_whitespace();
        let placement = fields.next().ok_or(FenError::MissingFields)?;
        let side = fields.next().ok_or(FenError::MissingFields)?;
        let castling = fields.next().ok_or(FenError::MissingFields)?;
        let en_passant = fields.next().ok_or(FenError::MissingFields)?;
        let halfmove = fields.next();
        let fullmove = fields.next();

        let mut board = Board::empty();

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount);
        }
        // First rank in the FEN is rank 8.
        for (row, rank_str) in ranks.iter().enumerate() {
            let rank = Rank::from_index(7 - row as u8).expect("row < 8");
            let mut file_index: u8 = 0;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file_index += skip as u8;
                } else {
                    let piece = Piece::from_fen_char(c).ok_or(FenError::InvalidPiece(c))?;
                    let file =
                        File::from_index(file_index).ok_or_else(|| FenError::BadRank(rank_str.to_string()))?;
                    board.put_piece(piece, Square::new(file, rank));
                    file_index += 1;
                }
            }
            if file_index != 8 {
                return Err(FenError::BadRank(rank_str.to_string()));
            }
        }

        board.side_to_move = match side {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(FenError::InvalidSideToMove(side.to_string())),
        };

        board.castling = CastleRights::NONE;
        if castling != "-" {
            for c in castling.chars() {
                board.castling = match c {
                    'K' => board.castling.with(Color::White, CastleSide::King),
                    'Q' => board.castling.with(Color::White, CastleSide::Queen),
                    'k' => board.castling.with(Color::Black, CastleSide::King),
                    'q' => board.castling.with(Color::Black, CastleSide::Queen),
                    _ => return Err(FenError::InvalidCastling(castling.to_string())),
                };
            }
        }

        board.en_passant = if en_passant == "-" {
            None
        } else {
            Some(
                Square::from_algebraic(en_passant)
                    .ok_or_else(|| FenError::InvalidEnPassant(en_passant.to_string()))?,
            )
        };

        board.halfmove_clock = match halfmove {
            Some(h) => h
                .parse()
                .map_err(|_| FenError::InvalidCounter(h.to_string()))?,
            None => 0,
        };
        board.fullmove_number = match fullmove {
            Some(m) => m
                .parse()
                .map_err(|_| FenError::InvalidCounter(m.to_string()))?,
            None => 1,
        };

        Ok(board)
    }
}

impl Board {
    /// Render the position as a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for row in 0..8 {
            let rank = Rank::from_index(7 - row).expect("row < 8");
            let mut empty = 0;
            for file_index in 0..8 {
                let file = File::from_index(file_index).expect("file < 8");
                let sq = Square::new(file, rank);
                match self.colored_piece_on(sq) {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(piece.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if row != 7 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push_str(&self.side_to_move.to_string());
        fen.push(' ');
        fen.push_str(&self.castling.to_string());
        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq.to_string()),
            None => fen.push('-'),
        }
        fen.push(' ');
        fen.push_str(&self.halfmove_clock.to_string());
        fen.push(' ');
        fen.push_str(&self.fullmove_number.to_string());

        fen
    }
}
