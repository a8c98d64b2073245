//! Errors reported by rampart-core.

/// Errors produced when parsing a FEN string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    /// The FEN has fewer than the four mandatory fields.
    #[error("FEN is missing mandatory fields")]
    MissingFields,

    /// The piece-placement field does not describe 8 ranks.
    #[error("piece placement must have 8 ranks")]
    WrongRankCount,

    /// A rank does not describe exactly 8 files.
    #[error("rank {0:?} does not describe 8 files")]
    BadRank(String),

    /// An unknown piece character.
    #[error("invalid piece character: {0:?}")]
    InvalidPiece(char),

    /// The side-to-move field is not `w` or `b`.
    #[error("invalid side to move: {0:?}")]
    InvalidSideToMove(String),

    /// The castling field contains an unknown character.
    #[error("invalid castling rights: {0:?}")]
    InvalidCastling(String),

    /// The en-passant field is not `-` or a square.
    #[error("invalid en passant square: {0:?}")]
    InvalidEnPassant(String),

    /// A move counter failed to parse.
    #[error("invalid move counter: {0:?}")]
    InvalidCounter(String),
}
