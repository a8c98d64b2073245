//! UCI protocol errors.

/// Errors that can occur while handling UCI input.
#[derive(Debug, thiserror::Error)]
pub enum UciError {
    /// The `position` command lacked a `startpos` or `fen` keyword.
    #[error("malformed position command: expected startpos or fen")]
    MalformedPosition,

    /// A FEN string failed to parse.
    #[error("invalid FEN {fen:?}: {source}")]
    InvalidFen {
        /// The offending FEN string.
        fen: String,
        /// The parse failure.
        source: rampart_core::FenError,
    },

    /// A move in the `position` command could not be parsed.
    #[error("invalid move: {uci_move:?}")]
    InvalidMove {
        /// The offending move string.
        uci_move: String,
    },

    /// A `go` parameter was given without its value.
    #[error("missing value for go parameter {param}")]
    MissingGoValue {
        /// The parameter name.
        param: String,
    },

    /// A `go` parameter value failed to parse.
    #[error("invalid value for go parameter {param}: {value:?}")]
    InvalidGoValue {
        /// The parameter name.
        param: String,
        /// The offending value.
        value: String,
    },

    /// Reading stdin failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
