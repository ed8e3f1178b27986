//! Error types for the search core.
//!
//! Search itself is infallible. Everything that can go wrong happens
//! while turning client text into a validated
//! [`AnalysisRequest`](crate::AnalysisRequest), or when a caller asks
//! for an illegal move.

use thiserror::Error;

/// Structural problems with a board string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("expected {expected} cells, got {found}")]
    CellCount { expected: usize, found: usize },

    #[error("expected {expected} columns, got {found}")]
    ColumnCount { expected: usize, found: usize },

    #[error("column {column} holds {height} tokens, at most {max} fit")]
    ColumnOverflow {
        column: usize,
        height: usize,
        max: usize,
    },

    #[error("token {token:?} is not one of {alphabet:?}")]
    UnknownToken { token: char, alphabet: &'static str },

    #[error("piece counts {first} (first player) and {second} (second player) are not a legal turn order")]
    Parity { first: u32, second: u32 },
}

/// Validation failure for an analysis request.
///
/// Reported back to the requesting session; never reaches a worker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("malformed board: {0}")]
    MalformedBoard(#[from] BoardError),

    #[error("invalid depth limit: {0}")]
    InvalidDepthLimit(#[from] DepthLimitError),
}

/// Why a requested depth limit was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DepthLimitError {
    #[error("depth_limit_value is required when depth_limit is set")]
    Missing,

    #[error("depth_limit_value must be between {min} and {max}, got {value}")]
    OutOfRange { value: i64, min: u32, max: u32 },
}

/// An illegal move on an otherwise valid board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("index {0} is off the board")]
    OutOfRange(usize),

    #[error("cell {0} is already taken")]
    Occupied(usize),

    #[error("column {0} is full")]
    ColumnFull(usize),
}
