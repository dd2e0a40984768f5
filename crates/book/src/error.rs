//! Order book error types

use thiserror::Error;

/// Errors surfaced by the order book
#[derive(Error, Debug)]
pub enum BookError {
    /// The submitted order failed validation; the book was not mutated
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// A snapshot for a different pair was offered to this book
    #[error("Snapshot pair mismatch: expected {expected}, got {actual}")]
    PairMismatch { expected: String, actual: String },
}

pub type BookResult<T> = Result<T, BookError>;
