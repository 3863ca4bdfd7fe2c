use crate::core::hash::HashKind;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SamplingError {
    #[error("Cannot sample a degenerate image ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Invalid target size {width}x{height}")]
    InvalidTarget { width: u32, height: u32 },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashComputationError {
    #[error("Sampling failed: {0}")]
    Sampling(#[from] SamplingError),

    #[error("Grid extraction failed: {message}")]
    Extraction { message: String },
}

/// Raised when two hashes cannot be compared. Always a usage error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IncompatibleHashError {
    #[error("Cannot compare {left} hash with {right} hash")]
    KindMismatch { left: HashKind, right: HashKind },

    #[error("Cannot compare hashes of {left} and {right} bits")]
    BitCountMismatch { left: usize, right: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseHashError {
    #[error("Empty hash string")]
    Empty,

    #[error("Invalid character {found:?} at position {position}")]
    InvalidCharacter { found: char, position: usize },

    #[error("Expected {expected} units of storage, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("Invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Unknown hash kind: {0}")]
    UnknownKind(String),
}
