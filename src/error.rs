//! Error types for the log store

use thiserror::Error;

use crate::types::{IndexId, StreamId};

pub type Result<T> = std::result::Result<T, LogStoreError>;

/// Coarse classification of a [`LogStoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad index or store configuration.
    Configuration,
    /// Malformed insert or query input.
    Validation,
    /// Reference to something that does not exist.
    NotFound,
}

#[derive(Error, Debug)]
pub enum LogStoreError {
    // -- Configuration ---------------------------------------------------------

    #[error("Token length must be at least 1 byte")]
    ZeroTokenLength,

    #[error("Invalid prefix depth {max_prefix_depth} for token length {token_len} (expected 1..={token_len})")]
    InvalidPrefixDepth { token_len: usize, max_prefix_depth: usize },

    #[error("Index budget exhausted (max {0} indexes)")]
    IndexBudgetExhausted(usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -- Validation ------------------------------------------------------------

    #[error("Unknown index: {0}")]
    UnknownIndex(IndexId),

    #[error("Token length mismatch for index {index_id}: expected {expected}, got {actual}")]
    TokenLengthMismatch { index_id: IndexId, expected: usize, actual: usize },

    #[error("Duplicate token for index {0}")]
    DuplicateToken(IndexId),

    #[error("Missing token for index {0}")]
    MissingToken(IndexId),

    #[error("Header length mismatch: expected {expected}, got {actual}")]
    HeaderLengthMismatch { expected: usize, actual: usize },

    #[error("Header too large: {actual} bytes (max {max})")]
    HeaderTooLarge { max: usize, actual: usize },

    #[error("Empty conjunction at position {0}")]
    EmptyConjunction(usize),

    #[error("Invalid prefix length {prefix_len} for index {index_id} (expected 1..={token_len})")]
    InvalidPrefixLength { index_id: IndexId, prefix_len: usize, token_len: usize },

    #[error("Prefix for index {index_id} has {actual} bytes, prefix length is {prefix_len}")]
    PrefixTooShort { index_id: IndexId, prefix_len: usize, actual: usize },

    // -- Not found -------------------------------------------------------------

    #[error("Stream not found: {0}")]
    StreamNotFound(StreamId),
}

impl LogStoreError {
    /// Which class of failure this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LogStoreError::ZeroTokenLength
            | LogStoreError::InvalidPrefixDepth { .. }
            | LogStoreError::IndexBudgetExhausted(_)
            | LogStoreError::InvalidConfig(_)
            | LogStoreError::Json(_) => ErrorKind::Configuration,
            LogStoreError::UnknownIndex(_)
            | LogStoreError::TokenLengthMismatch { .. }
            | LogStoreError::DuplicateToken(_)
            | LogStoreError::MissingToken(_)
            | LogStoreError::HeaderLengthMismatch { .. }
            | LogStoreError::HeaderTooLarge { .. }
            | LogStoreError::EmptyConjunction(_)
            | LogStoreError::InvalidPrefixLength { .. }
            | LogStoreError::PrefixTooShort { .. } => ErrorKind::Validation,
            LogStoreError::StreamNotFound(_) => ErrorKind::NotFound,
        }
    }

    /// Stable error code for callers that forward errors over a wire.
    pub fn code(&self) -> &'static str {
        match self {
            LogStoreError::ZeroTokenLength => "ZERO_TOKEN_LENGTH",
            LogStoreError::InvalidPrefixDepth { .. } => "INVALID_PREFIX_DEPTH",
            LogStoreError::IndexBudgetExhausted(_) => "INDEX_BUDGET_EXHAUSTED",
            LogStoreError::InvalidConfig(_) | LogStoreError::Json(_) => "INVALID_CONFIG",
            LogStoreError::UnknownIndex(_) => "UNKNOWN_INDEX",
            LogStoreError::TokenLengthMismatch { .. } => "TOKEN_LENGTH_MISMATCH",
            LogStoreError::DuplicateToken(_) => "DUPLICATE_TOKEN",
            LogStoreError::MissingToken(_) => "MISSING_TOKEN",
            LogStoreError::HeaderLengthMismatch { .. } => "HEADER_LENGTH_MISMATCH",
            LogStoreError::HeaderTooLarge { .. } => "HEADER_TOO_LARGE",
            LogStoreError::EmptyConjunction(_) => "EMPTY_CONJUNCTION",
            LogStoreError::InvalidPrefixLength { .. } => "INVALID_PREFIX_LENGTH",
            LogStoreError::PrefixTooShort { .. } => "PREFIX_TOO_SHORT",
            LogStoreError::StreamNotFound(_) => "STREAM_NOT_FOUND",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(LogStoreError::IndexBudgetExhausted(22).kind(), ErrorKind::Configuration);
        assert_eq!(
            LogStoreError::InvalidPrefixDepth { token_len: 2, max_prefix_depth: 3 }.kind(),
            ErrorKind::Configuration
        );
        assert_eq!(LogStoreError::UnknownIndex(1024).kind(), ErrorKind::Validation);
        assert_eq!(LogStoreError::EmptyConjunction(0).kind(), ErrorKind::Validation);
        assert_eq!(LogStoreError::StreamNotFound(7).kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_every_input_rejection_is_validation() {
        let rejections = [
            LogStoreError::UnknownIndex(1024),
            LogStoreError::TokenLengthMismatch { index_id: 1024, expected: 4, actual: 3 },
            LogStoreError::DuplicateToken(1024),
            LogStoreError::MissingToken(2048),
            LogStoreError::HeaderLengthMismatch { expected: 40, actual: 39 },
            LogStoreError::HeaderTooLarge { max: 16, actual: 17 },
            LogStoreError::EmptyConjunction(1),
            LogStoreError::InvalidPrefixLength { index_id: 1024, prefix_len: 0, token_len: 4 },
            LogStoreError::PrefixTooShort { index_id: 1024, prefix_len: 3, actual: 2 },
        ];
        for err in &rejections {
            assert_eq!(err.kind(), ErrorKind::Validation, "{}", err.code());
        }
    }

    #[test]
    fn test_error_codes_and_messages() {
        let err = LogStoreError::TokenLengthMismatch { index_id: 2048, expected: 4, actual: 3 };
        assert_eq!(err.code(), "TOKEN_LENGTH_MISMATCH");
        assert_eq!(
            err.to_string(),
            "Token length mismatch for index 2048: expected 4, got 3"
        );

        let err = LogStoreError::StreamNotFound(3);
        assert_eq!(err.code(), "STREAM_NOT_FOUND");
        assert_eq!(err.to_string(), "Stream not found: 3");
    }

    #[test]
    fn test_json_error_is_configuration() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = LogStoreError::from(parse_err);
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.code(), "INVALID_CONFIG");
    }
}
