/// Unified error type for the cart crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Cart operations were reached outside of a provider scope.
    #[error("usage error: {0}")]
    Usage(String),

    /// The backing key-value store failed to read or write.
    #[error("storage error: {0}")]
    Storage(String),

    /// The persisted cart snapshot could not be parsed.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Invalid input provided by the caller.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias using [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;
