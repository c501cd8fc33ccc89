use thiserror::Error;

/// Errors produced by typed-value operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("invalid ISO-8601 period {input:?}: {reason}")]
    InvalidPeriod { input: String, reason: String },

    #[error("{0} does not fit in a 64-bit millisecond duration")]
    Overflow(String),
}

/// Convenience alias used throughout the types crate.
pub type Result<T> = std::result::Result<T, TypeError>;
