use std::path::PathBuf;

/// Errors from building file values.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    /// A required argument was missing or empty.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// The path does not name a readable file.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Opening or reading the source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for file value operations.
pub type FileResult<T> = Result<T, FileError>;
