//! Errors raised by the modeling host, mesh I/O and the pipelines

use std::path::PathBuf;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ThimbleError>;

/// All the possible failures we might surface to a caller
#[derive(Debug, thiserror::Error)]
pub enum ThimbleError {
    /// Reading or writing a file failed
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A mesh file could not be parsed
    #[error("malformed input at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The file extension is not one we can read or write
    #[error("unsupported mesh format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// An import produced no geometry, so there is no object to operate on
    #[error("no object after importing {}; check the import path", .0.display())]
    EmptyImport(PathBuf),

    /// A scene operation referenced an object that does not exist
    #[error("no object named `{0}` in the scene")]
    MissingObject(String),

    /// A scene operation that cannot be carried out as asked
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Derived dimensions that cannot form a valid solid
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Pipeline configuration could not be read
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl ThimbleError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
