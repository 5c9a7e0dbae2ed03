//! Error type for recording and serialization.

/// Errors that can occur while finalizing or writing the output tables.
///
/// Any of these is fatal to the owning worker's run: there is no partial
/// flush, so the whole buffered run is at stake. Sibling workers are
/// unaffected.
#[derive(Debug)]
pub enum RecorderError {
    /// I/O error (directory creation, file creation, write).
    Io(String),
    /// Parquet format error.
    Parquet(String),
    /// Arrow table construction error.
    Arrow(String),
}

impl std::fmt::Display for RecorderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
            Self::Parquet(msg) => write!(f, "Parquet error: {}", msg),
            Self::Arrow(msg) => write!(f, "Arrow error: {}", msg),
        }
    }
}

impl std::error::Error for RecorderError {}
