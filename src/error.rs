//! Error types for the annex pipeline.

use std::io;
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure kinds that can end a pipeline run.
///
/// Every component raises immediately to its caller; the orchestrator
/// propagates to `main`, which logs the failure and maps it to an exit code
/// via [`Error::exit_code`].
#[derive(Error, Debug)]
pub enum Error {
    /// Page load or document fetch failure: connectivity, timeout, or a
    /// non-success HTTP status.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// An expected local file is missing before an operation that needs it.
    #[error("file not found: {0}")]
    NotFound(String),

    /// The PDF could not be opened or parsed at the document level.
    #[error("PDF extraction error: {0}")]
    Extraction(String),

    /// Fewer candidate links were discovered than the selection policy needs.
    #[error("only {found} PDF link(s) discovered, need at least {needed}")]
    InsufficientLinks { found: usize, needed: usize },

    /// A discovered href cannot be resolved into an absolute URL.
    #[error("cannot resolve document reference {href:?}: {source}")]
    InvalidReference {
        href: String,
        #[source]
        source: url::ParseError,
    },

    /// I/O error when reading or writing local files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error serializing rows to CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Exit code for scripted callers; each failure kind gets its own.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Network(_) | Error::InvalidReference { .. } => 2,
            Error::NotFound(_) => 3,
            Error::Extraction(_) => 4,
            Error::InsufficientLinks { .. } => 5,
            Error::Io(_) | Error::Csv(_) => 6,
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::Extraction(err.to_string())
    }
}
