//! Error types shared across the crate.

use std::fmt;

/// Errors produced while building or querying an index.
#[derive(Debug)]
pub enum Error {
    /// A query string failed tokenization, stopword validation, or
    /// operator/operand structure checks.
    InvalidQuery(String),

    /// A postings-list codec could not encode or decode a value (e.g. a
    /// gap too large for the codec's representable range).
    EncodeError(String),

    /// An on-disk structure failed a format check (bad magic bytes,
    /// truncated record, unsupported version).
    Format {
        message: String,
        expected: Option<String>,
        actual: Option<String>,
    },

    /// Propagated filesystem I/O failure.
    Io(std::io::Error),

    /// An operation that requires a built index was attempted before one
    /// exists on disk (or before it was loaded).
    NotIndexed(String),

    /// An invariant the caller is responsible for upholding was violated
    /// (e.g. passing an unsorted slice to the sorted-list algebra).
    ProgrammingError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidQuery(msg) => write!(f, "invalid query: {msg}"),
            Error::EncodeError(msg) => write!(f, "encode error: {msg}"),
            Error::Format {
                message,
                expected,
                actual,
            } => {
                write!(f, "format error: {message}")?;
                if let Some(expected) = expected {
                    write!(f, " (expected {expected}")?;
                    if let Some(actual) = actual {
                        write!(f, ", got {actual}")?;
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
            Error::Io(err) => write!(f, "I/O error: {err}"),
            Error::NotIndexed(msg) => write!(f, "not indexed: {msg}"),
            Error::ProgrammingError(msg) => write!(f, "programming error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<postcard::Error> for Error {
    fn from(err: postcard::Error) -> Self {
        Error::Format {
            message: format!("identifier map serialization failed: {err}"),
            expected: None,
            actual: None,
        }
    }
}

impl From<fst::Error> for Error {
    fn from(err: fst::Error) -> Self {
        Error::Format {
            message: format!("term dictionary failed: {err}"),
            expected: None,
            actual: None,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
