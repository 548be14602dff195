//! Centralized error handling for tabstore.
//!
//! Every fallible store operation returns [`Result`], whose error side is the
//! [`StoreError`] enum. Callers can match on the variant to tell a shape
//! problem from a bad index or an unknown column:
//!
//! ```
//! use tabstore::error::StoreError;
//! use tabstore::TabularStore;
//!
//! let mut store = TabularStore::with_header(["id", "name"], ",").unwrap();
//! match store.add_row(["1"]) {
//!     Err(StoreError::ShapeMismatch { expected, found }) => {
//!         assert_eq!((expected, found), (2, 1));
//!     }
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```
//!
//! ## Context Extension Trait
//!
//! [`ResultExt`] adds `.context()` to any `Result` whose error converts into
//! [`StoreError`]:
//!
//! ```no_run
//! use tabstore::error::ResultExt as _;
//!
//! fn read() -> tabstore::error::Result<String> {
//!     std::fs::read_to_string("data.csv").context("Failed to read source")
//! }
//! ```

use std::fmt;

/// Main error type for tabstore operations.
#[derive(Debug)]
pub enum StoreError {
    /// The source text had no header line.
    EmptySource,

    /// A row or column had the wrong number of values.
    ShapeMismatch { expected: usize, found: usize },

    /// A row or column position outside `0..len`.
    IndexOutOfRange { index: usize, len: usize },

    /// A column name that is not part of the header.
    UnknownColumn(String),

    /// A column name that already appears in the header.
    DuplicateColumn(String),

    /// An empty field delimiter.
    InvalidDelimiter(String),

    /// Source text that does not follow the expected layout.
    MalformedSource { line: usize, reason: String },

    /// I/O errors while reading sources or writing output
    Io(std::io::Error),

    /// Configuration errors
    Config(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySource => write!(f, "Source is empty: no header line found"),
            Self::ShapeMismatch { expected, found } => {
                write!(f, "Shape mismatch: expected {expected} values, found {found}")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "Index {index} is out of range for length {len}")
            }
            Self::UnknownColumn(name) => write!(f, "No such column in header: {name}"),
            Self::DuplicateColumn(name) => write!(f, "Duplicate column in header: {name}"),
            Self::InvalidDelimiter(d) => write!(f, "Invalid delimiter: {d:?}"),
            Self::MalformedSource { line, reason } => {
                write!(f, "Malformed source at line {line}: {reason}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

/// Result type alias for tabstore operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<StoreError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: StoreError = e.into();
            StoreError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: StoreError = e.into();
            StoreError::Other(format!("{}: {}", f(), err))
        })
    }
}
