//! Error types for pagewalk
//!
//! Construction problems surface as [`ConfigError`], loader failures as
//! [`FetchError`]. [`DrainError`] carries the items collected before a
//! failure. The crate-level [`Error`] unifies them with the parse and I/O
//! failures of the configuration layer.

use crate::context::ContextError;
use std::fmt;
use thiserror::Error;

/// Boxed error returned by loaders
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// Construction Errors
// ============================================================================

/// Why a [`Pager`](crate::Pager) could not be built
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("loader required")]
    LoaderRequired,

    #[error("page size must be positive, got {0}")]
    NonPositivePageSize(i64),

    #[error("total must be positive, got {0}")]
    NonPositiveTotal(i64),

    #[error("start position must not be negative, got {0}")]
    NegativeStart(i64),

    #[error("start position must be less than total ({start} >= {total})")]
    StartNotBeforeTotal { start: i64, total: i64 },
}

// ============================================================================
// Fetch Errors
// ============================================================================

/// A loader failure, tagged with the offset it was requested at
#[derive(Error, Debug)]
#[error("offset {offset}: {source}")]
pub struct FetchError {
    offset: i64,
    #[source]
    source: BoxError,
}

impl FetchError {
    /// Wrap a loader failure at `offset`
    pub fn new(offset: i64, source: impl Into<BoxError>) -> Self {
        Self {
            offset,
            source: source.into(),
        }
    }

    /// Offset of the failed fetch
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// The loader's own error
    pub fn cause(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.source.as_ref()
    }

    /// Consume and return the loader's error
    pub fn into_cause(self) -> BoxError {
        self.source
    }

    /// Check if the loader gave up because its context was cancelled or expired
    pub fn is_cancelled(&self) -> bool {
        self.source.downcast_ref::<ContextError>().is_some()
    }
}

/// Failure partway through [`Pager::all`](crate::Pager::all)
///
/// `items` holds everything fetched before the failing call, in fetch order.
#[derive(Debug)]
pub struct DrainError<T> {
    items: Vec<T>,
    source: FetchError,
}

impl<T> fmt::Display for DrainError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} items fetched before the failure)",
            self.source,
            self.items.len()
        )
    }
}

impl<T: fmt::Debug> std::error::Error for DrainError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl<T> DrainError<T> {
    pub(crate) fn new(items: Vec<T>, source: FetchError) -> Self {
        Self { items, source }
    }

    /// Items fetched before the failure
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The failure that stopped the drain
    pub fn fetch_error(&self) -> &FetchError {
        &self.source
    }

    /// Split into the partial result and the failure
    pub fn into_parts(self) -> (Vec<T>, FetchError) {
        (self.items, self.source)
    }
}

// ============================================================================
// Crate Error
// ============================================================================

/// The main error type for pagewalk
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch failed at {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported config format: {path}")]
    UnsupportedFormat { path: String },
}

impl Error {
    /// Create an unsupported format error
    pub fn unsupported_format(path: impl Into<String>) -> Self {
        Self::UnsupportedFormat { path: path.into() }
    }

    /// Offset of the failed fetch, if this is a fetch failure
    pub fn offset(&self) -> Option<i64> {
        match self {
            Error::Fetch(e) => Some(e.offset()),
            _ => None,
        }
    }

    /// Check if retrying the same call can succeed
    ///
    /// Fetch failures leave the pager untouched, so they are retryable unless
    /// the context was cancelled. Configuration problems never are.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Fetch(e) => !e.is_cancelled(),
            _ => false,
        }
    }
}

impl<T> From<DrainError<T>> for Error {
    fn from(err: DrainError<T>) -> Self {
        Error::Fetch(err.source)
    }
}

/// Result type alias for pagewalk
pub type Result<T> = std::result::Result<T, Error>;
