// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for repository and store operations.

use std::fmt;

/// Classifies where a failure originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A repository could not be assembled from its configuration.
    Construction,
    /// A producer, factory, or state producer failed while computing an entry.
    Computation,
    /// The backing store rejected a read or a write.
    Store,
}

impl ErrorKind {
    /// Returns the lowercase name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Construction => "construction",
            Self::Computation => "computation",
            Self::Store => "store",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error from a repository or store operation.
///
/// The [`kind`](Error::kind) tells which stage failed; the underlying cause is
/// available through [`std::error::Error::source()`].
///
/// # Example
///
/// ```
/// use memostore_store::{Error, ErrorKind};
///
/// let error = Error::store("disk unavailable");
/// assert_eq!(error.kind(), ErrorKind::Store);
/// assert!(error.to_string().contains("disk unavailable"));
/// ```
#[ohno::error]
#[display("{kind} failure")]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    /// Creates a construction error, raised while building a repository.
    pub fn construction(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::Construction, cause)
    }

    /// Creates a computation error, raised when a producer fails or panics.
    pub fn computation(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::Computation, cause)
    }

    /// Creates a store error, raised by [`Store`](crate::Store) implementations.
    pub fn store(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::Store, cause)
    }

    /// Returns where this failure originated.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// A specialized [`Result`] type for repository and store operations.
pub type Result<T> = std::result::Result<T, Error>;
