use core::fmt;
use std::error;

/// The error type returned by deferred query adapters.
///
/// Adapters never translate or suppress faults: a failing source surfaces as
/// [`Error::Source`] with the upstream error untouched, and terminal
/// operations fail with the same condition their synchronous counterpart
/// reports.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// The cancellation token was already triggered when the adapter ran.
    Cancelled,
    /// A terminal operation required at least one element.
    EmptySequence,
    /// [`single`][crate::query::QueryExt::single] found more than one element.
    MultipleElements,
    /// [`element_at`][crate::query::QueryExt::element_at] reached past the
    /// end of the sequence.
    IndexOutOfRange,
    /// [`to_hash_map`][crate::query::QueryExt::to_hash_map] produced the same
    /// key twice.
    DuplicateKey,
    /// Resolving the deferred source itself failed.
    Source(Box<dyn error::Error + Send + Sync>),
}

impl Error {
    /// Wraps an upstream failure so it can travel through a query unchanged.
    pub fn from_source(err: impl Into<Box<dyn error::Error + Send + Sync>>) -> Self {
        Self::Source(err.into())
    }

    /// Returns `true` if this error is [`Error::Cancelled`].
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "the operation was cancelled"),
            Self::EmptySequence => write!(f, "sequence contains no elements"),
            Self::MultipleElements => write!(f, "sequence contains more than one element"),
            Self::IndexOutOfRange => write!(f, "index was outside the bounds of the sequence"),
            Self::DuplicateKey => write!(f, "an element with the same key has already been added"),
            Self::Source(err) => write!(f, "{err}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Source(err) => Some(&**err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_match_the_synchronous_layer() {
        assert_eq!(
            Error::EmptySequence.to_string(),
            "sequence contains no elements"
        );
        assert_eq!(
            Error::DuplicateKey.to_string(),
            "an element with the same key has already been added"
        );
    }

    #[test]
    fn source_is_transparent() {
        let inner = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err = Error::from_source(inner);
        assert_eq!(err.to_string(), "boom");
        assert!(error::Error::source(&err).is_some());
        assert!(!err.is_cancelled());
    }
}
