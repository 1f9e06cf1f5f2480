use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error type for the lexipath crate.
/// Construction and lookup failures are reported through this type; an
/// empty selection during path generation is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathError {
    /// Level configuration violates an invariant (duplicate levels,
    /// missing weight, sentinel collision, bad custom multipliers).
    InvalidConfig(String),
    /// Path parameters are missing a configured level or out of range.
    InvalidParameters(String),
    /// An operation referenced a level that is not configured.
    UnknownLevel(String),
    /// An operation referenced a book that is not in the analyzed corpus.
    UnknownBook(String),
    /// The facade was constructed with zero books.
    EmptyCorpus,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::InvalidConfig(detail) => {
                write!(f, "invalid level configuration: {}", detail)
            }
            PathError::InvalidParameters(detail) => {
                write!(f, "invalid path parameters: {}", detail)
            }
            PathError::UnknownLevel(level) => write!(f, "unknown level: {}", level),
            PathError::UnknownBook(book_id) => write!(f, "unknown book: {}", book_id),
            PathError::EmptyCorpus => write!(f, "corpus contains no books"),
        }
    }
}

impl std::error::Error for PathError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_detail() {
        let err = PathError::UnknownLevel("D1".to_string());
        assert_eq!(format!("{}", err), "unknown level: D1");

        let err = PathError::InvalidConfig("duplicate level: A1".to_string());
        let display = format!("{}", err);
        assert!(display.contains("invalid level configuration"));
        assert!(display.contains("duplicate level: A1"));
    }

    #[test]
    fn round_trips_through_json() {
        let err = PathError::UnknownBook("book42".to_string());
        let json = serde_json::to_string(&err).unwrap();
        let back: PathError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}
