//! Error handling module for the tour engine
//!
//! Provides centralized error types using thiserror. Most of these never reach
//! the user: the tour is a best-effort overlay, so the engine logs and recovers.

use thiserror::Error;

/// Main error type for the tour engine
#[derive(Error, Debug)]
pub enum TourError {
    /// A step's target never appeared within the resolver timeout
    #[error("Element {selector} not found after {waited_ms}ms")]
    TargetNotFound { selector: String, waited_ms: u64 },

    /// Host page errors (mounting surfaces, measuring elements)
    #[error("Page error: {0}")]
    Page(String),

    /// Completion flag store errors
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tour script errors (empty script, blank selectors)
    #[error("Script error: {0}")]
    Script(String),

    /// IO errors (file-backed store)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for tour operations
pub type Result<T> = std::result::Result<T, TourError>;

impl TourError {
    /// Create a page error
    pub fn page(msg: impl Into<String>) -> Self {
        Self::Page(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a script error
    pub fn script(msg: impl Into<String>) -> Self {
        Self::Script(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TourError::TargetNotFound {
            selector: ".stats-grid".to_string(),
            waited_ms: 5000,
        };
        assert_eq!(err.to_string(), "Element .stats-grid not found after 5000ms");

        let err = TourError::page("popup could not be mounted");
        assert_eq!(err.to_string(), "Page error: popup could not be mounted");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TourError = io_err.into();
        assert!(matches!(err, TourError::Io(_)));
    }

    #[test]
    fn test_error_constructors() {
        assert!(matches!(TourError::store("x"), TourError::Store(_)));
        assert!(matches!(TourError::config("x"), TourError::Config(_)));
        assert!(matches!(TourError::script("x"), TourError::Script(_)));
    }
}
