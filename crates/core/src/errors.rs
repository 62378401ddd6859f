/// Result type alias for gridmetrics operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for gridmetrics operations
///
/// Recording never fails; these errors only surface from the restoration,
/// administration, configuration and reporting paths.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A value or accumulator is not in a state the operation accepts
    #[error("invalid metrics state: {message}")]
    InvalidState { message: String },

    /// The requested entity has never been registered (or was removed)
    #[error("no metrics registered for '{entity}'")]
    NotFound { entity: String },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Metrics export failures
    #[error("metrics export failed: {message}")]
    Export { message: String },
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json {
            message: error.to_string(),
            source: error,
        }
    }
}

// Helper methods for creating errors with context
impl Error {
    /// Create an invalid state error
    #[must_use]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Error::InvalidState {
            message: message.into(),
        }
    }

    /// Create a not found error for an entity
    #[must_use]
    pub fn not_found(entity: impl Into<String>) -> Self {
        Error::NotFound {
            entity: entity.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create an export error
    #[must_use]
    pub fn export(message: impl Into<String>) -> Self {
        Error::Export {
            message: message.into(),
        }
    }

    /// Whether this error means the entity is simply unknown
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_state("createTime 10 is after readTime 5");
        assert_eq!(
            err.to_string(),
            "invalid metrics state: createTime 10 is after readTime 5"
        );

        let err = Error::not_found("cache:orders");
        assert_eq!(err.to_string(), "no metrics registered for 'cache:orders'");
        assert!(err.is_not_found());

        let err = Error::configuration("shard amount must be a power of two");
        assert_eq!(
            err.to_string(),
            "configuration error: shard amount must be a power of two"
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_json_conversion_keeps_source() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = parse_err.into();

        assert!(matches!(err, Error::Json { .. }));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("JSON error:"));
    }
}
