use thiserror::Error;

/// Main error type for the graph explorer
#[derive(Error, Debug)]
pub enum GraphError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization outside of stored records (fixtures, payloads)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Stored attrs/flags column could not be decoded.
    /// Fatal for the whole query: the row is never skipped.
    #[error("Malformed {column} payload on record {record}: {source}")]
    MalformedPayload {
        column: &'static str,
        record: String,
        #[source]
        source: serde_json::Error,
    },

    /// Generic store failure reported by a backend
    #[error("Store error: {0}")]
    Store(String),

    /// Blocking or spawned task was cancelled or panicked
    #[error("Task join error: {0}")]
    TaskJoin(String),

    /// Request exceeded its deadline; in-flight work was abandoned
    #[error("Request timed out after {0} ms")]
    Timeout(u64),
}

/// Convenient Result type using GraphError
pub type Result<T> = std::result::Result<T, GraphError>;

impl From<tokio::task::JoinError> for GraphError {
    fn from(err: tokio::task::JoinError) -> Self {
        GraphError::TaskJoin(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GraphError::Config("Test error".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("Test error"));
    }

    #[test]
    fn test_error_from_rusqlite() {
        let rusqlite_err = rusqlite::Error::InvalidQuery;
        let graph_err: GraphError = rusqlite_err.into();
        assert!(matches!(graph_err, GraphError::Database(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let graph_err: GraphError = io_err.into();
        assert!(matches!(graph_err, GraphError::Io(_)));
    }

    #[test]
    fn test_malformed_payload_names_record() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = GraphError::MalformedPayload {
            column: "attrs",
            record: "person:1".to_string(),
            source,
        };
        let text = err.to_string();
        assert!(text.contains("attrs"));
        assert!(text.contains("person:1"));
    }

    #[test]
    fn test_timeout_display() {
        assert_eq!(
            GraphError::Timeout(250).to_string(),
            "Request timed out after 250 ms"
        );
    }
}
