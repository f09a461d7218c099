//! Error types for dugout

use thiserror::Error;

/// Result type alias for dugout operations
pub type Result<T> = std::result::Result<T, DugoutError>;

/// Unified error type for bootstrap, walkthrough and teardown
#[derive(Error, Debug, Clone)]
pub enum DugoutError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    /// A time budget elapsed before the operation finished
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Liveness probe failed after the client was created
    #[error("Ping failed: {0}")]
    Ping(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Cursor error: {0}")]
    Cursor(String),

    /// Insert, update or delete rejected by the server
    #[error("Write error: {0}")]
    Write(String),

    #[error("MongoDB error: {0}")]
    MongoDB(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl DugoutError {
    /// Returns true if a time budget elapsed
    pub fn is_timeout(&self) -> bool {
        matches!(self, DugoutError::Timeout(_))
    }

    /// Returns true if the session could not be established or verified
    pub fn is_connection(&self) -> bool {
        matches!(self, DugoutError::Connection(_) | DugoutError::Ping(_))
    }
}

impl From<serde_json::Error> for DugoutError {
    fn from(err: serde_json::Error) -> Self {
        DugoutError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for DugoutError {
    fn from(err: std::io::Error) -> Self {
        DugoutError::Io(err.to_string())
    }
}

// MongoDB-specific error conversions (when mongodb-errors feature is enabled)
#[cfg(feature = "mongodb-errors")]
impl From<mongodb::error::Error> for DugoutError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        match err.kind.as_ref() {
            ErrorKind::InvalidArgument { .. } | ErrorKind::InvalidTlsConfig { .. } => {
                DugoutError::Configuration(err.to_string())
            }
            ErrorKind::Authentication { .. }
            | ErrorKind::ServerSelection { .. }
            | ErrorKind::DnsResolve { .. }
            | ErrorKind::ConnectionPoolCleared { .. }
            | ErrorKind::Io(_) => DugoutError::Connection(err.to_string()),
            ErrorKind::BsonSerialization(_) => DugoutError::Serialization(err.to_string()),
            ErrorKind::BsonDeserialization(_) => DugoutError::Deserialization(err.to_string()),
            ErrorKind::Write(_) | ErrorKind::InsertMany(_) => DugoutError::Write(err.to_string()),
            _ => DugoutError::MongoDB(err.to_string()),
        }
    }
}

#[cfg(feature = "mongodb-errors")]
impl From<bson::ser::Error> for DugoutError {
    fn from(err: bson::ser::Error) -> Self {
        DugoutError::Serialization(format!("BSON serialization error: {}", err))
    }
}

#[cfg(feature = "mongodb-errors")]
impl From<bson::de::Error> for DugoutError {
    fn from(err: bson::de::Error) -> Self {
        DugoutError::Deserialization(format!("BSON deserialization error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_configuration() {
        let err = DugoutError::Configuration("DUGOUT_ACCOUNT is not set".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: DUGOUT_ACCOUNT is not set"
        );
    }

    #[test]
    fn test_error_display_timeout() {
        let err = DugoutError::Timeout("operations budget of 5s elapsed".to_string());
        assert_eq!(err.to_string(), "Timeout: operations budget of 5s elapsed");
    }

    #[test]
    fn test_error_display_ping() {
        let err = DugoutError::Ping("server unreachable".to_string());
        assert_eq!(err.to_string(), "Ping failed: server unreachable");
    }

    #[test]
    fn test_error_display_not_found() {
        let err = DugoutError::NotFound("no player matches { lastname: \"Robinson\" }".to_string());
        assert!(err.to_string().starts_with("Not found: "));
    }

    #[test]
    fn test_error_display_write() {
        let err = DugoutError::Write("duplicate key".to_string());
        assert_eq!(err.to_string(), "Write error: duplicate key");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: DugoutError = json_err.into();
        assert!(matches!(err, DugoutError::Serialization(_)));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout closed");
        let err: DugoutError = io_err.into();
        assert!(matches!(err, DugoutError::Io(_)));
        assert!(err.to_string().contains("stdout closed"));
    }

    #[test]
    fn test_is_timeout() {
        assert!(DugoutError::Timeout("test".to_string()).is_timeout());
        assert!(!DugoutError::Connection("test".to_string()).is_timeout());
        assert!(!DugoutError::Cursor("test".to_string()).is_timeout());
    }

    #[test]
    fn test_is_connection() {
        assert!(DugoutError::Connection("test".to_string()).is_connection());
        assert!(DugoutError::Ping("test".to_string()).is_connection());
        assert!(!DugoutError::Configuration("test".to_string()).is_connection());
        assert!(!DugoutError::Timeout("test".to_string()).is_connection());
        assert!(!DugoutError::NotFound("test".to_string()).is_connection());
    }

    #[test]
    fn test_result_type_err() {
        let result: Result<i32> = Err(DugoutError::Cursor("killed".to_string()));
        assert!(result.is_err());
    }
}
