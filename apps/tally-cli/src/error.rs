//! # Application Error Types
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Tally                                  │
//! │                                                                         │
//! │  Startup (config, open storage)                                        │
//! │     └── AppError ──────────────────────────► exit with message         │
//! │                                                                         │
//! │  Load / save against storage                                           │
//! │     └── PersistenceFailure ──► tracing::error! + diagnostics channel   │
//! │                                (never returned to the front end)       │
//! │                                                                         │
//! │  Front end input / commands                                            │
//! │     └── ApiError { code, message } ──────► printed, session continues  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tally_core::CoreError;
use tally_db::DbError;
use thiserror::Error;

// =============================================================================
// Startup Errors
// =============================================================================

/// Errors that stop the application before the store is running.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration values are inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Config file, data directory or terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for [`AppConfig`](crate::state::AppConfig).
    #[error("Config file is malformed: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// No platform data/config directory could be determined.
    #[error("Could not determine the application data directory")]
    NoDataDir,

    /// Storage could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] DbError),
}

/// Result type for startup operations.
pub type AppResult<T> = Result<T, AppError>;

// =============================================================================
// Persistence Failures
// =============================================================================

/// A load or save that did not reach storage.
///
/// These are recovered locally: the in-memory counters stay as they were
/// and the failure only goes to the log and to diagnostics subscribers.
/// The message is kept as text so the value can be cloned onto a
/// broadcast channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceFailure {
    /// Reading or decoding the saved collection at startup failed.
    #[error("Failed to load counters: {0}")]
    Load(String),

    /// Writing the collection after a change failed.
    #[error("Failed to save counters: {0}")]
    Save(String),
}

impl PersistenceFailure {
    /// Wraps any error as a load failure.
    pub fn load(err: impl std::fmt::Display) -> Self {
        PersistenceFailure::Load(err.to_string())
    }

    /// Wraps any error as a save failure.
    pub fn save(err: impl std::fmt::Display) -> Self {
        PersistenceFailure::Save(err.to_string())
    }

    /// The underlying error text, without the "Failed to ..." prefix.
    pub fn detail(&self) -> &str {
        match self {
            PersistenceFailure::Load(detail) | PersistenceFailure::Save(detail) => detail,
        }
    }
}

// =============================================================================
// Command Errors
// =============================================================================

/// Error returned from commands to the front end.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Counter id must be a whole number, got 'abc'"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input could not be understood
    ValidationError,

    /// Unexpected internal failure
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Codec(e) => {
                tracing::error!("Counter encoding failed: {}", e);
                ApiError::internal("Counters could not be encoded")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_failure_messages() {
        let load = PersistenceFailure::load(DbError::Unavailable("Load failed".into()));
        assert_eq!(
            load.to_string(),
            "Failed to load counters: Storage unavailable: Load failed"
        );
        assert_eq!(load.detail(), "Storage unavailable: Load failed");

        let save = PersistenceFailure::save("disk full");
        assert_eq!(save.to_string(), "Failed to save counters: disk full");
    }

    #[test]
    fn test_api_error_serialization() {
        let err = ApiError::validation("bad id");
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"code":"VALIDATION_ERROR","message":"bad id"}"#);
        assert_eq!(err.to_string(), "[ValidationError] bad id");
    }
}
