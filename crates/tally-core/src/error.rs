//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  └── CoreError        - Persisted payload could not be decoded         │
//! │                                                                         │
//! │  tally-db errors (separate crate)                                      │
//! │  └── DbError          - Storage read/write failures                    │
//! │                                                                         │
//! │  App errors                                                            │
//! │  ├── PersistenceFailure - Load/save failures (logged, never thrown)    │
//! │  └── ApiError           - What the front end sees                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core logic errors.
///
/// The collection transformations themselves are total, so the only way
/// to fail inside this crate is handing it text it cannot decode.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The persisted payload is not a JSON array of counters.
    ///
    /// ## When This Occurs
    /// - The stored text is not JSON at all (truncated write, manual edit)
    /// - An entry is missing `id`, `name` or `count`
    /// - A field has the wrong type (e.g. `"count": "5"`)
    #[error("Invalid counters payload: {0}")]
    Codec(#[from] serde_json::Error),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_error_message() {
        let json_err = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(err.to_string().starts_with("Invalid counters payload: "));
    }
}
