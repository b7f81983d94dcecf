//! # Session Error Types
//!
//! Error types for session state, persistence and configuration.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Session Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Persistence   │  │  Configuration  │  │   Profile Refresh       │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  StorageError   │  │  ConfigLoad     │  │  ProfileRefreshError    │ │
//! │  │  Snapshot       │  │  ConfigSave     │  │  (logged, never fatal)  │ │
//! │  │  (swallowed by  │  │  InvalidConfig  │  │                         │ │
//! │  │   the store)    │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Persistence failures are deliberately second-class: the session keeps
//! working in memory and the failure is only logged. Nothing in this crate
//! turns a storage write error into a failed login.

use thiserror::Error;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors from the two snapshot storage slots.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying file I/O failed (quota, permissions, missing dir).
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The in-memory slot's lock was poisoned by a panicking writer.
    #[error("storage slot lock poisoned")]
    Poisoned,
}

/// Session-level errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A snapshot slot failed to read or write.
    #[error("snapshot storage failed: {0}")]
    Storage(#[from] StorageError),

    /// The session state failed to (de)serialize.
    #[error("snapshot serialization failed: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// The token cannot be used as an HTTP header value.
    #[error("token is not a valid header value: {0}")]
    InvalidAuthHeader(String),

    /// Failed to load the config file.
    #[error("failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save the config file.
    #[error("failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// Config contents are invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SessionError {
    fn from(err: toml::de::Error) -> Self {
        SessionError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SessionError {
    fn from(err: toml::ser::Error) -> Self {
        SessionError::ConfigSaveFailed(err.to_string())
    }
}

/// Background profile refresh failure.
///
/// Logged by the refresher; the session retains its last-known state and
/// no automatic retry is scheduled.
#[derive(Debug, Clone, Error)]
pub enum ProfileRefreshError {
    /// The profile fetch itself failed (network, auth, decode).
    #[error("profile fetch failed: {0}")]
    Fetch(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SessionError::InvalidAuthHeader("bad\ntoken".to_string());
        assert!(err.to_string().contains("not a valid header value"));

        let err = ProfileRefreshError::Fetch("timeout".to_string());
        assert_eq!(err.to_string(), "profile fetch failed: timeout");
    }

    #[test]
    fn test_storage_error_wraps_into_session_error() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: SessionError = StorageError::from(io).into();
        assert!(matches!(err, SessionError::Storage(_)));
    }
}
