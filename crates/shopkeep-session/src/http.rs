//! # Shared HTTP Client
//!
//! A cloneable handle around one `reqwest::Client` plus the process-wide
//! default `Authorization` header.
//!
//! ## Single Writer
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Authorization Header Ownership                       │
//! │                                                                         │
//! │   SessionStore ──── set_bearer_token / clear_bearer_token ───┐         │
//! │   (ONLY writer)                                              ▼         │
//! │                                                   ┌──────────────────┐ │
//! │   ApiClient ──────── request(method, url) ───────►│ Option<Header>   │ │
//! │   (readers)          header applied at build time └──────────────────┘ │
//! │                                                                         │
//! │   Every write is derived from the session's current token.             │
//! │   Last write wins; reads see the latest value at request-build time.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The lock is held only for the copy in/out of the slot, never across
//! an await point.

use std::sync::{Arc, RwLock};

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Url};
use tracing::debug;

use crate::error::SessionError;

/// Shared HTTP client with a session-owned default `Authorization` header.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    authorization: Arc<RwLock<Option<HeaderValue>>>,
}

impl HttpClient {
    /// Creates a client with default reqwest settings.
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Wraps a pre-configured reqwest client (timeouts, proxies, etc.).
    pub fn with_client(inner: reqwest::Client) -> Self {
        HttpClient {
            inner,
            authorization: Arc::new(RwLock::new(None)),
        }
    }

    /// Installs `Authorization: Bearer <token>` as the default header for
    /// every subsequent request built through this handle.
    pub fn set_bearer_token(&self, token: &str) -> Result<(), SessionError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| SessionError::InvalidAuthHeader(e.to_string()))?;
        value.set_sensitive(true);

        *self.write_slot() = Some(value);
        debug!("authorization header installed");
        Ok(())
    }

    /// Removes the default `Authorization` header.
    pub fn clear_bearer_token(&self) {
        *self.write_slot() = None;
        debug!("authorization header cleared");
    }

    /// True if a default `Authorization` header is currently installed.
    pub fn has_authorization(&self) -> bool {
        self.read_slot().is_some()
    }

    /// The current header value, for assertions and diagnostics.
    pub fn authorization(&self) -> Option<HeaderValue> {
        self.read_slot().clone()
    }

    /// Starts a request with the current default header applied.
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.inner.request(method, url);
        match self.read_slot().as_ref() {
            Some(value) => builder.header(AUTHORIZATION, value.clone()),
            None => builder,
        }
    }

    /// Convenience for `request(GET, ..)`.
    pub fn get(&self, url: Url) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    /// Convenience for `request(POST, ..)`.
    pub fn post(&self, url: Url) -> RequestBuilder {
        self.request(Method::POST, url)
    }

    /// Convenience for `request(PUT, ..)`.
    pub fn put(&self, url: Url) -> RequestBuilder {
        self.request(Method::PUT, url)
    }

    // A poisoned lock only means a reader/writer panicked mid-copy; the
    // slot itself is still a plain Option, so we take the inner guard.
    fn read_slot(&self) -> std::sync::RwLockReadGuard<'_, Option<HeaderValue>> {
        self.authorization
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_slot(&self) -> std::sync::RwLockWriteGuard<'_, Option<HeaderValue>> {
        self.authorization
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_header_by_default() {
        let client = HttpClient::new();
        assert!(!client.has_authorization());
        assert_eq!(client.authorization(), None);
    }

    #[test]
    fn test_set_and_clear_bearer_token() {
        let client = HttpClient::new();

        client.set_bearer_token("t1").unwrap();
        assert!(client.has_authorization());
        assert_eq!(
            client.authorization().unwrap(),
            HeaderValue::from_static("Bearer t1")
        );

        client.clear_bearer_token();
        assert!(!client.has_authorization());
    }

    #[test]
    fn test_last_write_wins() {
        let client = HttpClient::new();
        client.set_bearer_token("first").unwrap();
        client.set_bearer_token("second").unwrap();
        assert_eq!(
            client.authorization().unwrap(),
            HeaderValue::from_static("Bearer second")
        );
    }

    #[test]
    fn test_invalid_token_rejected() {
        let client = HttpClient::new();
        let err = client.set_bearer_token("line\nbreak").unwrap_err();
        assert!(matches!(err, SessionError::InvalidAuthHeader(_)));
        // Failed install leaves the slot untouched.
        assert!(!client.has_authorization());
    }

    #[test]
    fn test_clones_share_the_header_slot() {
        let client = HttpClient::new();
        let other = client.clone();

        client.set_bearer_token("shared").unwrap();
        assert!(other.has_authorization());

        other.clear_bearer_token();
        assert!(!client.has_authorization());
    }
}
