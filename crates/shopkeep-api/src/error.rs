//! # API Error Types
//!
//! Errors from talking to the Shopkeep backend, plus the checkout-specific
//! failures layered on top.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        API Error Categories                              │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌────────────┐  │
//! │  │  AuthFailed  │  │    Status    │  │  Transport   │  │   Decode   │  │
//! │  │              │  │              │  │              │  │            │  │
//! │  │  401/403     │  │  other non-  │  │  connection, │  │  body did  │  │
//! │  │  credentials │  │  2xx, server │  │  DNS, TLS,   │  │  not match │  │
//! │  │  or expired  │  │  message     │  │  timeout     │  │  envelope  │  │
//! │  │  token       │  │  attached    │  │              │  │            │  │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use shopkeep_core::ValidationError;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors from the backend REST client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server rejected the credentials or the token (401/403).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// Any other non-success status, with the server's message when it
    /// sent one.
    #[error("server returned {code}: {message}")]
    Status { code: u16, message: String },

    /// The request never completed (connection, DNS, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body did not match the expected envelope.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The configured base URL (or a path joined onto it) is not a URL.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidUrl(err.to_string())
    }
}

/// Why a checkout did not reach the backend (or failed once it did).
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing in the cart; the request is never sent.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// Customer name or email failed validation; the request is never sent.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The sale request itself failed. The cart is left untouched so the
    /// clerk can retry.
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::Status {
            code: 500,
            message: "internal error".to_string(),
        };
        assert_eq!(err.to_string(), "server returned 500: internal error");

        let err = ApiError::AuthFailed("wrong password".to_string());
        assert!(err.to_string().contains("authentication failed"));
    }

    #[test]
    fn test_checkout_error_wraps_validation() {
        let err: CheckoutError = ValidationError::Required {
            field: "customer".to_string(),
        }
        .into();
        assert!(matches!(err, CheckoutError::Invalid(_)));
    }
}
