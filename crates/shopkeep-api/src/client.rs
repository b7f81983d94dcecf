//! # Backend REST Client
//!
//! Typed access to the Shopkeep backend. Every response arrives inside a
//! JSON envelope:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Response Envelope                                │
//! │                                                                         │
//! │  Success (2xx):   { "result": <payload>, "message": "ok" }             │
//! │  Failure (4xx/5xx): { "message": "what went wrong" }                   │
//! │                                                                         │
//! │  401/403 → ApiError::AuthFailed                                        │
//! │  other   → ApiError::Status { code, message }                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Endpoints
//! | Method | Path                    | Payload          | Result          |
//! |--------|-------------------------|------------------|-----------------|
//! | POST   | user/login              | Credentials      | AuthSession     |
//! | POST   | user/google-login       | { token }        | AuthSession     |
//! | POST   | user/register           | Registration     | AuthSession     |
//! | GET    | user/profile            | -                | UserProfile     |
//! | PUT    | user/profile            | UserPatch        | UserProfile     |
//! | POST   | user/reset-password     | { email }        | -               |
//! | GET    | products/getproducts    | -                | Vec<Product>    |
//! | POST   | sales/create            | NewSale          | -               |
//!
//! The `Authorization` header is not set here: it is applied by the
//! shared [`HttpClient`], whose header the session store owns.

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use shopkeep_core::{NewSale, Product, UserPatch, UserProfile};
use shopkeep_session::{HttpClient, ProfileRefreshError, ProfileSource};

use crate::error::{ApiError, ApiResult};

// =============================================================================
// Wire Types
// =============================================================================

/// The envelope every successful backend response is wrapped in.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub result: T,

    #[serde(default)]
    pub message: Option<String>,
}

/// Error bodies carry only a message.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Username/password login request.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// New-account registration request.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// What a successful login/registration returns: the bearer token and
/// the profile it belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Serialize)]
struct GoogleLoginRequest<'a> {
    token: &'a str,
}

#[derive(Serialize)]
struct PasswordResetRequest<'a> {
    email: &'a str,
}

// =============================================================================
// API Client
// =============================================================================

/// Typed client for the Shopkeep backend.
///
/// Cheap to clone; all clones share the underlying [`HttpClient`] and
/// therefore see the same `Authorization` header.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: HttpClient,
    base_url: Url,
}

impl ApiClient {
    /// Creates a client against `base_url` (e.g. `http://localhost:4000/api`).
    pub fn new(http: HttpClient, base_url: &str) -> ApiResult<Self> {
        // A trailing slash makes Url::join treat the last path segment as
        // a directory instead of replacing it.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)?;

        Ok(ApiClient { http, base_url })
    }

    /// The resolved URL for a relative endpoint path.
    pub fn endpoint(&self, path: &str) -> ApiResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    // =========================================================================
    // Auth Endpoints
    // =========================================================================

    /// Exchanges username/password credentials for a token and profile.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<AuthSession> {
        debug!(username = %credentials.username, "login request");
        let url = self.endpoint("user/login")?;
        self.send(self.http.post(url).json(credentials)).await
    }

    /// Exchanges a Google ID token for a backend session.
    pub async fn google_login(&self, id_token: &str) -> ApiResult<AuthSession> {
        let url = self.endpoint("user/google-login")?;
        self.send(self.http.post(url).json(&GoogleLoginRequest { token: id_token }))
            .await
    }

    /// Creates an account and signs it in.
    pub async fn register(&self, registration: &Registration) -> ApiResult<AuthSession> {
        let url = self.endpoint("user/register")?;
        self.send(self.http.post(url).json(registration)).await
    }

    /// Requests a password-reset email for `email`.
    pub async fn request_password_reset(&self, email: &str) -> ApiResult<()> {
        let url = self.endpoint("user/reset-password")?;
        self.send_ok(self.http.post(url).json(&PasswordResetRequest { email }))
            .await
    }

    // =========================================================================
    // Profile Endpoints
    // =========================================================================

    /// Fetches the signed-in user's current profile.
    pub async fn profile(&self) -> ApiResult<UserProfile> {
        let url = self.endpoint("user/profile")?;
        self.send(self.http.get(url)).await
    }

    /// Applies a partial profile edit and returns the updated profile.
    pub async fn update_profile(&self, patch: &UserPatch) -> ApiResult<UserProfile> {
        let url = self.endpoint("user/profile")?;
        self.send(self.http.put(url).json(patch)).await
    }

    // =========================================================================
    // Catalog & Sales Endpoints
    // =========================================================================

    /// Fetches the product catalog with current stock levels.
    pub async fn products(&self) -> ApiResult<Vec<Product>> {
        let url = self.endpoint("products/getproducts")?;
        self.send(self.http.get(url)).await
    }

    /// Records a completed sale.
    pub async fn create_sale(&self, sale: &NewSale) -> ApiResult<()> {
        debug!(lines = sale.products.len(), "create sale request");
        let url = self.endpoint("sales/create")?;
        self.send_ok(self.http.post(url).json(sale)).await
    }

    // =========================================================================
    // Envelope Handling
    // =========================================================================

    /// Sends the request and unwraps the `result` field of the envelope.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            let envelope: ApiEnvelope<T> = response
                .json()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()))?;
            Ok(envelope.result)
        } else {
            Err(Self::status_error(status, response).await)
        }
    }

    /// Sends the request and checks only the status, ignoring any payload.
    async fn send_ok(&self, builder: RequestBuilder) -> ApiResult<()> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            Err(Self::status_error(status, response).await)
        }
    }

    async fn status_error(status: StatusCode, response: reqwest::Response) -> ApiError {
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::AuthFailed(message),
            _ => ApiError::Status {
                code: status.as_u16(),
                message,
            },
        }
    }
}

// =============================================================================
// Profile Source
// =============================================================================

/// The API client is the production profile source for the background
/// refresher: the server's profile becomes a patch against the local one.
#[async_trait]
impl ProfileSource for ApiClient {
    async fn fetch_profile(&self) -> Result<UserPatch, ProfileRefreshError> {
        let profile = self
            .profile()
            .await
            .map_err(|e| ProfileRefreshError::Fetch(e.to_string()))?;

        Ok(UserPatch {
            username: Some(profile.username),
            email: Some(profile.email),
            mobile: profile.mobile,
            image: profile.image,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
