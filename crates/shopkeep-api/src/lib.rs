//! # shopkeep-api: Backend REST Client for the Shopkeep Client
//!
//! Typed client for the Shopkeep backend's JSON envelope API, plus the
//! checkout orchestration that sits between the cart engine and the wire.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         API Layer Architecture                          │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         ApiClient                                │  │
//! │  │                                                                  │  │
//! │  │  auth: login / googleLogin / register / resetPassword            │  │
//! │  │  profile: fetch / update (also the refresher's ProfileSource)   │  │
//! │  │  catalog: products      sales: createSale                       │  │
//! │  └───────────┬──────────────────────────────────────────────────────┘  │
//! │              │ all requests go through                                  │
//! │              ▼                                                          │
//! │  shopkeep-session::HttpClient                                          │
//! │  (Authorization header owned by the SessionStore)                      │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         checkout()                               │  │
//! │  │                                                                  │  │
//! │  │  empty-cart / name / email rejected locally, no request sent    │  │
//! │  │  cart cleared only after the server confirms the sale           │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`client`] - `ApiClient`, envelope handling, endpoint definitions
//! - [`checkout`] - Cart-to-sale orchestration
//! - [`error`] - `ApiError` and `CheckoutError`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shopkeep_api::{ApiClient, Credentials};
//! use shopkeep_session::{HttpClient, LoginPayload, SessionStore};
//!
//! let api = ApiClient::new(session.http().clone(), config.base_url())?;
//!
//! let auth = api.login(&Credentials {
//!     username: "clerk".into(),
//!     password: password.into(),
//! }).await?;
//!
//! session.login(LoginPayload {
//!     token: auth.token,
//!     user: auth.user,
//!     remember_me: Some(true),
//! });
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod client;
pub mod error;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::{checkout, CheckoutReceipt};
pub use client::{ApiClient, ApiEnvelope, AuthSession, Credentials, Registration};
pub use error::{ApiError, ApiResult, CheckoutError};
