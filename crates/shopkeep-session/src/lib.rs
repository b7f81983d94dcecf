//! # shopkeep-session: Session Store for the Shopkeep Client
//!
//! This crate owns the authenticated-identity state of the client: who is
//! signed in, their bearer token, where that state persists between runs,
//! and how the shared HTTP client learns about it.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Session Layer Architecture                          │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                  SessionStore (Single Source of Truth)           │  │
//! │  │                                                                  │  │
//! │  │  login / logout / update_user / merge_refreshed                 │  │
//! │  │  Every transition syncs the auth header, then persists          │  │
//! │  └───────────┬──────────────────────┬───────────────────────────────┘  │
//! │              │                      │                                   │
//! │              ▼                      ▼                                   │
//! │  ┌────────────────────┐  ┌────────────────────────────────────────┐    │
//! │  │  SnapshotStore x2  │  │  HttpClient                            │    │
//! │  │                    │  │                                        │    │
//! │  │  durable (file)    │  │  reqwest wrapper with a session-owned  │    │
//! │  │  ephemeral (mem)   │  │  default Authorization header          │    │
//! │  │  exactly one holds │  │  (the store is the only writer)        │    │
//! │  │  the snapshot      │  │                                        │    │
//! │  └────────────────────┘  └────────────────────────────────────────┘    │
//! │                                                                         │
//! │  ┌────────────────────┐  ┌────────────────────────────────────────┐    │
//! │  │  ProfileRefresher  │  │  ClientConfig                          │    │
//! │  │                    │  │                                        │    │
//! │  │  background fetch, │  │  TOML file + env overrides             │    │
//! │  │  token-deduped,    │  │  (API URL, snapshot path,              │    │
//! │  │  logout-safe merge │  │   remember-me default)                 │    │
//! │  └────────────────────┘  └────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`session`] - The `SessionStore` state machine and persistence protocol
//! - [`storage`] - `SnapshotStore` trait with file and memory backends
//! - [`http`] - Shared HTTP client with the default `Authorization` header
//! - [`refresh`] - Deduplicated background profile refresh
//! - [`config`] - Client configuration (TOML + environment)
//! - [`error`] - Error types for this layer
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shopkeep_session::{ClientConfig, FileStore, HttpClient, MemoryStore, SessionStore};
//!
//! let config = ClientConfig::load_or_default(None);
//!
//! let durable: Arc<dyn shopkeep_session::SnapshotStore> = match config.snapshot_path() {
//!     Some(path) => Arc::new(FileStore::new(path.clone())),
//!     None => Arc::new(FileStore::default_durable().expect("no config dir")),
//! };
//! let ephemeral = Arc::new(MemoryStore::new());
//!
//! // Restores any persisted session; the auth header is live on return.
//! let session = SessionStore::restore(HttpClient::new(), durable, ephemeral);
//! if session.is_authenticated() {
//!     println!("welcome back, {:?}", session.user_id());
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod http;
pub mod refresh;
pub mod session;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ApiSettings, ClientConfig, SessionSettings, StorageSettings};
pub use error::{ProfileRefreshError, SessionError, SessionResult, StorageError};
pub use http::HttpClient;
pub use refresh::{ProfileRefresher, ProfileSource};
pub use session::{LoginPayload, Session, SessionStore};
pub use storage::{FileStore, MemoryStore, SnapshotStore};
