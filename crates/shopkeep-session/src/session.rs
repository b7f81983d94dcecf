//! # Session Store
//!
//! Single authoritative holder of the auth token and user profile.
//! Bridges session state to snapshot persistence and to the shared HTTP
//! client's default `Authorization` header.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Session Lifecycle                                 │
//! │                                                                         │
//! │              restore (durable → ephemeral → empty)                      │
//! │                            │                                            │
//! │                  ┌─────────▼─────────┐                                  │
//! │        ┌────────►│     Anonymous     │                                  │
//! │        │         │  (no token/user)  │                                  │
//! │        │         └─────────┬─────────┘                                  │
//! │        │                   │ login(payload)                             │
//! │     logout                 ▼                                            │
//! │        │         ┌───────────────────┐      update_user(patch)          │
//! │        └─────────│   Authenticated   │◄──────────┐                      │
//! │                  │  (token + user)   │───────────┘                      │
//! │                  └───────────────────┘      (self-loop)                 │
//! │                                                                         │
//! │  EVERY transition: sync auth header, then persist snapshot             │
//! │  (best-effort; storage failures are logged and swallowed).             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persistence Protocol
//! On every state change the full session is serialized and routed by the
//! user's `remember_me` preference (default true):
//! - `true`  → write durable slot, clear ephemeral slot
//! - `false` → write ephemeral slot, clear durable slot
//!
//! At most one slot ever holds a snapshot.
//!
//! ## Ordering Guarantee
//! `restore` installs the `Authorization` header before it returns, so a
//! recovered session can never issue its first request unauthenticated.
//! Within `login`/`logout` the header is updated before the call returns;
//! callers on the UI event loop therefore never observe a token/header
//! mismatch.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use shopkeep_core::{UserPatch, UserProfile};

use crate::http::HttpClient;
use crate::storage::SnapshotStore;

// =============================================================================
// Session State
// =============================================================================

/// The authenticated-identity state of the client instance.
///
/// Invariant: `user` is only present while `token` is present. The inverse
/// is allowed transiently (token restored, profile still refreshing).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Opaque bearer credential, absent while anonymous.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// The signed-in user's profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

impl Session {
    /// True when a token is held.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The persistence preference; unset means durable.
    pub fn remember_me(&self) -> bool {
        self.user
            .as_ref()
            .and_then(|u| u.remember_me)
            .unwrap_or(true)
    }
}

/// What a successful login/registration/OAuth exchange hands the store.
#[derive(Debug, Clone)]
pub struct LoginPayload {
    pub token: String,
    pub user: UserProfile,
    /// Overrides the profile's stored preference when present.
    pub remember_me: Option<bool>,
}

// =============================================================================
// Session Store
// =============================================================================

/// Explicitly constructed, dependency-injected session store.
///
/// There is no global instance: whoever issues HTTP calls receives a
/// handle (it is cheap to clone via `Arc`). Only this store writes the
/// HTTP client's default `Authorization` header.
pub struct SessionStore {
    state: RwLock<Session>,
    http: HttpClient,
    durable: Arc<dyn SnapshotStore>,
    ephemeral: Arc<dyn SnapshotStore>,
}

impl SessionStore {
    /// Builds the store by restoring any persisted snapshot.
    ///
    /// Restoration order: durable slot first, then ephemeral, else the
    /// session starts anonymous. A recovered token installs the auth
    /// header *before* this constructor returns.
    pub fn restore(
        http: HttpClient,
        durable: Arc<dyn SnapshotStore>,
        ephemeral: Arc<dyn SnapshotStore>,
    ) -> Self {
        let session = Self::load_snapshot(&*durable)
            .or_else(|| Self::load_snapshot(&*ephemeral))
            .unwrap_or_default();

        if let Some(token) = &session.token {
            // Header must be live before any restored caller can hit the
            // network, otherwise the first request after restart goes out
            // unauthenticated.
            if let Err(e) = http.set_bearer_token(token) {
                warn!(error = %e, "restored token rejected by header sync");
            }
            info!(user_id = ?session.user.as_ref().map(|u| u.id.as_str()), "session restored");
        } else {
            debug!("no persisted session, starting anonymous");
        }

        SessionStore {
            state: RwLock::new(session),
            http,
            durable,
            ephemeral,
        }
    }

    fn load_snapshot(slot: &dyn SnapshotStore) -> Option<Session> {
        let raw = match slot.load() {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "snapshot slot unreadable, skipping");
                return None;
            }
        };
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(error = %e, "corrupt session snapshot ignored");
                None
            }
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Anonymous → Authenticated. Sets token and user atomically, then
    /// syncs the auth header and persists.
    ///
    /// Payload validity is the caller's responsibility; this layer has no
    /// error conditions of its own (side-effect failures are swallowed).
    pub fn login(&self, payload: LoginPayload) {
        let LoginPayload {
            token,
            mut user,
            remember_me,
        } = payload;

        if let Some(remember) = remember_me {
            user.remember_me = Some(remember);
        }

        {
            let mut state = self.write_state();
            state.token = Some(token.clone());
            state.user = Some(user);
        }

        if let Err(e) = self.http.set_bearer_token(&token) {
            warn!(error = %e, "auth header sync failed on login");
        }
        self.persist();

        info!(user_id = ?self.user_id(), "logged in");
    }

    /// Authenticated → Authenticated. Shallow-merges the patch into the
    /// current profile; a patch arriving while anonymous is a no-op.
    pub fn update_user(&self, patch: &UserPatch) {
        {
            let mut state = self.write_state();
            let Some(user) = state.user.as_mut() else {
                debug!("ignoring profile update while anonymous");
                return;
            };
            user.apply(patch);
        }

        // Token unchanged, header stays; only the snapshot moves.
        self.persist();
    }

    /// Authenticated → Anonymous. Clears state, removes the auth header
    /// and wipes BOTH snapshot slots.
    pub fn logout(&self) {
        {
            let mut state = self.write_state();
            state.token = None;
            state.user = None;
        }

        self.http.clear_bearer_token();

        if let Err(e) = self.durable.clear() {
            warn!(error = %e, "failed to clear durable snapshot on logout");
        }
        if let Err(e) = self.ephemeral.clear() {
            warn!(error = %e, "failed to clear ephemeral snapshot on logout");
        }

        info!("logged out");
    }

    /// Merges a background profile-refresh result, but only if the session
    /// still holds `token`. A logout or re-login that happened while the
    /// fetch was in flight discards the late response.
    ///
    /// Returns true when the merge was applied.
    pub fn merge_refreshed(&self, token: &str, patch: &UserPatch) -> bool {
        {
            let mut state = self.write_state();
            if state.token.as_deref() != Some(token) {
                debug!("discarding stale profile refresh (token changed)");
                return false;
            }
            let Some(user) = state.user.as_mut() else {
                debug!("discarding profile refresh (no profile to merge into)");
                return false;
            };
            user.apply(patch);
        }

        self.persist();
        true
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The current bearer token, if authenticated.
    pub fn token(&self) -> Option<String> {
        self.read_state().token.clone()
    }

    /// The current user profile, if any.
    pub fn user(&self) -> Option<UserProfile> {
        self.read_state().user.clone()
    }

    /// The current user's id, if any.
    pub fn user_id(&self) -> Option<String> {
        self.read_state().user.as_ref().map(|u| u.id.clone())
    }

    /// True while a token is held.
    pub fn is_authenticated(&self) -> bool {
        self.read_state().is_authenticated()
    }

    /// The shared HTTP client whose auth header this store owns.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    // =========================================================================
    // Persistence (best-effort)
    // =========================================================================

    /// Serializes the full session and routes it by the remember-me
    /// preference. Failures are logged and swallowed: persistence is not
    /// correctness-critical, the session keeps working in memory.
    fn persist(&self) {
        let (snapshot, remember) = {
            let state = self.read_state();
            (serde_json::to_string(&*state), state.remember_me())
        };

        let snapshot = match snapshot {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "session snapshot serialization failed");
                return;
            }
        };

        let (target, other) = if remember {
            (&self.durable, &self.ephemeral)
        } else {
            (&self.ephemeral, &self.durable)
        };

        if let Err(e) = target.store(&snapshot) {
            warn!(error = %e, remember_me = remember, "snapshot write failed");
        }
        if let Err(e) = other.clear() {
            warn!(error = %e, remember_me = remember, "snapshot clear failed");
        }
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, Session> {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, Session> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore {
    /// A snapshot of the current state (clone, not a live view).
    pub fn snapshot(&self) -> Session {
        self.read_state().clone()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
