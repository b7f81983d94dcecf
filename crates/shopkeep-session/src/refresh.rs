//! # Background Profile Refresh
//!
//! Re-fetches the signed-in user's profile in the background so a restored
//! session converges on the server's current view without blocking startup.
//!
//! ## Refresh Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Profile Refresh Pipeline                            │
//! │                                                                         │
//! │  trigger()                                                              │
//! │     │                                                                   │
//! │     ├── anonymous? ──────────────────────► skip (None)                  │
//! │     ├── token already in flight? ────────► skip (None, deduped)         │
//! │     │                                                                   │
//! │     └── spawn ── source.fetch_profile() ──┬── Ok(patch)                 │
//! │                                           │     └── merge_refreshed()   │
//! │                                           │         (discarded if the   │
//! │                                           │          token changed)     │
//! │                                           └── Err ── warn, no retry     │
//! │                                                                         │
//! │  In-flight tokens are tracked in a set; a second trigger() for the     │
//! │  same token while the fetch is pending is a no-op.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use shopkeep_core::UserPatch;

use crate::error::ProfileRefreshError;
use crate::session::SessionStore;

/// Where a fresh profile comes from. Implemented by the API client;
/// implemented by fixtures in tests.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Fetches the current user's profile as a patch against the
    /// locally-held one.
    async fn fetch_profile(&self) -> Result<UserPatch, ProfileRefreshError>;
}

/// Spawns and deduplicates background profile fetches.
pub struct ProfileRefresher {
    session: Arc<SessionStore>,
    source: Arc<dyn ProfileSource>,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl ProfileRefresher {
    pub fn new(session: Arc<SessionStore>, source: Arc<dyn ProfileSource>) -> Self {
        ProfileRefresher {
            session,
            source,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Kicks off a refresh for the current token, unless the session is
    /// anonymous or a fetch for that exact token is already pending.
    ///
    /// Returns the task handle when a fetch was spawned, so callers (and
    /// tests) can await completion.
    pub fn trigger(&self) -> Option<JoinHandle<()>> {
        let Some(token) = self.session.token() else {
            debug!("profile refresh skipped: anonymous");
            return None;
        };

        {
            let mut in_flight = self.lock_in_flight();
            if !in_flight.insert(token.clone()) {
                debug!("profile refresh skipped: already in flight");
                return None;
            }
        }

        let session = self.session.clone();
        let source = self.source.clone();
        let in_flight = self.in_flight.clone();

        Some(tokio::spawn(async move {
            let outcome = source.fetch_profile().await;

            in_flight
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .remove(&token);

            match outcome {
                Ok(patch) => {
                    // The store itself decides whether the result is still
                    // relevant; a logout mid-fetch makes this a discard.
                    if session.merge_refreshed(&token, &patch) {
                        debug!("profile refresh merged");
                    } else {
                        debug!("profile refresh discarded (session moved on)");
                    }
                }
                Err(e) => {
                    // Last-known profile stays; no automatic retry.
                    warn!(error = %e, "profile refresh failed");
                }
            }
        }))
    }

    fn lock_in_flight(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpClient;
    use crate::session::LoginPayload;
    use crate::storage::MemoryStore;
    use shopkeep_core::{AuthProvider, UserProfile};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    fn logged_in_store(token: &str) -> Arc<SessionStore> {
        let store = Arc::new(SessionStore::restore(
            HttpClient::new(),
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
        ));
        store.login(LoginPayload {
            token: token.to_string(),
            user: UserProfile {
                id: "u1".to_string(),
                username: "shop-owner".to_string(),
                email: "owner@example.com".to_string(),
                mobile: None,
                image: None,
                auth_provider: AuthProvider::Local,
                remember_me: Some(true),
            },
            remember_me: None,
        });
        store
    }

    /// Source that blocks on a notify so tests control fetch completion.
    struct GatedSource {
        gate: Arc<Notify>,
        calls: AtomicUsize,
        patch: UserPatch,
    }

    #[async_trait]
    impl ProfileSource for GatedSource {
        async fn fetch_profile(&self) -> Result<UserPatch, ProfileRefreshError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;
            Ok(self.patch.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ProfileSource for FailingSource {
        async fn fetch_profile(&self) -> Result<UserPatch, ProfileRefreshError> {
            Err(ProfileRefreshError::Fetch("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_skips_when_anonymous() {
        let store = Arc::new(SessionStore::restore(
            HttpClient::new(),
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
        ));
        let refresher = ProfileRefresher::new(store, Arc::new(FailingSource));
        assert!(refresher.trigger().is_none());
    }

    #[tokio::test]
    async fn test_successful_refresh_merges_patch() {
        let store = logged_in_store("t1");
        let gate = Arc::new(Notify::new());
        let source = Arc::new(GatedSource {
            gate: gate.clone(),
            calls: AtomicUsize::new(0),
            patch: UserPatch {
                mobile: Some("555-0100".to_string()),
                ..UserPatch::default()
            },
        });

        let refresher = ProfileRefresher::new(store.clone(), source);
        let handle = refresher.trigger().unwrap();
        gate.notify_one();
        handle.await.unwrap();

        assert_eq!(store.user().unwrap().mobile.as_deref(), Some("555-0100"));
    }

    #[tokio::test]
    async fn test_dedupes_concurrent_triggers_for_same_token() {
        let store = logged_in_store("t1");
        let gate = Arc::new(Notify::new());
        let source = Arc::new(GatedSource {
            gate: gate.clone(),
            calls: AtomicUsize::new(0),
            patch: UserPatch::default(),
        });

        let refresher = ProfileRefresher::new(store, source.clone());
        let handle = refresher.trigger().unwrap();
        // Let the spawned fetch start on the current-thread test runtime.
        tokio::task::yield_now().await;
        // Second trigger while the first fetch is still pending.
        assert!(refresher.trigger().is_none());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        gate.notify_one();
        handle.await.unwrap();

        // Once the fetch completed a new trigger is allowed again.
        let handle = refresher.trigger().unwrap();
        gate.notify_one();
        handle.await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_late_refresh_after_logout_is_discarded() {
        let store = logged_in_store("t1");
        let gate = Arc::new(Notify::new());
        let source = Arc::new(GatedSource {
            gate: gate.clone(),
            calls: AtomicUsize::new(0),
            patch: UserPatch {
                email: Some("ghost@example.com".to_string()),
                ..UserPatch::default()
            },
        });

        let refresher = ProfileRefresher::new(store.clone(), source);
        let handle = refresher.trigger().unwrap();

        // Logout races ahead of the fetch completing.
        store.logout();
        gate.notify_one();
        handle.await.unwrap();

        assert!(!store.is_authenticated());
        assert_eq!(store.user(), None);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_last_known_profile() {
        let store = logged_in_store("t1");
        let refresher = ProfileRefresher::new(store.clone(), Arc::new(FailingSource));

        let handle = refresher.trigger().unwrap();
        handle.await.unwrap();

        assert_eq!(store.user().unwrap().email, "owner@example.com");
        assert!(store.is_authenticated());
    }
}
