//! Single source of truth for "who is logged in right now".
//!
//! The store subscribes to the provider's event stream at startup, restores
//! any persisted session, and publishes every transition through a watch
//! channel. It is mutated only by its own event task and by the explicit
//! [`SessionStore::clear_password_recovery`] and [`SessionStore::sign_out`]
//! calls; consumers read snapshots and subscribe.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::entities::{AuthUser, Profile};
use crate::provider::AuthProvider;
use crate::types::errors::AuthResult;
use crate::types::events::{AuthChange, AuthEvent};

/// Bound on the initial persisted-session restore; `loading` must settle
/// even if the provider never answers.
const SESSION_RESTORE_TIMEOUT: Duration = Duration::from_secs(10);

/// Snapshot of the current authentication state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthState {
    /// The authenticated identity, if any
    pub user: Option<AuthUser>,
    /// Application profile for the user; absent means "unknown", not
    /// "logged out"
    pub profile: Option<Profile>,
    /// True until the initial session restore settles
    pub loading: bool,
    /// True only after a password-recovery event, until explicitly cleared
    pub is_password_recovery: bool,
}

impl AuthState {
    fn initial() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }
}

/// Tab-lifetime holder of the current session, profile and recovery flag.
pub struct SessionStore {
    provider: Arc<dyn AuthProvider>,
    state: Arc<watch::Sender<AuthState>>,
    closed: Arc<AtomicBool>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl SessionStore {
    /// Start the store: subscribe to the provider's event stream, then
    /// restore any persisted session in the background.
    ///
    /// The subscription is established synchronously, before the first
    /// await point, so no event delivered after this call returns can be
    /// missed.
    pub fn start(provider: Arc<dyn AuthProvider>) -> Self {
        let (state, _) = watch::channel(AuthState::initial());
        let state = Arc::new(state);
        let closed = Arc::new(AtomicBool::new(false));
        let events = provider.subscribe();
        let listener = tokio::spawn(run(
            provider.clone(),
            state.clone(),
            events,
            closed.clone(),
        ));
        Self {
            provider,
            state,
            closed,
            listener: Mutex::new(Some(listener)),
        }
    }

    /// Synchronous read of the current state.
    pub fn current(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Watch state transitions. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Clear the recovery flag once the new password has been committed.
    /// Leaves the user and profile untouched.
    pub fn clear_password_recovery(&self) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        self.state.send_modify(|state| {
            state.is_password_recovery = false;
        });
    }

    /// Revoke the session with the provider and clear the local identity.
    ///
    /// The recovery flag is deliberately left alone; clearing it is a
    /// separate, explicit action.
    pub async fn sign_out(&self) -> AuthResult<()> {
        self.provider.sign_out().await?;
        if !self.closed.load(Ordering::SeqCst) {
            self.state.send_modify(|state| {
                state.user = None;
                state.profile = None;
            });
        }
        debug!("session revoked");
        Ok(())
    }

    /// Stop listening to provider events. After this, no state mutation
    /// occurs regardless of what the stream later delivers.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        if let Ok(mut guard) = self.listener.lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run(
    provider: Arc<dyn AuthProvider>,
    state: Arc<watch::Sender<AuthState>>,
    mut events: broadcast::Receiver<AuthChange>,
    closed: Arc<AtomicBool>,
) {
    // Events arriving while the restore is in flight stay queued in the
    // broadcast channel and are applied afterwards, in order. The restore
    // result is therefore always the first published transition, and a
    // hung provider delays queued events by at most the restore bound.
    restore(provider.as_ref(), &state).await;

    loop {
        match events.recv().await {
            Ok(change) => {
                if closed.load(Ordering::SeqCst) {
                    break;
                }
                apply(provider.as_ref(), &state, change).await;
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "auth event stream lagged, resuming from the latest event");
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("auth event stream closed");
                break;
            }
        }
    }
}

async fn restore(provider: &dyn AuthProvider, state: &watch::Sender<AuthState>) {
    match tokio::time::timeout(SESSION_RESTORE_TIMEOUT, provider.restore_session()).await {
        Ok(Ok(Some(session))) => {
            let profile = load_profile(provider, &session.user.id).await;
            let user = session.user;
            state.send_modify(|s| {
                s.user = Some(user);
                s.profile = profile;
                s.loading = false;
            });
            debug!("restored persisted session");
        }
        Ok(Ok(None)) => {
            state.send_modify(|s| s.loading = false);
        }
        Ok(Err(error)) => {
            warn!(%error, "session restore failed");
            state.send_modify(|s| s.loading = false);
        }
        Err(_) => {
            warn!("session restore timed out");
            state.send_modify(|s| s.loading = false);
        }
    }
}

async fn apply(provider: &dyn AuthProvider, state: &watch::Sender<AuthState>, change: AuthChange) {
    match change.event {
        AuthEvent::SignedIn | AuthEvent::TokenRefreshed | AuthEvent::PasswordRecovery => {
            let user = change.session.map(|session| session.user);
            let profile = match &user {
                Some(user) => load_profile(provider, &user.id).await,
                None => None,
            };
            let recovery = change.event == AuthEvent::PasswordRecovery;
            state.send_modify(|s| {
                s.user = user;
                s.profile = profile;
                s.loading = false;
                if recovery {
                    s.is_password_recovery = true;
                }
            });
            debug!(event = ?change.event, "applied auth event");
        }
        AuthEvent::SignedOut => {
            // Never touches the recovery flag; that clear is explicit.
            state.send_modify(|s| {
                s.user = None;
                s.profile = None;
                s.loading = false;
            });
            debug!("applied signed-out event");
        }
    }
}

async fn load_profile(provider: &dyn AuthProvider, user_id: &str) -> Option<Profile> {
    match provider.fetch_profile(user_id).await {
        Ok(profile) => Some(profile),
        Err(error) => {
            // The identity stays valid; consumers treat a missing profile
            // as unknown.
            warn!(%error, user_id, "profile fetch failed");
            None
        }
    }
}
