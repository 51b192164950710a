//! Page-level state machine for the password-recovery flow.
//!
//! Combines the frozen URL-fragment snapshot, the live session state, and
//! two independent timers to drive the visible recovery UI through
//! verification, form, success and expiry states. Races are decided by
//! whichever side settles first; the loser's continuation is inert.

use std::sync::{Arc, Mutex};

use gather_config::RecoveryConfig;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::services::auth_operations::AuthOperations;
use crate::services::recovery_link::RecoveryLinkSnapshot;
use crate::services::session_store::{AuthState, SessionStore};
use crate::types::errors::AuthError;
use crate::utils::validation::validate_new_password;

/// Where the coordinator can send the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// The login page; `recovery_succeeded` is the marker displayed there.
    Login { recovery_succeeded: bool },
}

/// Navigation seam. Implementations replace the current history entry.
pub trait Navigator: Send + Sync {
    fn replace(&self, destination: Destination);
}

/// Visible state of the recovery page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryFlowState {
    /// Waiting for a session to materialise
    Verifying,
    /// Password form, with the last error to display if any
    ShowForm { error: Option<AuthError> },
    /// A password update is in flight
    Submitting,
    /// Password committed and the recovery session revoked
    Success,
    /// No session materialised within the verification window
    Expired,
    /// Ordinary authenticated visit; the page has been redirected
    RedirectAway,
}

impl RecoveryFlowState {
    /// Error the page should display for this state, if any. Expiry is a
    /// state of its own but surfaces as a regular error message.
    pub fn display_error(&self) -> Option<AuthError> {
        match self {
            RecoveryFlowState::ShowForm { error } => error.clone(),
            RecoveryFlowState::Expired => Some(AuthError::LinkExpired),
            _ => None,
        }
    }
}

/// Coordinator driving the recovery page.
///
/// Either recovery signal alone is sufficient and authoritative: the frozen
/// URL snapshot OR the live recovery flag routes to the form, never both
/// required. A stale recovery link followed by a same-tab ordinary sign-in
/// is therefore still treated as a recovery visit; that window is a known,
/// deliberate simplification.
pub struct RecoveryFlowCoordinator {
    store: Arc<SessionStore>,
    operations: AuthOperations,
    navigator: Arc<dyn Navigator>,
    config: RecoveryConfig,
    link: RecoveryLinkSnapshot,
    state: watch::Sender<RecoveryFlowState>,
    redirect_task: Mutex<Option<JoinHandle<()>>>,
}

impl RecoveryFlowCoordinator {
    pub fn new(
        store: Arc<SessionStore>,
        operations: AuthOperations,
        navigator: Arc<dyn Navigator>,
        config: RecoveryConfig,
        link: RecoveryLinkSnapshot,
    ) -> Self {
        let (state, _) = watch::channel(RecoveryFlowState::Verifying);
        Self {
            store,
            operations,
            navigator,
            config,
            link,
            state,
            redirect_task: Mutex::new(None),
        }
    }

    /// Current machine state.
    pub fn current(&self) -> RecoveryFlowState {
        self.state.borrow().clone()
    }

    /// Watch state transitions. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<RecoveryFlowState> {
        self.state.subscribe()
    }

    /// Run the verification phase: wait for a session to materialise and
    /// decide between the recovery form, a redirect for ordinary logins,
    /// and link expiry. Resolves when the flow leaves `Verifying`; dropping
    /// the future cancels the window timer.
    pub async fn verify(&self) -> RecoveryFlowState {
        if *self.state.borrow() != RecoveryFlowState::Verifying {
            return self.current();
        }

        let mut sessions = self.store.subscribe();
        let window = sleep(self.config.verification_window());
        tokio::pin!(window);

        loop {
            let snapshot = sessions.borrow_and_update().clone();
            if let Some(next) = self.evaluate(&snapshot) {
                return next;
            }

            tokio::select! {
                _ = &mut window => {
                    warn!("no session within the verification window, link expired");
                    self.set_state(RecoveryFlowState::Expired);
                    return RecoveryFlowState::Expired;
                }
                changed = sessions.changed() => {
                    if changed.is_err() {
                        // Store torn down; only the window can settle this.
                        window.as_mut().await;
                        self.set_state(RecoveryFlowState::Expired);
                        return RecoveryFlowState::Expired;
                    }
                }
            }
        }
    }

    /// Submit the password form. Local validation failures stay in the form
    /// state and never reach the provider; the provider call is raced
    /// against the update bound, and a late settlement after the race is
    /// decided produces no further state change.
    pub async fn submit(&self, new_password: &str, confirmation: &str) -> RecoveryFlowState {
        if !matches!(*self.state.borrow(), RecoveryFlowState::ShowForm { .. }) {
            return self.current();
        }

        if let Err(error) = validate_new_password(
            new_password,
            confirmation,
            self.operations.password_min_length(),
        ) {
            let next = RecoveryFlowState::ShowForm { error: Some(error) };
            self.set_state(next.clone());
            return next;
        }

        self.set_state(RecoveryFlowState::Submitting);

        match timeout(
            self.config.update_password_timeout(),
            self.operations.update_password(new_password),
        )
        .await
        {
            Ok(Ok(())) => {
                // The recovery session must not be reusable after the
                // password change: clear the flag, then revoke the session.
                self.store.clear_password_recovery();
                if let Err(error) = self.store.sign_out().await {
                    warn!(%error, "sign-out after password update failed");
                }
                info!("password recovery completed");
                self.set_state(RecoveryFlowState::Success);
                self.schedule_success_redirect();
                RecoveryFlowState::Success
            }
            Ok(Err(error)) => {
                warn!(%error, "password update rejected");
                let next = RecoveryFlowState::ShowForm {
                    error: Some(error),
                };
                self.set_state(next.clone());
                next
            }
            Err(_) => {
                warn!("password update timed out");
                let next = RecoveryFlowState::ShowForm {
                    error: Some(AuthError::Timeout),
                };
                self.set_state(next.clone());
                next
            }
        }
    }

    /// Cancel any pending delayed navigation. Dropping does the same.
    pub fn shutdown(&self) {
        if let Ok(mut guard) = self.redirect_task.lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }

    fn evaluate(&self, snapshot: &AuthState) -> Option<RecoveryFlowState> {
        if snapshot.user.is_none() {
            return None;
        }
        if snapshot.is_password_recovery || self.link.from_url() {
            debug!(
                from_url = self.link.from_url(),
                live_flag = snapshot.is_password_recovery,
                "session verified for recovery"
            );
            let next = RecoveryFlowState::ShowForm { error: None };
            self.set_state(next.clone());
            Some(next)
        } else {
            info!("authenticated visit without recovery signals, redirecting to login");
            self.navigator.replace(Destination::Login {
                recovery_succeeded: false,
            });
            self.set_state(RecoveryFlowState::RedirectAway);
            Some(RecoveryFlowState::RedirectAway)
        }
    }

    fn schedule_success_redirect(&self) {
        let navigator = self.navigator.clone();
        let delay = self.config.success_redirect_delay();
        let handle = tokio::spawn(async move {
            sleep(delay).await;
            navigator.replace(Destination::Login {
                recovery_succeeded: true,
            });
        });
        if let Ok(mut guard) = self.redirect_task.lock() {
            if let Some(previous) = guard.replace(handle) {
                previous.abort();
            }
        }
    }

    fn set_state(&self, next: RecoveryFlowState) {
        self.state.send_replace(next);
    }
}

impl Drop for RecoveryFlowCoordinator {
    fn drop(&mut self) {
        self.shutdown();
    }
}
