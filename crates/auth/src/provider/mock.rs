//! Mock auth provider for tests and local demos.
//!
//! The mock is scriptable: individual operations can be made to fail with a
//! configured provider error, the password update can be made to hang
//! forever, and arbitrary events can be pushed on the stream. Successful
//! sign-in and sign-out calls emit their matching event after a short delay
//! to model the asynchronous gap between an operation resolving and the
//! backend's event stream catching up.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as TimeDelta, Utc};
use tokio::sync::{broadcast, RwLock};

use crate::entities::{AuthUser, Profile, Session};
use crate::provider::{AuthProvider, ProviderResult, SignUpMetadata};
use crate::types::errors::ProviderError;
use crate::types::events::{AuthChange, AuthEvent};

/// Delay between a successful credential call resolving and the matching
/// event appearing on the stream.
const EVENT_GAP: Duration = Duration::from_millis(50);

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Scriptable in-memory auth provider.
pub struct MockAuthProvider {
    events: broadcast::Sender<AuthChange>,
    restored: RwLock<Option<Session>>,
    profiles: RwLock<HashMap<String, Profile>>,
    sign_in_error: RwLock<Option<ProviderError>>,
    sign_up_error: RwLock<Option<ProviderError>>,
    reset_error: RwLock<Option<ProviderError>>,
    update_password_error: RwLock<Option<ProviderError>>,
    fail_profile_fetch: AtomicBool,
    hang_update_password: AtomicBool,
    follow_up_events: AtomicBool,
    update_password_calls: AtomicUsize,
    sign_out_calls: AtomicUsize,
    reset_calls: AtomicUsize,
}

impl Default for MockAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAuthProvider {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            events,
            restored: RwLock::new(None),
            profiles: RwLock::new(HashMap::new()),
            sign_in_error: RwLock::new(None),
            sign_up_error: RwLock::new(None),
            reset_error: RwLock::new(None),
            update_password_error: RwLock::new(None),
            fail_profile_fetch: AtomicBool::new(false),
            hang_update_password: AtomicBool::new(false),
            follow_up_events: AtomicBool::new(true),
            update_password_calls: AtomicUsize::new(0),
            sign_out_calls: AtomicUsize::new(0),
            reset_calls: AtomicUsize::new(0),
        }
    }

    /// Build a session for the given email, with an opaque token and an
    /// expiry an hour out.
    pub fn session(email: &str) -> Session {
        let local = email.split('@').next().unwrap_or(email);
        Session {
            user: AuthUser {
                id: format!("user-{local}"),
                email: Some(email.to_string()),
                display_name: None,
            },
            access_token: format!("token-{local}"),
            expires_at: Utc::now() + TimeDelta::hours(1),
        }
    }

    /// Push an event on the stream, as the backend would.
    pub fn emit(&self, event: AuthEvent, session: Option<Session>) {
        let _ = self.events.send(AuthChange { event, session });
    }

    /// Seed the session returned by `restore_session`.
    pub async fn set_restored_session(&self, session: Session) {
        *self.restored.write().await = Some(session);
    }

    /// Seed the profile returned for a user. Without a seeded profile a
    /// fresh default is returned.
    pub async fn set_profile(&self, profile: Profile) {
        self.profiles
            .write()
            .await
            .insert(profile.user_id.clone(), profile);
    }

    pub async fn set_sign_in_error(&self, message: &str) {
        *self.sign_in_error.write().await = Some(ProviderError::new(message));
    }

    pub async fn set_sign_up_error(&self, message: &str) {
        *self.sign_up_error.write().await = Some(ProviderError::new(message));
    }

    pub async fn set_reset_error(&self, message: &str) {
        *self.reset_error.write().await = Some(ProviderError::new(message));
    }

    pub async fn set_update_password_error(&self, message: &str) {
        *self.update_password_error.write().await = Some(ProviderError::new(message));
    }

    /// Make every profile fetch fail.
    pub fn fail_profile_fetch(&self) {
        self.fail_profile_fetch.store(true, Ordering::SeqCst);
    }

    /// Make `update_user_password` never settle.
    pub fn hang_update_password(&self) {
        self.hang_update_password.store(true, Ordering::SeqCst);
    }

    /// Disable the automatic follow-up events after sign-in and sign-out,
    /// for tests that drive the stream entirely by hand.
    pub fn disable_follow_up_events(&self) {
        self.follow_up_events.store(false, Ordering::SeqCst);
    }

    pub fn update_password_calls(&self) -> usize {
        self.update_password_calls.load(Ordering::SeqCst)
    }

    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) -> usize {
        self.reset_calls.load(Ordering::SeqCst)
    }

    fn emit_later(&self, event: AuthEvent, session: Option<Session>) {
        if !self.follow_up_events.load(Ordering::SeqCst) {
            return;
        }
        let sender = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(EVENT_GAP).await;
            let _ = sender.send(AuthChange { event, session });
        });
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn restore_session(&self) -> ProviderResult<Option<Session>> {
        Ok(self.restored.read().await.clone())
    }

    async fn sign_in_with_password(&self, email: &str, _password: &str) -> ProviderResult<()> {
        if let Some(error) = self.sign_in_error.read().await.clone() {
            return Err(error);
        }
        self.emit_later(AuthEvent::SignedIn, Some(Self::session(email)));
        Ok(())
    }

    async fn sign_up(
        &self,
        email: &str,
        _password: &str,
        metadata: SignUpMetadata,
    ) -> ProviderResult<()> {
        if let Some(error) = self.sign_up_error.read().await.clone() {
            return Err(error);
        }
        let mut session = Self::session(email);
        session.user.display_name = metadata.display_name;
        self.emit_later(AuthEvent::SignedIn, Some(session));
        Ok(())
    }

    async fn sign_out(&self) -> ProviderResult<()> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        self.emit_later(AuthEvent::SignedOut, None);
        Ok(())
    }

    async fn reset_password_for_email(&self, _email: &str) -> ProviderResult<()> {
        self.reset_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.reset_error.read().await.clone() {
            return Err(error);
        }
        Ok(())
    }

    async fn update_user_password(&self, _new_password: &str) -> ProviderResult<()> {
        self.update_password_calls.fetch_add(1, Ordering::SeqCst);
        if self.hang_update_password.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if let Some(error) = self.update_password_error.read().await.clone() {
            return Err(error);
        }
        Ok(())
    }

    async fn fetch_profile(&self, user_id: &str) -> ProviderResult<Profile> {
        if self.fail_profile_fetch.load(Ordering::SeqCst) {
            return Err(ProviderError::new("profile service unavailable"));
        }
        Ok(self
            .profiles
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| Profile {
                user_id: user_id.to_string(),
                onboarding_completed: false,
                display_name: None,
            }))
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.events.subscribe()
    }
}
