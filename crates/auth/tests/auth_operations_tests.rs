//! Integration tests for the credential operations: local validation
//! short-circuits, provider error classification, and the follow-up events
//! successful calls leave on the stream.

use std::sync::Arc;
use std::time::Duration;

use gather_auth::{AuthChange, AuthError, AuthEvent, AuthOperations, AuthProvider, MockAuthProvider};
use gather_config::AuthConfig;
use tokio::sync::broadcast;
use tokio::time::sleep;

type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

struct TestContext {
    provider: Arc<MockAuthProvider>,
    operations: AuthOperations,
    events: broadcast::Receiver<AuthChange>,
}

impl TestContext {
    fn new() -> Self {
        let provider = Arc::new(MockAuthProvider::new());
        let operations = AuthOperations::new(provider.clone(), &AuthConfig::default());
        let events = provider.subscribe();
        Self {
            provider,
            operations,
            events,
        }
    }

    /// Wait past the provider's event gap and assert nothing arrived.
    async fn assert_stream_silent(&mut self) {
        sleep(Duration::from_millis(200)).await;
        assert!(
            matches!(
                self.events.try_recv(),
                Err(broadcast::error::TryRecvError::Empty)
            ),
            "no event should have been emitted"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn sign_in_trims_the_email_before_it_reaches_the_provider() -> TestResult {
    let mut ctx = TestContext::new();

    ctx.operations
        .sign_in("  maya@example.com  ", "password123")
        .await?;

    let change = ctx.events.recv().await?;
    assert_eq!(change.event, AuthEvent::SignedIn);
    let session = change.session.ok_or("expected a session")?;
    assert_eq!(session.user.email.as_deref(), Some("maya@example.com"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn empty_password_is_rejected_locally() {
    let mut ctx = TestContext::new();

    let result = ctx.operations.sign_in("maya@example.com", "").await;

    match result {
        Err(AuthError::Validation(message)) => assert!(message.contains("password")),
        other => panic!("expected validation error, got {other:?}"),
    }
    ctx.assert_stream_silent().await;
}

#[tokio::test(start_paused = true)]
async fn malformed_email_is_rejected_locally() {
    let mut ctx = TestContext::new();

    let result = ctx.operations.sign_in("not-an-email", "password123").await;

    assert!(matches!(result, Err(AuthError::Validation(_))));
    ctx.assert_stream_silent().await;
}

#[tokio::test(start_paused = true)]
async fn rejected_credentials_are_classified() {
    let mut ctx = TestContext::new();
    ctx.provider
        .set_sign_in_error("Invalid login credentials")
        .await;

    let result = ctx
        .operations
        .sign_in("maya@example.com", "password123")
        .await;

    assert_eq!(result, Err(AuthError::InvalidCredentials));
    ctx.assert_stream_silent().await;
}

#[tokio::test(start_paused = true)]
async fn sign_up_trims_and_forwards_the_display_name() -> TestResult {
    let mut ctx = TestContext::new();

    ctx.operations
        .sign_up(" maya@example.com ", "password123", "  Maya  ")
        .await?;

    let change = ctx.events.recv().await?;
    assert_eq!(change.event, AuthEvent::SignedIn);
    let session = change.session.ok_or("expected a session")?;
    assert_eq!(session.user.display_name.as_deref(), Some("Maya"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn blank_display_name_is_dropped_from_sign_up() -> TestResult {
    let mut ctx = TestContext::new();

    ctx.operations
        .sign_up("maya@example.com", "password123", "   ")
        .await?;

    let change = ctx.events.recv().await?;
    let session = change.session.ok_or("expected a session")?;
    assert_eq!(session.user.display_name, None);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn duplicate_registration_is_classified() {
    let ctx = TestContext::new();
    ctx.provider
        .set_sign_up_error("User already registered")
        .await;

    let result = ctx
        .operations
        .sign_up("maya@example.com", "password123", "Maya")
        .await;

    assert_eq!(result, Err(AuthError::AlreadyRegistered));
}

#[tokio::test(start_paused = true)]
async fn short_sign_up_password_never_reaches_the_provider() {
    let mut ctx = TestContext::new();

    let result = ctx
        .operations
        .sign_up("maya@example.com", "seven77", "Maya")
        .await;

    match result {
        Err(AuthError::Validation(message)) => {
            assert!(message.contains("at least 8 characters"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    ctx.assert_stream_silent().await;
}

#[tokio::test(start_paused = true)]
async fn reset_request_reaches_the_provider_once() -> TestResult {
    let ctx = TestContext::new();

    ctx.operations
        .reset_password_for_email("  maya@example.com  ")
        .await?;

    assert_eq!(ctx.provider.reset_calls(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn reset_failure_falls_back_to_the_generic_error() {
    let ctx = TestContext::new();
    ctx.provider.set_reset_error("rate limit exceeded").await;

    let result = ctx
        .operations
        .reset_password_for_email("maya@example.com")
        .await;

    assert_eq!(
        result,
        Err(AuthError::Provider("rate limit exceeded".to_string()))
    );
}

#[tokio::test(start_paused = true)]
async fn sign_out_delegates_and_emits_the_follow_up_event() -> TestResult {
    let mut ctx = TestContext::new();

    ctx.operations.sign_out().await?;

    assert_eq!(ctx.provider.sign_out_calls(), 1);
    let change = ctx.events.recv().await?;
    assert_eq!(change.event, AuthEvent::SignedOut);
    assert!(change.session.is_none());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn follow_up_events_can_be_disabled() -> TestResult {
    let mut ctx = TestContext::new();
    ctx.provider.disable_follow_up_events();

    ctx.operations
        .sign_in("maya@example.com", "password123")
        .await?;

    ctx.assert_stream_silent().await;
    Ok(())
}
