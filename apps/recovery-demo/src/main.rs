//! Scripted walkthroughs of the password-recovery flow against the mock
//! auth provider. Useful for eyeballing the state machine and its logging
//! without a real backend.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gather_auth::{
    AuthEvent, AuthOperations, Destination, MockAuthProvider, Navigator, RecoveryFlowCoordinator,
    RecoveryFlowState, RecoveryLinkSnapshot, SessionStore,
};
use tokio::time::sleep;
use tracing::info;
use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

#[derive(Parser)]
#[command(name = "recovery-demo")]
#[command(about = "Walk the password-recovery state machine through a scenario")]
struct Cli {
    #[command(subcommand)]
    scenario: Scenario,
}

#[derive(Subcommand)]
enum Scenario {
    /// Recovery link arrives, password updated, session revoked
    Success,
    /// The provider hangs on the password update until the bound fires
    Timeout,
    /// No session ever materialises and the link expires
    Expired,
    /// An ordinary login visits the recovery page and is redirected
    NormalLogin,
}

struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn replace(&self, destination: Destination) {
        info!(?destination, "navigation (replacing history)");
    }
}

fn init_tracing() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = SubscriberBuilder::default()
        .with_env_filter(env_filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    let mut config = gather_config::load()?;
    // Shrink the windows so the walkthrough stays snappy; production
    // defaults come from gather-config.
    config.recovery.verification_window_seconds = 3;
    config.recovery.update_password_timeout_seconds = 2;
    config.recovery.success_redirect_delay_seconds = 1;

    let provider = Arc::new(MockAuthProvider::new());
    let store = Arc::new(SessionStore::start(provider.clone()));
    let operations = AuthOperations::new(provider.clone(), &config.auth);
    let navigator = Arc::new(LoggingNavigator);

    let (fragment, event) = match cli.scenario {
        Scenario::Success | Scenario::Timeout => {
            ("access_token=demo&type=recovery", Some(AuthEvent::PasswordRecovery))
        }
        Scenario::Expired => ("access_token=stale&type=recovery", None),
        Scenario::NormalLogin => ("", Some(AuthEvent::SignedIn)),
    };

    let link = RecoveryLinkSnapshot::capture(fragment, &config.recovery.fragment_marker);
    info!(recovery_from_url = link.from_url(), "fragment captured");

    let coordinator = Arc::new(RecoveryFlowCoordinator::new(
        store.clone(),
        operations,
        navigator,
        config.recovery.clone(),
        link,
    ));

    if matches!(cli.scenario, Scenario::Timeout) {
        provider.hang_update_password();
    }

    if let Some(event) = event {
        let provider = provider.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(300)).await;
            provider.emit(event, Some(MockAuthProvider::session("maya@example.com")));
        });
    }

    let state = coordinator.verify().await;
    info!(?state, "verification settled");

    if matches!(state, RecoveryFlowState::ShowForm { .. }) {
        let state = coordinator
            .submit("correct-horse-battery", "correct-horse-battery")
            .await;
        info!(?state, "submission settled");

        // Give the delayed success navigation a chance to fire.
        sleep(config.recovery.success_redirect_delay() + Duration::from_millis(200)).await;
    }

    info!(store_state = ?store.current(), "final session state");
    store.close();
    Ok(())
}
