use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "gather.toml",
    "config/gather.toml",
    "crates/config/gather.toml",
    "../gather.toml",
    "../config/gather.toml",
    "../crates/config/gather.toml",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub auth: AuthConfig,
    pub recovery: RecoveryConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            auth: AuthConfig::default(),
            recovery: RecoveryConfig::default(),
        }
    }
}

/// Settings applied to sign-in, sign-up and password-change requests before
/// they reach the backend provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "AuthConfig::default_password_min_length")]
    pub password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password_min_length: Self::default_password_min_length(),
        }
    }
}

impl AuthConfig {
    const fn default_password_min_length() -> usize {
        8
    }
}

/// Settings for the password-recovery page flow.
///
/// ```
/// use gather_config::RecoveryConfig;
///
/// let recovery = RecoveryConfig::default();
/// assert_eq!(recovery.verification_window_seconds, 12);
/// assert_eq!(recovery.fragment_marker, "type=recovery");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// How long to wait for a session to materialise after landing on the
    /// recovery page before declaring the link expired.
    #[serde(default = "RecoveryConfig::default_verification_window")]
    pub verification_window_seconds: u64,
    /// Upper bound on the password-update call before it is reported as a
    /// timeout instead of a provider failure.
    #[serde(default = "RecoveryConfig::default_update_password_timeout")]
    pub update_password_timeout_seconds: u64,
    /// Delay between entering the success state and navigating back to login.
    #[serde(default = "RecoveryConfig::default_success_redirect_delay")]
    pub success_redirect_delay_seconds: u64,
    /// Substring that marks a URL fragment as originating from a recovery
    /// email link. Owned by the backend provider, matched opaquely.
    #[serde(default = "RecoveryConfig::default_fragment_marker")]
    pub fragment_marker: String,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            verification_window_seconds: Self::default_verification_window(),
            update_password_timeout_seconds: Self::default_update_password_timeout(),
            success_redirect_delay_seconds: Self::default_success_redirect_delay(),
            fragment_marker: Self::default_fragment_marker(),
        }
    }
}

impl RecoveryConfig {
    const fn default_verification_window() -> u64 {
        12
    }

    const fn default_update_password_timeout() -> u64 {
        15
    }

    const fn default_success_redirect_delay() -> u64 {
        3
    }

    fn default_fragment_marker() -> String {
        "type=recovery".to_string()
    }

    pub fn verification_window(&self) -> Duration {
        Duration::from_secs(self.verification_window_seconds)
    }

    pub fn update_password_timeout(&self) -> Duration {
        Duration::from_secs(self.update_password_timeout_seconds)
    }

    pub fn success_redirect_delay(&self) -> Duration {
        Duration::from_secs(self.success_redirect_delay_seconds)
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use gather_config::load;
///
/// std::env::remove_var("GATHER_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert_eq!(config.recovery.verification_window_seconds, 12);
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder();
    builder = builder
        .set_default(
            "auth.password_min_length",
            i64::try_from(defaults.auth.password_min_length).unwrap_or(i64::MAX),
        )
        .unwrap()
        .set_default(
            "recovery.verification_window_seconds",
            i64::try_from(defaults.recovery.verification_window_seconds).unwrap_or(i64::MAX),
        )
        .unwrap()
        .set_default(
            "recovery.update_password_timeout_seconds",
            i64::try_from(defaults.recovery.update_password_timeout_seconds).unwrap_or(i64::MAX),
        )
        .unwrap()
        .set_default(
            "recovery.success_redirect_delay_seconds",
            i64::try_from(defaults.recovery.success_redirect_delay_seconds).unwrap_or(i64::MAX),
        )
        .unwrap()
        .set_default(
            "recovery.fragment_marker",
            defaults.recovery.fragment_marker.clone(),
        )
        .unwrap();

    let environment_overrides = config::Environment::with_prefix("GATHER").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("GATHER_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via GATHER_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    validate(&config)?;

    debug!(?config, "loaded auth core configuration");
    Ok(config)
}

fn validate(config: &AppConfig) -> anyhow::Result<()> {
    if config.recovery.verification_window_seconds == 0 {
        anyhow::bail!("recovery.verification_window_seconds must be greater than zero");
    }
    if config.recovery.update_password_timeout_seconds == 0 {
        anyhow::bail!("recovery.update_password_timeout_seconds must be greater than zero");
    }
    if config.recovery.fragment_marker.trim().is_empty() {
        anyhow::bail!("recovery.fragment_marker must not be empty");
    }
    if config.auth.password_min_length == 0 {
        anyhow::bail!("auth.password_min_length must be greater than zero");
    }
    Ok(())
}
