//! Session configuration.
//!
//! Collects the sign-in provider settings and the profile reconciliation
//! tuning. Configuration is loaded from environment variables with defaults
//! suitable for the production app.

use crate::retry::RetryConfig;
use std::time::Duration;
use taski_auth::SignInConfig;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required environment variable.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Session coordinator configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Identity provider settings.
    pub sign_in: SignInConfig,

    /// Re-check the signed-in user's profile when the app launches.
    pub reconcile_on_launch: bool,

    /// Backoff used while reconciling a missing profile.
    pub reconcile_retry: RetryConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sign_in: SignInConfig::default(),
            reconcile_on_launch: true,
            reconcile_retry: RetryConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Load configuration from environment variables.
    ///
    /// Besides the variables read by [`SignInConfig::from_env`]:
    /// - `TASKI_RECONCILE_ON_LAUNCH`: reconcile profiles at launch (default: true)
    /// - `TASKI_RECONCILE_MAX_ATTEMPTS`: reconciliation attempts (default: 4)
    /// - `TASKI_RECONCILE_INITIAL_DELAY_MS`: first backoff delay (default: 250)
    pub fn from_env() -> Self {
        let default = Self::default();

        let mut reconcile_retry = default.reconcile_retry;
        if let Some(attempts) = env_parse("TASKI_RECONCILE_MAX_ATTEMPTS") {
            reconcile_retry.max_attempts = attempts;
        }
        if let Some(ms) = env_parse("TASKI_RECONCILE_INITIAL_DELAY_MS") {
            reconcile_retry.initial_delay = Duration::from_millis(ms);
        }

        Self {
            sign_in: SignInConfig::from_env(),
            reconcile_on_launch: std::env::var("TASKI_RECONCILE_ON_LAUNCH")
                .map(|s| s != "false" && s != "0")
                .unwrap_or(default.reconcile_on_launch),
            reconcile_retry,
        }
    }

    /// Validate the configuration before wiring the coordinator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sign_in.web_client_id.is_none() {
            return Err(ConfigError::MissingEnvVar(
                "TASKI_GOOGLE_WEB_CLIENT_ID".to_string(),
            ));
        }
        self.sign_in
            .validate()
            .map_err(|e| ConfigError::InvalidValue {
                key: "TASKI_GOOGLE_WEB_CLIENT_ID".to_string(),
                message: e.to_string(),
            })?;
        if self.reconcile_retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "TASKI_RECONCILE_MAX_ATTEMPTS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}
