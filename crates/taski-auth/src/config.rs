//! Sign-in configuration.
//!
//! Holds the settings an identity provider client is configured with before
//! the first sign-in. Values are loaded from environment variables with
//! defaults matching the mobile app's Google Sign-In setup.

use crate::error::{AuthError, AuthResult};
use crate::identity::IdentityProviderKind;
use serde::{Deserialize, Serialize};

/// Delegated sign-in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInConfig {
    /// Provider type
    pub provider: IdentityProviderKind,

    /// OAuth web client ID the provider issues ID tokens for.
    pub web_client_id: Option<String>,

    /// Request a server auth code for offline access.
    pub offline_access: bool,

    /// Prompt the user to update outdated provider services during preflight.
    pub show_services_update_dialog: bool,

    /// Scopes to request
    pub scopes: Vec<String>,
}

impl Default for SignInConfig {
    fn default() -> Self {
        Self::new(IdentityProviderKind::Google)
    }
}

impl SignInConfig {
    /// Create a configuration for a provider with its default scopes.
    pub fn new(provider: IdentityProviderKind) -> Self {
        Self {
            provider,
            web_client_id: None,
            offline_access: true,
            show_services_update_dialog: true,
            scopes: default_scopes(provider)
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Set the OAuth web client ID.
    pub fn with_web_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.web_client_id = Some(client_id.into());
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TASKI_SIGN_IN_PROVIDER`: provider name (default: google)
    /// - `TASKI_GOOGLE_WEB_CLIENT_ID`: OAuth web client ID
    /// - `TASKI_GOOGLE_OFFLINE_ACCESS`: request offline access (default: true)
    /// - `TASKI_SHOW_SERVICES_UPDATE_DIALOG`: prompt for services update (default: true)
    pub fn from_env() -> Self {
        let provider = std::env::var("TASKI_SIGN_IN_PROVIDER")
            .ok()
            .and_then(|s| IdentityProviderKind::parse(&s))
            .unwrap_or(IdentityProviderKind::Google);
        let default = Self::new(provider);

        Self {
            web_client_id: std::env::var("TASKI_GOOGLE_WEB_CLIENT_ID").ok(),
            offline_access: env_flag("TASKI_GOOGLE_OFFLINE_ACCESS", default.offline_access),
            show_services_update_dialog: env_flag(
                "TASKI_SHOW_SERVICES_UPDATE_DIALOG",
                default.show_services_update_dialog,
            ),
            ..default
        }
    }

    /// Validate that the provider client can be configured.
    pub fn validate(&self) -> AuthResult<()> {
        match self.web_client_id.as_deref() {
            None => Err(AuthError::Config("web client ID not configured".to_string())),
            Some(id) if id.trim().is_empty() => {
                Err(AuthError::Config("web client ID is empty".to_string()))
            }
            Some(_) => Ok(()),
        }
    }
}

fn default_scopes(provider: IdentityProviderKind) -> Vec<&'static str> {
    match provider {
        IdentityProviderKind::Google => vec!["openid", "email", "profile"],
        IdentityProviderKind::Apple => vec!["name", "email"],
        IdentityProviderKind::Microsoft => vec!["openid", "email", "profile", "User.Read"],
        IdentityProviderKind::GitHub => vec!["user:email", "read:user"],
    }
}

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|s| s != "false" && s != "0")
        .unwrap_or(default)
}
