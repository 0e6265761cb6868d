//! Identity and session types
//!
//! This module defines the values that flow through a delegated sign-in:
//! the provider's identity assertion, the opaque credential derived from it,
//! and the session principal produced once the credential is accepted.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Supported delegated identity providers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IdentityProviderKind {
    /// Google Sign-In
    Google,
    /// Sign in with Apple
    Apple,
    /// Microsoft account
    Microsoft,
    /// GitHub OAuth
    GitHub,
}

impl IdentityProviderKind {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityProviderKind::Google => "google",
            IdentityProviderKind::Apple => "apple",
            IdentityProviderKind::Microsoft => "microsoft",
            IdentityProviderKind::GitHub => "github",
        }
    }

    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "google" | "google.com" => Some(IdentityProviderKind::Google),
            "apple" | "apple.com" => Some(IdentityProviderKind::Apple),
            "microsoft" | "microsoft.com" => Some(IdentityProviderKind::Microsoft),
            "github" | "github.com" => Some(IdentityProviderKind::GitHub),
            _ => None,
        }
    }

    /// Human readable name used in user-facing messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            IdentityProviderKind::Google => "Google",
            IdentityProviderKind::Apple => "Apple",
            IdentityProviderKind::Microsoft => "Microsoft",
            IdentityProviderKind::GitHub => "GitHub",
        }
    }
}

impl std::fmt::Display for IdentityProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity assertion returned by a successful delegated sign-in.
///
/// Produced once per sign-in attempt and discarded after the exchange.
/// The provider token is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityAssertion {
    /// Name the user goes by at the provider
    pub subject_display_name: String,

    /// Email address
    pub email: String,

    /// Profile picture reference
    pub photo_ref: Option<String>,

    /// Provider-issued ID token
    pub provider_id_token: String,
}

impl IdentityAssertion {
    /// Create a new identity assertion.
    pub fn new(
        subject_display_name: impl Into<String>,
        email: impl Into<String>,
        provider_id_token: impl Into<String>,
    ) -> Self {
        Self {
            subject_display_name: subject_display_name.into(),
            email: email.into(),
            photo_ref: None,
            provider_id_token: provider_id_token.into(),
        }
    }

    /// Set the profile picture reference.
    pub fn with_photo(mut self, photo_ref: impl Into<String>) -> Self {
        self.photo_ref = Some(photo_ref.into());
        self
    }
}

impl std::fmt::Debug for IdentityAssertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityAssertion")
            .field("subject_display_name", &self.subject_display_name)
            .field("email", &self.email)
            .field("photo_ref", &self.photo_ref)
            .field("provider_id_token", &"<redacted>")
            .finish()
    }
}

/// Session credential derived from a provider ID token.
///
/// Opaque to the orchestrator; only the credential exchanger interprets it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    provider: IdentityProviderKind,
    id_token: String,
}

impl Credential {
    /// Wrap a provider ID token.
    pub fn new(provider: IdentityProviderKind, id_token: impl Into<String>) -> Self {
        Self {
            provider,
            id_token: id_token.into(),
        }
    }

    /// Provider that issued the token.
    pub fn provider(&self) -> IdentityProviderKind {
        self.provider
    }

    /// The raw ID token.
    pub fn id_token(&self) -> &str {
        &self.id_token
    }

    /// Short, non-reversible token fingerprint for log correlation.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.id_token.as_bytes());
        let hash = hasher.finalize();
        base64::Engine::encode(
            &base64::engine::general_purpose::URL_SAFE_NO_PAD,
            &hash[..9],
        )
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("provider", &self.provider)
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

/// Authenticated session principal.
///
/// Owned by the session store for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPrincipal {
    /// Stable, provider-issued user identifier
    pub user_id: String,

    /// Email address
    pub email: String,

    /// Display name
    pub display_name: String,

    /// Profile picture URL
    pub photo_url: Option<String>,
}

impl SessionPrincipal {
    /// Create a new session principal.
    pub fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            display_name: display_name.into(),
            photo_url: None,
        }
    }

    /// Set the profile picture URL.
    pub fn with_photo_url(mut self, photo_url: impl Into<String>) -> Self {
        self.photo_url = Some(photo_url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parsing() {
        assert_eq!(
            IdentityProviderKind::parse("Google"),
            Some(IdentityProviderKind::Google)
        );
        assert_eq!(
            IdentityProviderKind::parse("apple.com"),
            Some(IdentityProviderKind::Apple)
        );
        assert_eq!(IdentityProviderKind::parse("myspace"), None);
        assert_eq!(IdentityProviderKind::GitHub.display_name(), "GitHub");
    }

    #[test]
    fn test_assertion_debug_redacts_token() {
        let assertion = IdentityAssertion::new("Ada", "ada@x.com", "tok1").with_photo("p.png");
        let printed = format!("{:?}", assertion);
        assert!(printed.contains("Ada"));
        assert!(!printed.contains("tok1"));
    }

    #[test]
    fn test_credential_fingerprint() {
        let a = Credential::new(IdentityProviderKind::Google, "tok1");
        let b = Credential::new(IdentityProviderKind::Google, "tok2");

        assert_eq!(a.fingerprint(), a.clone().fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 12);
        assert!(!format!("{:?}", a).contains("tok1"));
    }

    #[test]
    fn test_principal_builder() {
        let principal =
            SessionPrincipal::new("uid-1", "ada@x.com", "Ada").with_photo_url("https://p/ada");
        assert_eq!(principal.user_id, "uid-1");
        assert_eq!(principal.photo_url.as_deref(), Some("https://p/ada"));
    }
}
