//! Delegated sign-in collaborators
//!
//! The identity provider SDK and the credential-backed session store are
//! opaque, trusted dependencies. This module defines the narrow contracts the
//! session orchestrator drives them through.

use crate::error::AuthResult;
use crate::identity::{Credential, IdentityAssertion, IdentityProviderKind, SessionPrincipal};
use async_trait::async_trait;

/// Outcome of a delegated sign-in prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelegatedSignIn {
    /// The user dismissed the provider's sign-in UI
    Cancelled,
    /// The provider vouched for the user
    Assertion(IdentityAssertion),
}

impl DelegatedSignIn {
    /// Check if the user cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DelegatedSignIn::Cancelled)
    }
}

/// Identity provider client (e.g. Google Sign-In).
#[async_trait]
pub trait IdentityProviderClient: Send + Sync {
    /// Provider this client signs in with.
    fn kind(&self) -> IdentityProviderKind;

    /// Verify the provider runtime is installed and up to date.
    async fn ensure_services_available(&self) -> AuthResult<()>;

    /// Present the provider's sign-in flow.
    async fn sign_in(&self) -> AuthResult<DelegatedSignIn>;

    /// Forget the provider-side session.
    async fn sign_out(&self) -> AuthResult<()>;
}

/// Credential exchanger (e.g. Firebase Auth).
#[async_trait]
pub trait CredentialExchanger: Send + Sync {
    /// Provider whose tokens this exchanger accepts.
    fn provider(&self) -> IdentityProviderKind;

    /// Convert a provider ID token into a session credential.
    fn credential_from_provider_token(&self, id_token: &str) -> Credential {
        Credential::new(self.provider(), id_token)
    }

    /// Establish an authenticated session from a credential.
    async fn establish_session(&self, credential: Credential) -> AuthResult<SessionPrincipal>;

    /// Session persisted from an earlier launch, if any.
    async fn current_session(&self) -> AuthResult<Option<SessionPrincipal>>;

    /// End the authenticated session.
    async fn sign_out(&self) -> AuthResult<()>;
}
