//! Delegated sign-in orchestration
//!
//! This module drives one sign-in run end to end:
//!
//! ```text
//! preflight ─→ delegate ─→ announce ─→ exchange ─→ provision ─→ publish
//!     │            │                       │            │
//!     └─ error     ├─ cancelled ─→ idle    └── error ───┘
//!                  └─ error
//! ```
//!
//! Only the delegate step can be cancelled by the user. Once intent has been
//! announced the rest of the run executes on its own task, so dropping the
//! caller's future never leaves a half-applied exchange or profile write.

use crate::notify::{Notification, Notifier, TracingNotifier};
use crate::provision::{provision_profile, record_from_assertion};
use crate::store::SessionStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use taski_auth::{
    AuthError, AuthResult, CredentialExchanger, DelegatedSignIn, IdentityAssertion,
    IdentityProviderClient, SessionPrincipal,
};
use taski_profile::ProfileStore;
use tracing::{instrument, Instrument};

/// How a sign-in run ended.
///
/// Informational only; the session store is the source of truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A principal was published
    SignedIn(SessionPrincipal),
    /// The user dismissed the provider prompt
    Cancelled,
    /// The run failed and an error was published
    Failed(AuthError),
    /// Another run was already in flight; nothing happened
    Ignored,
}

impl RunOutcome {
    /// Check if the run published a principal.
    pub fn is_signed_in(&self) -> bool {
        matches!(self, RunOutcome::SignedIn(_))
    }
}

struct Inner {
    provider: Arc<dyn IdentityProviderClient>,
    exchanger: Arc<dyn CredentialExchanger>,
    profiles: Arc<dyn ProfileStore>,
    store: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
    in_flight: AtomicBool,
}

/// Releases the in-flight flag when a run reaches a terminal state.
struct RunGuard {
    inner: Arc<Inner>,
}

impl RunGuard {
    fn acquire(inner: &Arc<Inner>) -> Option<Self> {
        inner
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunGuard {
                inner: inner.clone(),
            })
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.inner.in_flight.store(false, Ordering::Release);
    }
}

/// Session orchestrator.
///
/// The only writer of the [`SessionStore`]. Cloning is cheap and clones share
/// the in-flight guard.
///
/// # Example
///
/// ```rust,no_run
/// use taski_session::{SessionOrchestrator, SessionStore};
/// use taski_profile::MemoryProfileStore;
/// use std::sync::Arc;
///
/// async fn sign_in(
///     provider: Arc<dyn taski_auth::IdentityProviderClient>,
///     exchanger: Arc<dyn taski_auth::CredentialExchanger>,
/// ) {
///     let orchestrator = SessionOrchestrator::new(
///         provider,
///         exchanger,
///         Arc::new(MemoryProfileStore::new()),
///         SessionStore::global(),
///     );
///
///     orchestrator.sign_in_with_delegated_identity().await;
///     println!("{:?}", orchestrator.store().state());
/// }
/// ```
#[derive(Clone)]
pub struct SessionOrchestrator {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SessionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionOrchestrator")
            .field("provider", &self.inner.provider.kind())
            .field("in_flight", &self.is_in_flight())
            .finish()
    }
}

impl SessionOrchestrator {
    /// Create an orchestrator that alerts through the log.
    pub fn new(
        provider: Arc<dyn IdentityProviderClient>,
        exchanger: Arc<dyn CredentialExchanger>,
        profiles: Arc<dyn ProfileStore>,
        store: Arc<SessionStore>,
    ) -> Self {
        Self::with_notifier(provider, exchanger, profiles, store, Arc::new(TracingNotifier))
    }

    /// Create an orchestrator with a custom alert sink.
    pub fn with_notifier(
        provider: Arc<dyn IdentityProviderClient>,
        exchanger: Arc<dyn CredentialExchanger>,
        profiles: Arc<dyn ProfileStore>,
        store: Arc<SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                provider,
                exchanger,
                profiles,
                store,
                notifier,
                in_flight: AtomicBool::new(false),
            }),
        }
    }

    /// The store this orchestrator publishes to.
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.inner.store
    }

    /// Check if a run is in flight.
    pub fn is_in_flight(&self) -> bool {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    /// Sign in through the delegated identity provider.
    ///
    /// Calls made while another run is in flight return
    /// [`RunOutcome::Ignored`] without side effects.
    #[instrument(skip(self), fields(provider = %self.inner.provider.kind()))]
    pub async fn sign_in_with_delegated_identity(&self) -> RunOutcome {
        let Some(guard) = RunGuard::acquire(&self.inner) else {
            tracing::debug!("Sign-in already in flight, ignoring");
            return RunOutcome::Ignored;
        };

        let assertion = match self.delegate().await {
            Ok(Some(assertion)) => assertion,
            Ok(None) => {
                tracing::info!("Sign-in cancelled by user");
                self.inner.store.end_loading();
                return RunOutcome::Cancelled;
            }
            Err(error) => return self.inner.fail(error),
        };

        self.inner.store.begin_loading();

        let inner = self.inner.clone();
        let run = tokio::spawn(
            async move {
                let _guard = guard;
                inner.supervise(assertion).await
            }
            .in_current_span(),
        );

        match run.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Sign-in supervisor terminated");
                RunOutcome::Failed(AuthError::Exchange(format!("sign-in task aborted: {}", e)))
            }
        }
    }

    /// Dismiss the last published error.
    pub fn clear_error(&self) {
        self.inner.store.clear_error();
    }

    /// Sign out of the session and the identity provider.
    ///
    /// Returns `false` without doing anything while a sign-in run is in
    /// flight. Collaborator failures are logged; the store is reset regardless.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> bool {
        let Some(_guard) = RunGuard::acquire(&self.inner) else {
            tracing::debug!("Sign-in in flight, ignoring sign-out");
            return false;
        };

        if let Err(e) = self.inner.exchanger.sign_out().await {
            tracing::warn!(error = %e, "Session sign-out failed");
        }
        if let Err(e) = self.inner.provider.sign_out().await {
            tracing::warn!(error = %e, "Provider sign-out failed");
        }

        self.inner.store.reset();
        tracing::info!("Signed out");
        true
    }

    /// Preflight and delegate; `Ok(None)` means the user cancelled.
    async fn delegate(&self) -> AuthResult<Option<IdentityAssertion>> {
        self.inner.provider.ensure_services_available().await?;

        match self.inner.provider.sign_in().await {
            Ok(DelegatedSignIn::Assertion(assertion)) => Ok(Some(assertion)),
            Ok(DelegatedSignIn::Cancelled) | Err(AuthError::Cancelled) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl Inner {
    /// Run the remaining steps on a worker task and publish a failure if the
    /// worker dies. The caller holds the in-flight guard until this returns.
    async fn supervise(self: Arc<Self>, assertion: IdentityAssertion) -> RunOutcome {
        let worker = self.clone();
        let run = tokio::spawn(async move { worker.complete(assertion).await }.in_current_span());

        match run.await {
            Ok(outcome) => outcome,
            Err(e) => self.fail(AuthError::Exchange(format!("sign-in task aborted: {}", e))),
        }
    }

    async fn complete(&self, assertion: IdentityAssertion) -> RunOutcome {
        match self.exchange_and_provision(assertion).await {
            Ok(principal) => {
                tracing::info!(user_id = %principal.user_id, "Signed in");
                self.store.publish_session(principal.clone());
                RunOutcome::SignedIn(principal)
            }
            Err(error) => self.fail(error),
        }
    }

    async fn exchange_and_provision(
        &self,
        assertion: IdentityAssertion,
    ) -> AuthResult<SessionPrincipal> {
        let credential = self
            .exchanger
            .credential_from_provider_token(&assertion.provider_id_token);
        tracing::debug!(credential = %credential.fingerprint(), "Exchanging credential");

        let principal = self.exchanger.establish_session(credential).await?;

        let record = record_from_assertion(&principal.user_id, &assertion);
        provision_profile(self.profiles.as_ref(), record)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(principal)
    }

    fn fail(&self, error: AuthError) -> RunOutcome {
        tracing::warn!(code = error.error_code(), error = %error, "Sign-in failed");

        self.store.publish_error(error.to_string());
        self.notifier
            .notify(Notification::sign_in_failed(self.provider.kind()));
        RunOutcome::Failed(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use taski_auth::{Credential, IdentityProviderKind};
    use taski_profile::MemoryProfileStore;

    struct FixedProvider {
        services: AuthResult<()>,
        result: Mutex<Option<AuthResult<DelegatedSignIn>>>,
    }

    impl FixedProvider {
        fn returning(result: AuthResult<DelegatedSignIn>) -> Self {
            Self {
                services: Ok(()),
                result: Mutex::new(Some(result)),
            }
        }
    }

    #[async_trait]
    impl IdentityProviderClient for FixedProvider {
        fn kind(&self) -> IdentityProviderKind {
            IdentityProviderKind::Google
        }

        async fn ensure_services_available(&self) -> AuthResult<()> {
            self.services.clone()
        }

        async fn sign_in(&self) -> AuthResult<DelegatedSignIn> {
            self.result
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Ok(DelegatedSignIn::Cancelled))
        }

        async fn sign_out(&self) -> AuthResult<()> {
            Ok(())
        }
    }

    struct EchoExchanger;

    #[async_trait]
    impl CredentialExchanger for EchoExchanger {
        fn provider(&self) -> IdentityProviderKind {
            IdentityProviderKind::Google
        }

        async fn establish_session(&self, credential: Credential) -> AuthResult<SessionPrincipal> {
            Ok(SessionPrincipal::new(
                format!("uid-{}", credential.id_token()),
                "ada@x.com",
                "Ada",
            ))
        }

        async fn current_session(&self) -> AuthResult<Option<SessionPrincipal>> {
            Ok(None)
        }

        async fn sign_out(&self) -> AuthResult<()> {
            Ok(())
        }
    }

    fn orchestrator(provider: FixedProvider) -> SessionOrchestrator {
        SessionOrchestrator::new(
            Arc::new(provider),
            Arc::new(EchoExchanger),
            Arc::new(MemoryProfileStore::new()),
            Arc::new(SessionStore::new()),
        )
    }

    #[tokio::test]
    async fn test_successful_run_publishes_session() {
        let assertion = IdentityAssertion::new("Ada", "ada@x.com", "tok1");
        let orchestrator =
            orchestrator(FixedProvider::returning(Ok(DelegatedSignIn::Assertion(assertion))));

        let outcome = orchestrator.sign_in_with_delegated_identity().await;
        assert!(outcome.is_signed_in());

        let state = orchestrator.store().state();
        assert_eq!(state.user_id(), Some("uid-tok1"));
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(!orchestrator.is_in_flight());
    }

    #[tokio::test]
    async fn test_cancel_error_is_treated_as_cancellation() {
        let orchestrator = orchestrator(FixedProvider::returning(Err(AuthError::Cancelled)));

        let outcome = orchestrator.sign_in_with_delegated_identity().await;
        assert_eq!(outcome, RunOutcome::Cancelled);
        assert!(orchestrator.store().state().error.is_none());
    }

    #[tokio::test]
    async fn test_preflight_failure_never_sets_loading() {
        let provider = FixedProvider {
            services: Err(AuthError::ServiceUnavailable("outdated".into())),
            result: Mutex::new(None),
        };
        let orchestrator = orchestrator(provider);

        let saw_loading = Arc::new(AtomicBool::new(false));
        let flag = saw_loading.clone();
        let _sub = orchestrator.store().subscribe(move |state, _| {
            if state.loading {
                flag.store(true, Ordering::SeqCst);
            }
        });

        let outcome = orchestrator.sign_in_with_delegated_identity().await;
        assert!(matches!(
            outcome,
            RunOutcome::Failed(AuthError::ServiceUnavailable(_))
        ));
        assert!(!saw_loading.load(Ordering::SeqCst));
        assert!(orchestrator.store().state().error.is_some());
    }

    #[tokio::test]
    async fn test_sign_out_resets_store() {
        let assertion = IdentityAssertion::new("Ada", "ada@x.com", "tok1");
        let orchestrator =
            orchestrator(FixedProvider::returning(Ok(DelegatedSignIn::Assertion(assertion))));

        orchestrator.sign_in_with_delegated_identity().await;
        assert!(orchestrator.store().state().is_authenticated());

        assert!(orchestrator.sign_out().await);
        assert_eq!(orchestrator.store().state(), Default::default());
    }
}
