//! Profile reconciliation at launch.
//!
//! A sign-in can establish a session and then fail to write the profile. The
//! session store never publishes such a user, but the credential exchanger
//! still holds the session, so the next launch finds an authenticated user
//! with no profile. The reconciler closes that gap: it re-checks the profile
//! for the persisted session and provisions it if missing.
//!
//! ```rust,no_run
//! use taski_session::{ProfileReconciler, SessionConfig};
//! use taski_profile::MemoryProfileStore;
//! use std::sync::Arc;
//!
//! async fn on_launch(exchanger: Arc<dyn taski_auth::CredentialExchanger>) {
//!     let config = SessionConfig::from_env();
//!     let reconciler =
//!         ProfileReconciler::from_config(exchanger, Arc::new(MemoryProfileStore::new()), &config);
//!
//!     let outcome = reconciler.reconcile().await;
//!     println!("{:?}", outcome);
//! }
//! ```

use crate::config::SessionConfig;
use crate::provision::{provision_profile, record_from_principal};
use crate::retry::{with_retry_if, RetryConfig};
use std::sync::Arc;
use taski_auth::{AuthError, AuthResult, CredentialExchanger};
use taski_profile::{CreateOutcome, ProfileStore};
use tracing::instrument;

/// Result of a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// No persisted session, nothing to check
    SignedOut,
    /// The profile was already present
    AlreadyProvisioned,
    /// A missing profile was written
    Provisioned,
    /// Reconciliation is disabled by configuration
    Skipped,
}

/// Re-provisions profiles for sessions that outlived a failed sign-in.
///
/// Never mutates the session store and never overwrites an existing profile.
pub struct ProfileReconciler {
    exchanger: Arc<dyn CredentialExchanger>,
    profiles: Arc<dyn ProfileStore>,
    retry: RetryConfig,
    enabled: bool,
}

impl std::fmt::Debug for ProfileReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileReconciler")
            .field("retry", &self.retry)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl ProfileReconciler {
    /// Create a reconciler with explicit retry settings.
    pub fn new(
        exchanger: Arc<dyn CredentialExchanger>,
        profiles: Arc<dyn ProfileStore>,
        retry: RetryConfig,
    ) -> Self {
        Self {
            exchanger,
            profiles,
            retry,
            enabled: true,
        }
    }

    /// Create a reconciler from session configuration.
    pub fn from_config(
        exchanger: Arc<dyn CredentialExchanger>,
        profiles: Arc<dyn ProfileStore>,
        config: &SessionConfig,
    ) -> Self {
        Self {
            enabled: config.reconcile_on_launch,
            ..Self::new(exchanger, profiles, config.reconcile_retry.clone())
        }
    }

    /// Check the persisted session's profile and provision it if missing.
    ///
    /// Transient store failures are retried with backoff; anything else is
    /// returned as [`AuthError::Store`] or the exchanger's own error.
    #[instrument(skip(self))]
    pub async fn reconcile(&self) -> AuthResult<ReconcileOutcome> {
        if !self.enabled {
            return Ok(ReconcileOutcome::Skipped);
        }

        let Some(principal) = self.exchanger.current_session().await? else {
            return Ok(ReconcileOutcome::SignedOut);
        };

        let outcome = with_retry_if(
            &self.retry,
            || provision_profile(self.profiles.as_ref(), record_from_principal(&principal)),
            |e| e.is_transient(),
        )
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

        match outcome {
            CreateOutcome::Created => {
                tracing::info!(user_id = %principal.user_id, "Reconciled missing profile");
                Ok(ReconcileOutcome::Provisioned)
            }
            CreateOutcome::AlreadyExists => Ok(ReconcileOutcome::AlreadyProvisioned),
        }
    }
}
