//! # Taski Session
//!
//! This crate coordinates delegated sign-in for the Taski app and owns the
//! process-wide session state the presentation layer observes.
//!
//! ## Overview
//!
//! The taski-session crate handles:
//! - **Orchestration**: Provider sign-in, credential exchange, profile
//!   provisioning and publication, one run at a time
//! - **Session Store**: Synchronous snapshots plus publish/subscribe
//! - **Reconciliation**: Provisioning profiles left missing by a failed run
//! - **Presentation**: The sign-in trigger contract and user alerts
//!
//! ## Flow
//!
//! ```text
//! SignInTrigger ─→ SessionOrchestrator ─→ IdentityProviderClient
//!       ↑                  │              CredentialExchanger
//!       │                  │              ProfileStore
//!       └── subscribe ── SessionStore ←──┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use taski_session::{SessionOrchestrator, SessionStore};
//! use taski_profile::MemoryProfileStore;
//! use std::sync::Arc;
//!
//! async fn run(
//!     provider: Arc<dyn taski_auth::IdentityProviderClient>,
//!     exchanger: Arc<dyn taski_auth::CredentialExchanger>,
//! ) {
//!     let store = SessionStore::global();
//!     let _sub = store.subscribe(|state, transition| {
//!         println!("{}: {:?}", transition, state);
//!     });
//!
//!     let orchestrator = SessionOrchestrator::new(
//!         provider,
//!         exchanger,
//!         Arc::new(MemoryProfileStore::new()),
//!         store,
//!     );
//!     orchestrator.sign_in_with_delegated_identity().await;
//! }
//! ```
//!
//! ## Integration
//!
//! - `taski-auth`: Collaborator traits and the error taxonomy
//! - `taski-profile`: The profile document store

pub mod config;
pub mod notify;
pub mod orchestrator;
pub mod provision;
pub mod reconcile;
pub mod retry;
pub mod state;
pub mod store;
pub mod trigger;

// Re-export main types
pub use config::{ConfigError, SessionConfig};
pub use notify::{Notification, Notifier, TracingNotifier};
pub use orchestrator::{RunOutcome, SessionOrchestrator};
pub use provision::provision_profile;
pub use reconcile::{ProfileReconciler, ReconcileOutcome};
pub use retry::{with_retry_if, RetryConfig};
pub use state::{SessionState, SessionTransition};
pub use store::{Listener, SessionStore, SubscriptionHandle};
pub use trigger::{Navigator, SignInTrigger};
