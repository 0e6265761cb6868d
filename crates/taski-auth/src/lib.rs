//! # Taski Authentication
//!
//! This crate provides the contracts Taski uses to sign a user in through a
//! delegated identity provider and exchange the result for a session.
//!
//! ## Overview
//!
//! The taski-auth crate handles:
//! - **Identity**: Provider assertions, session credentials and principals
//! - **Providers**: Traits for the identity provider client and the
//!   credential exchanger
//! - **Configuration**: Sign-in settings loaded from the environment
//! - **Errors**: The sign-in error taxonomy shared by all taski crates
//!
//! ## Usage
//!
//! ```rust,no_run
//! use taski_auth::{Credential, IdentityAssertion, IdentityProviderKind, SignInConfig};
//!
//! let config = SignInConfig::from_env();
//! config.validate().unwrap();
//!
//! let assertion = IdentityAssertion::new("Ada", "ada@x.com", "id-token");
//! let credential = Credential::new(IdentityProviderKind::Google, &assertion.provider_id_token);
//! println!("exchanging {}", credential.fingerprint());
//! ```
//!
//! ## Integration
//!
//! This crate is consumed by:
//! - `taski-session`: Sign-in orchestration and the session store

pub mod config;
pub mod error;
pub mod identity;
pub mod provider;

// Re-export main types
pub use config::SignInConfig;
pub use error::{AuthError, AuthResult};
pub use identity::{Credential, IdentityAssertion, IdentityProviderKind, SessionPrincipal};
pub use provider::{CredentialExchanger, DelegatedSignIn, IdentityProviderClient};
