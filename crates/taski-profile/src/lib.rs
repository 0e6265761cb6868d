//! # Taski Profiles
//!
//! This crate provides durable user profile provisioning for Taski.
//!
//! ## Overview
//!
//! The taski-profile crate handles:
//! - **Records**: The `users/{user_id}` profile document and its edits
//! - **Store**: The create-if-absent gateway the sign-in flow provisions through
//!
//! ## Provisioning contract
//!
//! ```text
//! sign-in ─→ get(user_id)
//!              ├─ none ─→ create_if_absent(user_id, record)   (createdAt set once)
//!              └─ some ─→ no write                            (user edits preserved)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use taski_profile::{CreateOutcome, MemoryProfileStore, ProfileRecord, ProfileStore};
//!
//! async fn provision() {
//!     let store = MemoryProfileStore::new();
//!     let record = ProfileRecord::new("uid-1", "Ada", "ada@x.com");
//!
//!     if store.get("uid-1").await.unwrap().is_none() {
//!         let outcome = store.create_if_absent("uid-1", record).await.unwrap();
//!         assert_eq!(outcome, CreateOutcome::Created);
//!     }
//! }
//! ```

pub mod record;
pub mod store;

// Re-export main types for convenience
pub use record::{ProfileRecord, ProfileUpdate, USERS_COLLECTION};
pub use store::{
    CreateOutcome, MemoryProfileStore, ProfileError, ProfileResult, ProfileStore,
    ProfileStoreStats,
};
