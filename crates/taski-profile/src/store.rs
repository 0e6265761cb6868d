//! Profile store gateway
//!
//! This module provides the profile store abstraction and an in-memory
//! document implementation. The store only performs single-document reads
//! and writes; replication and querying belong to the backing database.

use crate::record::{ProfileRecord, ProfileUpdate, USERS_COLLECTION};
use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Profile store error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    /// No profile exists for the user
    #[error("Profile not found: {0}")]
    NotFound(String),

    /// Backing store could not be reached
    #[error("Profile store unavailable: {0}")]
    Unavailable(String),

    /// Document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Write rejected by the backing store
    #[error("Write conflict: {0}")]
    Conflict(String),

    /// Record does not belong at the requested document path
    #[error("Invalid profile key: {0}")]
    InvalidKey(String),
}

/// Result type for profile store operations.
pub type ProfileResult<T> = Result<T, ProfileError>;

impl ProfileError {
    /// Whether retrying the same operation might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ProfileError::Unavailable(_) | ProfileError::Conflict(_))
    }
}

/// Result of a create-if-absent write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The record was written
    Created,
    /// A record already existed and was left untouched
    AlreadyExists,
}

/// Profile store statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileStoreStats {
    /// Existence checks performed
    pub reads: u64,
    /// Records written by create-if-absent
    pub creates: u64,
    /// Create-if-absent calls that found an existing record
    pub skipped_creates: u64,
    /// Profile edits applied
    pub updates: u64,
}

/// Profile store trait for single-document operations keyed by user ID.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Read the profile for a user, if one exists.
    async fn get(&self, user_id: &str) -> ProfileResult<Option<ProfileRecord>>;

    /// Write the profile only if none exists for the user.
    ///
    /// Concurrent callers never produce two records for the same key and an
    /// existing record is never overwritten.
    async fn create_if_absent(
        &self,
        user_id: &str,
        record: ProfileRecord,
    ) -> ProfileResult<CreateOutcome>;

    /// Apply a user-initiated edit to an existing profile.
    async fn update(&self, user_id: &str, update: ProfileUpdate) -> ProfileResult<ProfileRecord>;

    /// Get store stats.
    async fn stats(&self) -> ProfileStoreStats;
}

/// In-memory profile store.
///
/// Holds profiles as JSON documents, the same shape the production document
/// database stores. Suitable for tests and local development.
pub struct MemoryProfileStore {
    /// Collection name
    collection: String,
    /// Documents keyed by user ID
    documents: Arc<RwLock<HashMap<String, serde_json::Value>>>,
    /// Statistics
    stats: Arc<RwLock<ProfileStoreStats>>,
}

impl std::fmt::Debug for MemoryProfileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryProfileStore")
            .field("collection", &self.collection)
            .finish()
    }
}

impl MemoryProfileStore {
    /// Create a new in-memory store for the `users` collection.
    pub fn new() -> Self {
        Self::with_collection(USERS_COLLECTION)
    }

    /// Create a store for a custom collection name.
    pub fn with_collection(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            documents: Arc::new(RwLock::new(HashMap::new())),
            stats: Arc::new(RwLock::new(ProfileStoreStats::default())),
        }
    }

    /// Collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Number of stored profiles.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Check if the store holds no profiles.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    fn document_path(&self, user_id: &str) -> String {
        format!("{}/{}", self.collection, user_id)
    }
}

impl Default for MemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get(&self, user_id: &str) -> ProfileResult<Option<ProfileRecord>> {
        {
            let mut stats = self.stats.write().await;
            stats.reads += 1;
        }

        let documents = self.documents.read().await;
        documents
            .get(user_id)
            .cloned()
            .map(|doc| ProfileRecord::from_document(user_id, doc))
            .transpose()
    }

    async fn create_if_absent(
        &self,
        user_id: &str,
        record: ProfileRecord,
    ) -> ProfileResult<CreateOutcome> {
        if record.user_id != user_id {
            return Err(ProfileError::InvalidKey(format!(
                "record keyed {} written to {}",
                record.user_id,
                self.document_path(user_id)
            )));
        }
        let document = record.to_document()?;

        let outcome = {
            let mut documents = self.documents.write().await;
            match documents.entry(user_id.to_string()) {
                Entry::Occupied(_) => CreateOutcome::AlreadyExists,
                Entry::Vacant(slot) => {
                    slot.insert(document);
                    CreateOutcome::Created
                }
            }
        };

        {
            let mut stats = self.stats.write().await;
            match outcome {
                CreateOutcome::Created => stats.creates += 1,
                CreateOutcome::AlreadyExists => stats.skipped_creates += 1,
            }
        }

        tracing::debug!(
            path = %self.document_path(user_id),
            outcome = ?outcome,
            "Profile create-if-absent"
        );

        Ok(outcome)
    }

    async fn update(&self, user_id: &str, update: ProfileUpdate) -> ProfileResult<ProfileRecord> {
        let record = {
            let mut documents = self.documents.write().await;
            let document = documents
                .get_mut(user_id)
                .ok_or_else(|| ProfileError::NotFound(self.document_path(user_id)))?;

            let mut record = ProfileRecord::from_document(user_id, document.clone())?;
            record.apply(&update);
            *document = record.to_document()?;
            record
        };

        {
            let mut stats = self.stats.write().await;
            stats.updates += 1;
        }

        Ok(record)
    }

    async fn stats(&self) -> ProfileStoreStats {
        self.stats.read().await.clone()
    }
}
