//! Profile domain models
//!
//! This module provides the durable user profile that is provisioned the
//! first time an identity signs in. Profiles are stored as JSON documents in
//! the `users` collection, keyed by the provider-issued user ID.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{ProfileError, ProfileResult};

/// Name of the document collection holding profiles.
pub const USERS_COLLECTION: &str = "users";

/// A user's durable profile.
///
/// At most one record exists per `user_id`. `created_at` is fixed when the
/// record is first provisioned and is never rewritten.
///
/// # Examples
///
/// ```
/// use taski_profile::ProfileRecord;
///
/// let record = ProfileRecord::new("uid-1", "Ada Lovelace", "ada@x.com");
/// assert_eq!(record.display_name, "Ada Lovelace");
/// assert!(record.photo_url.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    /// Primary key; carried by the document path rather than its body
    #[serde(skip)]
    pub user_id: String,

    /// Full name as given by the identity provider
    pub full_name: String,

    /// Name shown in the app (user editable)
    pub display_name: String,

    /// Email address
    pub email: String,

    /// Profile picture URL (user editable)
    #[serde(rename = "photoURL", default)]
    pub photo_url: Option<String>,

    /// When the profile was first provisioned
    pub created_at: DateTime<Utc>,
}

impl ProfileRecord {
    /// Creates a new profile record stamped with the current time.
    ///
    /// Both `full_name` and `display_name` start out as the provider's name.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The stable user identifier
    /// * `name` - The name reported by the identity provider
    /// * `email` - The user's email address
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            user_id: user_id.into(),
            full_name: name.clone(),
            display_name: name,
            email: email.into(),
            photo_url: None,
            created_at: Utc::now(),
        }
    }

    /// Set the profile picture URL.
    pub fn with_photo_url(mut self, photo_url: Option<String>) -> Self {
        self.photo_url = photo_url;
        self
    }

    /// Set the provisioning timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Serialize to the stored document body.
    pub fn to_document(&self) -> ProfileResult<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| ProfileError::Serialization(e.to_string()))
    }

    /// Rebuild a record from a stored document body.
    pub fn from_document(user_id: &str, document: serde_json::Value) -> ProfileResult<Self> {
        let mut record: Self = serde_json::from_value(document)
            .map_err(|e| ProfileError::Serialization(e.to_string()))?;
        record.user_id = user_id.to_string();
        Ok(record)
    }

    /// Apply a user-initiated edit.
    ///
    /// Identity fields and `created_at` are left untouched.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(name) = &update.display_name {
            self.display_name = name.clone();
        }
        if let Some(photo) = &update.photo_url {
            self.photo_url = photo.clone();
        }
    }
}

/// User-initiated profile edit.
///
/// `photo_url: Some(None)` clears the picture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// New display name
    pub display_name: Option<String>,

    /// New profile picture URL
    pub photo_url: Option<Option<String>>,
}

impl ProfileUpdate {
    /// Change the display name.
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Change or clear the profile picture.
    pub fn photo_url(mut self, photo_url: Option<String>) -> Self {
        self.photo_url = Some(photo_url);
        self
    }

    /// Check if the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.photo_url.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_document_layout() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let record = ProfileRecord::new("uid-1", "Ada", "ada@x.com")
            .with_photo_url(Some("https://p/ada.png".to_string()))
            .with_created_at(created);

        let doc = record.to_document().unwrap();
        assert_eq!(doc["fullName"], "Ada");
        assert_eq!(doc["displayName"], "Ada");
        assert_eq!(doc["email"], "ada@x.com");
        assert_eq!(doc["photoURL"], "https://p/ada.png");
        assert!(doc.get("userId").is_none());
        assert!(doc.get("user_id").is_none());

        let restored = ProfileRecord::from_document("uid-1", doc).unwrap();
        assert_eq!(restored, record);
    }

    #[test]
    fn test_from_document_rejects_malformed() {
        let doc = serde_json::json!({ "fullName": "Ada" });
        let result = ProfileRecord::from_document("uid-1", doc);
        assert!(matches!(result, Err(ProfileError::Serialization(_))));
    }

    #[test]
    fn test_apply_update_preserves_identity() {
        let mut record = ProfileRecord::new("uid-1", "Ada", "ada@x.com");
        let created = record.created_at;

        record.apply(&ProfileUpdate::default().display_name("Countess"));
        assert_eq!(record.display_name, "Countess");
        assert_eq!(record.full_name, "Ada");
        assert_eq!(record.created_at, created);

        record.apply(&ProfileUpdate::default().photo_url(Some("p.png".to_string())));
        assert_eq!(record.photo_url.as_deref(), Some("p.png"));

        record.apply(&ProfileUpdate::default().photo_url(None));
        assert!(record.photo_url.is_none());
    }

    #[test]
    fn test_empty_update() {
        assert!(ProfileUpdate::default().is_empty());
        assert!(!ProfileUpdate::default().display_name("x").is_empty());
    }
}
