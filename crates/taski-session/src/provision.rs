//! Idempotent profile provisioning.

use taski_auth::{IdentityAssertion, SessionPrincipal};
use taski_profile::{CreateOutcome, ProfileRecord, ProfileResult, ProfileStore};

/// Ensure a profile exists for the record's user without overwriting one.
///
/// Returns [`CreateOutcome::AlreadyExists`] without writing when the
/// existence check finds a record, or when a concurrent writer wins the race.
pub async fn provision_profile(
    profiles: &dyn ProfileStore,
    record: ProfileRecord,
) -> ProfileResult<CreateOutcome> {
    if profiles.get(&record.user_id).await?.is_some() {
        tracing::debug!(user_id = %record.user_id, "Profile already provisioned");
        return Ok(CreateOutcome::AlreadyExists);
    }

    let user_id = record.user_id.clone();
    let outcome = profiles.create_if_absent(&user_id, record).await?;

    if outcome == CreateOutcome::Created {
        tracing::info!(user_id = %user_id, "Provisioned user profile");
    }
    Ok(outcome)
}

/// Profile for a first sign-in, taken from the provider's assertion.
pub fn record_from_assertion(user_id: &str, assertion: &IdentityAssertion) -> ProfileRecord {
    ProfileRecord::new(user_id, &assertion.subject_display_name, &assertion.email)
        .with_photo_url(assertion.photo_ref.clone())
}

/// Profile rebuilt from an established session.
pub fn record_from_principal(principal: &SessionPrincipal) -> ProfileRecord {
    ProfileRecord::new(&principal.user_id, &principal.display_name, &principal.email)
        .with_photo_url(principal.photo_url.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use taski_profile::MemoryProfileStore;

    #[tokio::test]
    async fn test_provision_creates_once() {
        let store = MemoryProfileStore::new();
        let assertion = IdentityAssertion::new("Ada", "ada@x.com", "tok1").with_photo("p.png");

        let first = provision_profile(&store, record_from_assertion("uid-1", &assertion))
            .await
            .unwrap();
        let second = provision_profile(&store, record_from_assertion("uid-1", &assertion))
            .await
            .unwrap();

        assert_eq!(first, CreateOutcome::Created);
        assert_eq!(second, CreateOutcome::AlreadyExists);

        let stats = store.stats().await;
        assert_eq!(stats.creates, 1);
        assert_eq!(stats.skipped_creates, 0);
        assert_eq!(stats.reads, 2);

        let record = store.get("uid-1").await.unwrap().unwrap();
        assert_eq!(record.full_name, "Ada");
        assert_eq!(record.photo_url.as_deref(), Some("p.png"));
    }

    #[test]
    fn test_record_from_principal() {
        let principal = SessionPrincipal::new("uid-1", "ada@x.com", "Ada").with_photo_url("p.png");
        let record = record_from_principal(&principal);
        assert_eq!(record.user_id, "uid-1");
        assert_eq!(record.full_name, "Ada");
        assert_eq!(record.display_name, "Ada");
        assert_eq!(record.photo_url.as_deref(), Some("p.png"));
    }
}
