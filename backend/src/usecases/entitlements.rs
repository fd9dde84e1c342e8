use std::sync::Arc;

use amara_core::domain::{
    repositories::profiles::ProfileRepository, value_objects::profiles::PremiumEntitlement,
};
use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EntitlementError {
    #[error("profile lookup failed: {0}")]
    Lookup(anyhow::Error),
    #[error("profile update failed: {0}")]
    Update(anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntitlementOutcome {
    Granted { profile_id: Uuid },
    ProfileNotFound,
}

/// Grants premium to the profile owning an email. Every field is set from
/// the event, so duplicate deliveries converge on the same row state.
pub struct EntitlementUpdater<P>
where
    P: ProfileRepository + Send + Sync + 'static,
{
    profile_repo: Arc<P>,
}

impl<P> EntitlementUpdater<P>
where
    P: ProfileRepository + Send + Sync + 'static,
{
    pub fn new(profile_repo: Arc<P>) -> Self {
        Self { profile_repo }
    }

    pub async fn grant_premium(
        &self,
        customer_email: &str,
        reference: &str,
    ) -> Result<EntitlementOutcome, EntitlementError> {
        let profile = self
            .profile_repo
            .find_by_email(customer_email)
            .await
            .map_err(|err| {
                error!(
                    %customer_email,
                    db_error = ?err,
                    "entitlements: failed to look up profile"
                );
                EntitlementError::Lookup(err)
            })?;

        let Some(profile) = profile else {
            warn!(
                %customer_email,
                %reference,
                "entitlements: no profile for customer email, skipping"
            );
            return Ok(EntitlementOutcome::ProfileNotFound);
        };

        let entitlement = PremiumEntitlement::new(reference, Utc::now());

        self.profile_repo
            .apply_premium_entitlement(profile.id, entitlement)
            .await
            .map_err(|err| {
                error!(
                    profile_id = %profile.id,
                    %reference,
                    db_error = ?err,
                    "entitlements: failed to update profile"
                );
                EntitlementError::Update(err)
            })?;

        info!(
            profile_id = %profile.id,
            previous_plan = %profile.current_plan,
            %reference,
            "entitlements: premium granted"
        );

        Ok(EntitlementOutcome::Granted {
            profile_id: profile.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amara_core::domain::{
        entities::profiles::ProfileEntity, repositories::profiles::MockProfileRepository,
    };
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use chrono::{DateTime, Duration};
    use mockall::predicate::eq;
    use std::{collections::HashMap, sync::Mutex};

    fn trial_profile(email: &str) -> ProfileEntity {
        ProfileEntity {
            id: Uuid::new_v4(),
            email: email.to_string(),
            current_plan: "monthly_trial".to_string(),
            is_premium: false,
            subscription_started_at: None,
            payment_reference: None,
            trial_end_date: Some(Utc::now() + Duration::days(7)),
        }
    }

    /// Applies changesets the way the Postgres repository does.
    #[derive(Default)]
    struct InMemoryProfiles {
        rows: Mutex<HashMap<Uuid, ProfileEntity>>,
        updates: Mutex<usize>,
    }

    impl InMemoryProfiles {
        fn with(profile: ProfileEntity) -> Self {
            let store = Self::default();
            store.rows.lock().unwrap().insert(profile.id, profile);
            store
        }

        fn get(&self, id: Uuid) -> ProfileEntity {
            self.rows.lock().unwrap()[&id].clone()
        }
    }

    #[async_trait]
    impl ProfileRepository for InMemoryProfiles {
        async fn find_by_email(&self, email: &str) -> Result<Option<ProfileEntity>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .find(|p| p.email == email)
                .cloned())
        }

        async fn apply_premium_entitlement(
            &self,
            profile_id: Uuid,
            entitlement: PremiumEntitlement,
        ) -> Result<()> {
            let changes = entitlement.to_changeset();
            let mut rows = self.rows.lock().unwrap();
            let row = rows.get_mut(&profile_id).ok_or_else(|| anyhow!("missing row"))?;
            row.current_plan = changes.current_plan;
            row.is_premium = changes.is_premium;
            row.subscription_started_at = changes.subscription_started_at;
            row.payment_reference = changes.payment_reference;
            row.trial_end_date = changes.trial_end_date;
            *self.updates.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn without_timestamp(profile: &ProfileEntity) -> (String, bool, Option<String>, Option<DateTime<Utc>>) {
        (
            profile.current_plan.clone(),
            profile.is_premium,
            profile.payment_reference.clone(),
            profile.trial_end_date,
        )
    }

    #[tokio::test]
    async fn grants_premium_and_clears_trial() {
        let profile = trial_profile("known@example.com");
        let id = profile.id;
        let store = Arc::new(InMemoryProfiles::with(profile));
        let updater = EntitlementUpdater::new(Arc::clone(&store));

        let outcome = updater
            .grant_premium("known@example.com", "ref_1")
            .await
            .unwrap();

        assert_eq!(outcome, EntitlementOutcome::Granted { profile_id: id });
        let row = store.get(id);
        assert_eq!(row.current_plan, "premium");
        assert!(row.is_premium);
        assert!(row.trial_end_date.is_none());
        assert!(row.subscription_started_at.is_some());
        assert_eq!(row.payment_reference.as_deref(), Some("ref_1"));
    }

    #[tokio::test]
    async fn applying_same_event_twice_matches_applying_once() {
        let profile = trial_profile("known@example.com");
        let id = profile.id;

        let once = Arc::new(InMemoryProfiles::with(profile.clone()));
        EntitlementUpdater::new(Arc::clone(&once))
            .grant_premium("known@example.com", "ref_1")
            .await
            .unwrap();

        let twice = Arc::new(InMemoryProfiles::with(profile));
        let updater = EntitlementUpdater::new(Arc::clone(&twice));
        updater.grant_premium("known@example.com", "ref_1").await.unwrap();
        updater.grant_premium("known@example.com", "ref_1").await.unwrap();

        assert_eq!(without_timestamp(&once.get(id)), without_timestamp(&twice.get(id)));
        assert_eq!(*twice.updates.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn already_premium_profile_converges_with_new_reference() {
        let mut profile = trial_profile("known@example.com");
        profile.current_plan = "premium".to_string();
        profile.is_premium = true;
        profile.trial_end_date = None;
        profile.payment_reference = Some("ref_old".to_string());
        let id = profile.id;

        let store = Arc::new(InMemoryProfiles::with(profile));
        EntitlementUpdater::new(Arc::clone(&store))
            .grant_premium("known@example.com", "ref_new")
            .await
            .unwrap();

        let row = store.get(id);
        assert_eq!(row.current_plan, "premium");
        assert!(row.is_premium);
        assert_eq!(row.payment_reference.as_deref(), Some("ref_new"));
    }

    #[tokio::test]
    async fn unknown_email_is_a_logged_noop() {
        let mut repo = MockProfileRepository::new();
        repo.expect_find_by_email()
            .with(eq("ghost@example.com"))
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_apply_premium_entitlement().never();

        let outcome = EntitlementUpdater::new(Arc::new(repo))
            .grant_premium("ghost@example.com", "ref_1")
            .await
            .unwrap();

        assert_eq!(outcome, EntitlementOutcome::ProfileNotFound);
    }

    #[tokio::test]
    async fn lookup_failure_is_distinct_from_not_found() {
        let mut repo = MockProfileRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Err(anyhow!("connection refused")));
        repo.expect_apply_premium_entitlement().never();

        let err = EntitlementUpdater::new(Arc::new(repo))
            .grant_premium("known@example.com", "ref_1")
            .await
            .unwrap_err();

        assert!(matches!(err, EntitlementError::Lookup(_)));
    }

    #[tokio::test]
    async fn update_failure_is_reported() {
        let profile = trial_profile("known@example.com");
        let mut repo = MockProfileRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(profile.clone())));
        repo.expect_apply_premium_entitlement()
            .times(1)
            .returning(|_, _| Err(anyhow!("update timed out")));

        let err = EntitlementUpdater::new(Arc::new(repo))
            .grant_premium("known@example.com", "ref_1")
            .await
            .unwrap_err();

        assert!(matches!(err, EntitlementError::Update(_)));
    }
}
