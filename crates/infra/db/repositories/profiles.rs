use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::profiles::ProfileEntity, repositories::profiles::ProfileRepository,
        value_objects::profiles::PremiumEntitlement,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::profiles},
};

pub struct ProfilePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ProfilePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ProfileRepository for ProfilePostgres {
    async fn find_by_email(&self, email: &str) -> Result<Option<ProfileEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut matches = profiles::table
            .filter(profiles::email.eq(email))
            .select(ProfileEntity::as_select())
            .limit(2)
            .load::<ProfileEntity>(&mut conn)
            .context("failed to look up profile by email")?;

        if matches.len() > 1 {
            bail!("more than one profile matches the given email");
        }

        Ok(matches.pop())
    }

    async fn apply_premium_entitlement(
        &self,
        profile_id: Uuid,
        entitlement: PremiumEntitlement,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(profiles::table)
            .filter(profiles::id.eq(profile_id))
            .set(&entitlement.to_changeset())
            .execute(&mut conn)
            .context("failed to apply premium entitlement")?;

        if updated == 0 {
            bail!("profile {} disappeared before the entitlement update", profile_id);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::infra::db::postgres::postgres_connection::establish_connection;

    // Manual check against a scratch database that has a `profiles` row for
    // `PROFILE_TEST_EMAIL`:
    // cargo test -p amara-core profiles::tests::applies_entitlement_to_existing_profile -- --ignored
    #[tokio::test]
    #[ignore = "needs a reachable Postgres with a seeded profiles table"]
    async fn applies_entitlement_to_existing_profile() -> Result<()> {
        dotenvy::dotenv().ok();
        let url = std::env::var("DATABASE_URL").context("DATABASE_URL is required")?;
        let email = std::env::var("PROFILE_TEST_EMAIL").context("PROFILE_TEST_EMAIL is required")?;

        let repo = ProfilePostgres::new(Arc::new(establish_connection(&url, 1)?));
        let profile = repo
            .find_by_email(&email)
            .await?
            .context("seeded profile not found")?;

        repo.apply_premium_entitlement(profile.id, PremiumEntitlement::new("manual_ref", Utc::now()))
            .await?;

        let updated = repo.find_by_email(&email).await?.context("profile vanished")?;
        assert!(updated.is_premium);
        assert_eq!(updated.current_plan, "premium");
        assert!(updated.trial_end_date.is_none());
        Ok(())
    }
}
