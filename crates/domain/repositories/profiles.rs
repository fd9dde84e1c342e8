use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::profiles::ProfileEntity, value_objects::profiles::PremiumEntitlement,
};

#[automock]
#[async_trait]
pub trait ProfileRepository {
    /// Exact, case-sensitive email match. More than one match is an error.
    async fn find_by_email(&self, email: &str) -> Result<Option<ProfileEntity>>;

    async fn apply_premium_entitlement(
        &self,
        profile_id: Uuid,
        entitlement: PremiumEntitlement,
    ) -> Result<()>;
}
