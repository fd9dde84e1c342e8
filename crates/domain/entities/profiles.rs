use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::profiles;

/// Entitlement columns of a user profile. The rest of the profile row is
/// owned by other services and never read here.
#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = profiles)]
pub struct ProfileEntity {
    pub id: Uuid,
    pub email: String,
    pub current_plan: String,
    pub is_premium: bool,
    pub subscription_started_at: Option<DateTime<Utc>>,
    pub payment_reference: Option<String>,
    pub trial_end_date: Option<DateTime<Utc>>,
}

/// Field-level update applied when a payment is confirmed.
#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = profiles, treat_none_as_null = true)]
pub struct PremiumEntitlementChangeset {
    pub current_plan: String,
    pub is_premium: bool,
    pub subscription_started_at: Option<DateTime<Utc>>,
    pub payment_reference: Option<String>,
    pub trial_end_date: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}
