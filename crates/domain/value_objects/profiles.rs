use chrono::{DateTime, Utc};

use crate::domain::entities::profiles::PremiumEntitlementChangeset;

use super::enums::plan_ids::PlanId;

/// Terminal entitlement granted by a verified payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PremiumEntitlement {
    pub plan: PlanId,
    pub payment_reference: String,
    pub subscription_started_at: DateTime<Utc>,
}

impl PremiumEntitlement {
    pub fn new(payment_reference: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            plan: PlanId::Premium,
            payment_reference: payment_reference.into(),
            subscription_started_at: started_at,
        }
    }

    /// Every field is set, never incremented, so re-applying converges.
    pub fn to_changeset(&self) -> PremiumEntitlementChangeset {
        PremiumEntitlementChangeset {
            current_plan: self.plan.to_string(),
            is_premium: true,
            subscription_started_at: Some(self.subscription_started_at),
            payment_reference: Some(self.payment_reference.clone()),
            trial_end_date: None,
            updated_at: self.subscription_started_at,
        }
    }
}
