use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Canonical plan identifiers stored in `profiles.current_plan`.
///
/// `Premium` is the label written when a payment is confirmed; it carries the
/// same limits as the concrete premium tiers.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlanId {
    #[default]
    Freemium,
    MonthlyTrial,
    YearlyTrial,
    MonthlyPremium,
    YearlyPremium,
    Premium,
}

impl PlanId {
    pub const ALL: [PlanId; 6] = [
        PlanId::Freemium,
        PlanId::MonthlyTrial,
        PlanId::YearlyTrial,
        PlanId::MonthlyPremium,
        PlanId::YearlyPremium,
        PlanId::Premium,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanId::Freemium => "freemium",
            PlanId::MonthlyTrial => "monthly_trial",
            PlanId::YearlyTrial => "yearly_trial",
            PlanId::MonthlyPremium => "monthly_premium",
            PlanId::YearlyPremium => "yearly_premium",
            PlanId::Premium => "premium",
        }
    }

    /// Returns `None` for identifiers outside the canonical set.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "freemium" => Some(PlanId::Freemium),
            "monthly_trial" => Some(PlanId::MonthlyTrial),
            "yearly_trial" => Some(PlanId::YearlyTrial),
            "monthly_premium" => Some(PlanId::MonthlyPremium),
            "yearly_premium" => Some(PlanId::YearlyPremium),
            "premium" => Some(PlanId::Premium),
            _ => None,
        }
    }
}

impl Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
