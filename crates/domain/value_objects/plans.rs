use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::enums::plan_ids::PlanId;

/// Usage quota attached to a plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlanLimits {
    pub max_messages: u32,
    pub max_voice_notes: u32,
}

impl PlanLimits {
    pub const fn new(max_messages: u32, max_voice_notes: u32) -> Self {
        Self {
            max_messages,
            max_voice_notes,
        }
    }
}

pub const ANONYMOUS_LIMITS: PlanLimits = PlanLimits::new(5, 0);
pub const FREEMIUM_LIMITS: PlanLimits = PlanLimits::new(20, 3);
pub const TRIAL_LIMITS: PlanLimits = PlanLimits::new(100, 20);
pub const PREMIUM_LIMITS: PlanLimits = PlanLimits::new(1000, 200);

/// Process-wide plan -> limits mapping plus the anonymous tier.
///
/// Built once from config and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanLimitsTable {
    anonymous: PlanLimits,
    plans: HashMap<PlanId, PlanLimits>,
}

/// Partial override accepted from the `PLAN_LIMITS` config value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanLimitsOverride {
    #[serde(default)]
    pub anonymous: Option<PlanLimits>,
    #[serde(default)]
    pub plans: HashMap<PlanId, PlanLimits>,
}

impl Default for PlanLimitsTable {
    fn default() -> Self {
        let plans = PlanId::ALL
            .into_iter()
            .map(|plan| {
                let limits = match plan {
                    PlanId::Freemium => FREEMIUM_LIMITS,
                    PlanId::MonthlyTrial | PlanId::YearlyTrial => TRIAL_LIMITS,
                    PlanId::MonthlyPremium | PlanId::YearlyPremium | PlanId::Premium => {
                        PREMIUM_LIMITS
                    }
                };
                (plan, limits)
            })
            .collect();

        Self {
            anonymous: ANONYMOUS_LIMITS,
            plans,
        }
    }
}

impl PlanLimitsTable {
    pub fn with_override(mut self, overrides: PlanLimitsOverride) -> Self {
        if let Some(anonymous) = overrides.anonymous {
            self.anonymous = anonymous;
        }
        self.plans.extend(overrides.plans);
        self
    }

    pub fn anonymous(&self) -> PlanLimits {
        self.anonymous
    }

    pub fn get(&self, plan: PlanId) -> Option<PlanLimits> {
        self.plans.get(&plan).copied()
    }

    pub fn freemium(&self) -> PlanLimits {
        self.get(PlanId::Freemium).unwrap_or(FREEMIUM_LIMITS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_covers_every_plan() {
        let table = PlanLimitsTable::default();
        for plan in PlanId::ALL {
            assert!(table.get(plan).is_some(), "missing limits for {plan}");
        }
        assert_eq!(table.anonymous(), ANONYMOUS_LIMITS);
    }

    #[test]
    fn premium_label_matches_concrete_premium_tiers() {
        let table = PlanLimitsTable::default();
        assert_eq!(table.get(PlanId::Premium), table.get(PlanId::MonthlyPremium));
        assert_eq!(table.get(PlanId::Premium), table.get(PlanId::YearlyPremium));
    }

    #[test]
    fn override_replaces_only_named_entries() {
        let overrides: PlanLimitsOverride = serde_json::from_str(
            r#"{"anonymous":{"maxMessages":2,"maxVoiceNotes":0},"plans":{"freemium":{"maxMessages":7,"maxVoiceNotes":1}}}"#,
        )
        .unwrap();

        let table = PlanLimitsTable::default().with_override(overrides);

        assert_eq!(table.anonymous(), PlanLimits::new(2, 0));
        assert_eq!(table.freemium(), PlanLimits::new(7, 1));
        assert_eq!(table.get(PlanId::MonthlyTrial), Some(TRIAL_LIMITS));
    }
}
