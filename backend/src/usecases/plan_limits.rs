use amara_core::domain::value_objects::{
    enums::plan_ids::PlanId,
    plans::{PlanLimits, PlanLimitsTable},
};
use tracing::debug;

/// Resolves a plan identifier to its quota. Unknown or missing identifiers
/// fall back to freemium; this never fails.
#[derive(Debug, Clone)]
pub struct PlanLimitResolver {
    table: PlanLimitsTable,
}

impl PlanLimitResolver {
    pub fn new(table: PlanLimitsTable) -> Self {
        Self { table }
    }

    pub fn resolve(&self, plan: Option<&str>) -> (PlanId, PlanLimits) {
        let plan_id = match plan.and_then(PlanId::parse) {
            Some(plan_id) => plan_id,
            None => {
                debug!(plan = ?plan, "plan_limits: falling back to freemium");
                PlanId::Freemium
            }
        };

        let limits = self
            .table
            .get(plan_id)
            .unwrap_or_else(|| self.table.freemium());

        (plan_id, limits)
    }

    pub fn limits_for(&self, plan: Option<&str>) -> PlanLimits {
        self.resolve(plan).1
    }

    pub fn anonymous(&self) -> PlanLimits {
        self.table.anonymous()
    }
}
