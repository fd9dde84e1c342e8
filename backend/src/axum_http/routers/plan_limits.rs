use std::sync::Arc;

use amara_core::domain::value_objects::plans::PlanLimits;
use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::usecases::plan_limits::PlanLimitResolver;

#[derive(Debug, Default, Deserialize)]
pub struct PlanLimitsQuery {
    pub plan: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanLimitsResponse {
    pub plan: String,
    #[serde(flatten)]
    pub limits: PlanLimits,
}

pub fn routes(resolver: Arc<PlanLimitResolver>) -> Router {
    Router::new()
        .route("/", get(plan_limits))
        .route("/anonymous", get(anonymous_limits))
        .with_state(resolver)
}

pub async fn plan_limits(
    State(resolver): State<Arc<PlanLimitResolver>>,
    Query(query): Query<PlanLimitsQuery>,
) -> impl IntoResponse {
    let (plan_id, limits) = resolver.resolve(query.plan.as_deref());
    Json(PlanLimitsResponse {
        plan: plan_id.to_string(),
        limits,
    })
}

pub async fn anonymous_limits(State(resolver): State<Arc<PlanLimitResolver>>) -> impl IntoResponse {
    Json(PlanLimitsResponse {
        plan: "anonymous".to_string(),
        limits: resolver.anonymous(),
    })
}
