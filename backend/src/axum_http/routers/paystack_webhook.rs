use std::sync::Arc;

use amara_core::{
    domain::repositories::profiles::ProfileRepository,
    payments::paystack_webhook::PAYSTACK_SIGNATURE_HEADER,
};
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header::ACCESS_CONTROL_ALLOW_ORIGIN},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::info;

use crate::{
    axum_http::error_responses::error_response,
    usecases::paystack_webhook::PaystackWebhookUseCase,
};

pub fn routes<P>(usecase: Arc<PaystackWebhookUseCase<P>>) -> Router
where
    P: ProfileRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/paystack-webhook", post(paystack_webhook::<P>))
        .with_state(usecase)
}

// Bytes extractor keeps the body untouched for signature verification.
pub async fn paystack_webhook<P>(
    State(usecase): State<Arc<PaystackWebhookUseCase<P>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    P: ProfileRepository + Send + Sync + 'static,
{
    let signature = headers
        .get(PAYSTACK_SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    match usecase.handle_webhook(&body, signature).await {
        Ok(outcome) => {
            info!(?outcome, "paystack_webhook: event acknowledged");
            (
                StatusCode::OK,
                [(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"))],
                "Webhook received",
            )
                .into_response()
        }
        Err(err) => error_response(err.status_code(), err.public_message()),
    }
}
