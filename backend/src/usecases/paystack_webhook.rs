use std::sync::Arc;

use amara_core::{
    domain::{
        repositories::profiles::ProfileRepository,
        value_objects::paystack::{CHARGE_SUCCESS_EVENT, CHARGE_SUCCESS_STATUS, PaystackEvent},
    },
    payments::paystack_webhook::{PaystackWebhookVerifier, SignatureError},
};
use axum::http::StatusCode;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::entitlements::{EntitlementError, EntitlementOutcome, EntitlementUpdater};

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("webhook secret is not configured")]
    MissingSecret,
    #[error("signature header is missing")]
    MissingSignature,
    #[error("signature does not match payload")]
    InvalidSignature,
    #[error("invalid webhook payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    #[error(transparent)]
    Entitlement(#[from] EntitlementError),
}

impl From<SignatureError> for WebhookError {
    fn from(err: SignatureError) -> Self {
        match err {
            SignatureError::MissingSecret => WebhookError::MissingSecret,
            SignatureError::MissingSignature => WebhookError::MissingSignature,
            SignatureError::InvalidSignature => WebhookError::InvalidSignature,
        }
    }
}

impl WebhookError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature | WebhookError::InvalidSignature => {
                StatusCode::UNAUTHORIZED
            }
            WebhookError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            WebhookError::MissingSecret | WebhookError::Entitlement(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            WebhookError::MissingSecret => "Server configuration error",
            WebhookError::MissingSignature => "Unauthorized: No signature",
            WebhookError::InvalidSignature => "Unauthorized: Invalid signature",
            WebhookError::InvalidPayload(_) => "Invalid webhook payload",
            WebhookError::Entitlement(EntitlementError::Lookup(_)) => "Database error",
            WebhookError::Entitlement(EntitlementError::Update(_)) => "Database update failed",
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, WebhookError>;

/// What happened to an authenticated event. Every variant is acknowledged
/// with 200 so Paystack stops redelivering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    EntitlementGranted,
    ProfileNotFound,
    ChargeNotSuccessful { status: String },
    Ignored { event_type: String },
}

pub struct PaystackWebhookUseCase<P>
where
    P: ProfileRepository + Send + Sync + 'static,
{
    verifier: PaystackWebhookVerifier,
    entitlements: Arc<EntitlementUpdater<P>>,
}

impl<P> PaystackWebhookUseCase<P>
where
    P: ProfileRepository + Send + Sync + 'static,
{
    pub fn new(verifier: PaystackWebhookVerifier, entitlements: Arc<EntitlementUpdater<P>>) -> Self {
        Self {
            verifier,
            entitlements,
        }
    }

    /// `payload` must be the raw request body; the signature covers those
    /// exact bytes.
    pub async fn handle_webhook(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> UseCaseResult<WebhookOutcome> {
        self.verifier.verify(payload, signature).map_err(|err| {
            match err {
                SignatureError::MissingSecret => {
                    error!("paystack_webhook: webhook secret is not configured")
                }
                _ => warn!(
                    error = %err,
                    payload_len = payload.len(),
                    "paystack_webhook: signature verification failed"
                ),
            }
            WebhookError::from(err)
        })?;

        let event: PaystackEvent = serde_json::from_slice(payload).map_err(|err| {
            warn!(error = %err, "paystack_webhook: verified payload is not a valid event");
            WebhookError::InvalidPayload(err)
        })?;

        info!(event_type = %event.event, "paystack_webhook: event verified");

        if event.event != CHARGE_SUCCESS_EVENT {
            debug!(event_type = %event.event, "paystack_webhook: unhandled event type");
            return Ok(WebhookOutcome::Ignored {
                event_type: event.event,
            });
        }

        let charge = event.charge_data().map_err(|err| {
            warn!(error = %err, "paystack_webhook: charge.success data is malformed");
            WebhookError::InvalidPayload(err)
        })?;

        info!(
            customer_email = %charge.customer.email,
            reference = %charge.reference,
            amount = ?charge.amount,
            status = %charge.status,
            "paystack_webhook: processing charge"
        );

        if charge.status != CHARGE_SUCCESS_STATUS {
            info!(
                reference = %charge.reference,
                status = %charge.status,
                "paystack_webhook: charge not successful, ignoring"
            );
            return Ok(WebhookOutcome::ChargeNotSuccessful {
                status: charge.status,
            });
        }

        let outcome = self
            .entitlements
            .grant_premium(&charge.customer.email, &charge.reference)
            .await?;

        Ok(match outcome {
            EntitlementOutcome::Granted { .. } => WebhookOutcome::EntitlementGranted,
            EntitlementOutcome::ProfileNotFound => WebhookOutcome::ProfileNotFound,
        })
    }
}
