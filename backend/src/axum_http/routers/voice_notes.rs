use std::sync::Arc;

use amara_core::domain::{
    repositories::{speech::SpeechSynthesizer, storage::VoiceNoteStorage},
    value_objects::voice_notes::GenerateVoiceNoteRequest,
};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderValue, StatusCode, header::ACCESS_CONTROL_ALLOW_ORIGIN},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::warn;

use crate::{
    axum_http::error_responses::error_response,
    usecases::voice_notes::{VoiceNoteError, VoiceNoteUseCase},
};

pub fn routes<S, V>(usecase: Arc<VoiceNoteUseCase<S, V>>) -> Router
where
    S: SpeechSynthesizer + Send + Sync + 'static,
    V: VoiceNoteStorage + Send + Sync + 'static,
{
    Router::new()
        .route("/generate-tts", post(generate_tts::<S, V>))
        .with_state(usecase)
}

pub async fn generate_tts<S, V>(
    State(usecase): State<Arc<VoiceNoteUseCase<S, V>>>,
    body: Bytes,
) -> Response
where
    S: SpeechSynthesizer + Send + Sync + 'static,
    V: VoiceNoteStorage + Send + Sync + 'static,
{
    let request = match serde_json::from_slice::<GenerateVoiceNoteRequest>(&body) {
        Ok(request) => request,
        Err(err) => {
            warn!(error = %err, "voice_notes: request body is not valid json");
            return map_error(VoiceNoteError::Validation);
        }
    };

    match usecase.generate(request).await {
        Ok(response) => (
            StatusCode::OK,
            [(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"))],
            Json(response),
        )
            .into_response(),
        Err(err) => map_error(err),
    }
}

fn map_error(err: VoiceNoteError) -> Response {
    error_response(err.status_code(), err.public_message())
}
