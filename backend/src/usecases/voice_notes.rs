use std::sync::Arc;

use amara_core::domain::{
    repositories::{
        speech::{SpeechSynthesizer, SynthesisError},
        storage::VoiceNoteStorage,
    },
    value_objects::voice_notes::{
        GenerateVoiceNoteRequest, GenerateVoiceNoteResponse, VOICE_NOTE_CONTENT_TYPE,
        VoiceNoteArtifact,
    },
};
use axum::http::StatusCode;
use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum VoiceNoteError {
    #[error("text and message id are required")]
    Validation,
    #[error("speech provider api key is not configured")]
    MissingApiKey,
    #[error("speech synthesis failed: {0}")]
    Provider(SynthesisError),
    #[error("voice note upload failed: {0}")]
    Storage(anyhow::Error),
}

impl VoiceNoteError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            VoiceNoteError::Validation => StatusCode::BAD_REQUEST,
            VoiceNoteError::MissingApiKey
            | VoiceNoteError::Provider(_)
            | VoiceNoteError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Provider and storage details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            VoiceNoteError::Validation => "Text and message ID are required",
            VoiceNoteError::MissingApiKey => "ElevenLabs API key not configured",
            VoiceNoteError::Provider(_) => "Failed to generate audio",
            VoiceNoteError::Storage(_) => "Failed to upload audio file",
        }
    }
}

impl From<SynthesisError> for VoiceNoteError {
    fn from(err: SynthesisError) -> Self {
        match err {
            SynthesisError::MissingApiKey => VoiceNoteError::MissingApiKey,
            other => VoiceNoteError::Provider(other),
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, VoiceNoteError>;

#[derive(Debug, Clone)]
pub struct VoiceNoteSettings {
    pub default_voice_id: String,
    pub storage_prefix: String,
}

/// validate -> synthesize -> store. Each stage runs only after the previous
/// one succeeded, so a failure never leaves an object behind.
pub struct VoiceNoteUseCase<S, V>
where
    S: SpeechSynthesizer + Send + Sync + 'static,
    V: VoiceNoteStorage + Send + Sync + 'static,
{
    synthesizer: Arc<S>,
    storage: Arc<V>,
    settings: VoiceNoteSettings,
}

impl<S, V> VoiceNoteUseCase<S, V>
where
    S: SpeechSynthesizer + Send + Sync + 'static,
    V: VoiceNoteStorage + Send + Sync + 'static,
{
    pub fn new(synthesizer: Arc<S>, storage: Arc<V>, settings: VoiceNoteSettings) -> Self {
        Self {
            synthesizer,
            storage,
            settings,
        }
    }

    pub async fn generate(
        &self,
        request: GenerateVoiceNoteRequest,
    ) -> UseCaseResult<GenerateVoiceNoteResponse> {
        let (text, message_id) = match (non_empty(request.text), non_empty(request.message_id)) {
            (Some(text), Some(message_id)) => (text, message_id),
            _ => {
                warn!("voice_notes: rejected request without text or message id");
                return Err(VoiceNoteError::Validation);
            }
        };

        let voice_id =
            non_empty(request.voice_id).unwrap_or_else(|| self.settings.default_voice_id.clone());

        info!(
            %message_id,
            %voice_id,
            text_len = text.len(),
            "voice_notes: synthesizing voice note"
        );

        let audio = self
            .synthesizer
            .synthesize(&text, &voice_id)
            .await
            .map_err(|err| {
                error!(%message_id, error = %err, "voice_notes: synthesis failed");
                VoiceNoteError::from(err)
            })?;

        let artifact = VoiceNoteArtifact::new(
            &self.settings.storage_prefix,
            &message_id,
            &voice_id,
            Utc::now(),
        );

        self.storage
            .upload_voice_note(&artifact.storage_key, audio, VOICE_NOTE_CONTENT_TYPE)
            .await
            .map_err(|err| {
                error!(
                    %message_id,
                    storage_key = %artifact.storage_key,
                    error = ?err,
                    "voice_notes: upload failed"
                );
                VoiceNoteError::Storage(err)
            })?;

        let public_url = self.storage.public_url(&artifact.storage_key);
        info!(
            %message_id,
            storage_key = %artifact.storage_key,
            "voice_notes: voice note stored"
        );

        Ok(artifact.into_response(public_url))
    }
}

/// Absent and `""` are the same; whitespace is content.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
