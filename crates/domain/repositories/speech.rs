use async_trait::async_trait;
use bytes::Bytes;
use mockall::automock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("speech provider api key is not configured")]
    MissingApiKey,

    #[error("speech provider returned status {status}")]
    Provider { status: u16, body: String },

    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// Text-to-speech capability. One call is one provider attempt.
#[automock]
#[async_trait]
pub trait SpeechSynthesizer {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Bytes, SynthesisError>;
}
