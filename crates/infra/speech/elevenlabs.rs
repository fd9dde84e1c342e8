use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use tracing::error;

use crate::domain::repositories::speech::{SpeechSynthesizer, SynthesisError};

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";
pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";
pub const DEFAULT_MODEL_ID: &str = "eleven_multilingual_v2";

#[derive(Debug, Clone)]
pub struct ElevenLabsConfig {
    pub api_key: String,
    pub base_url: String,
    pub model_id: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Serialize)]
struct TextToSpeechBody<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
        }
    }
}

/// Minimal ElevenLabs text-to-speech client built on reqwest.
pub struct ElevenLabsClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model_id: String,
}

impl ElevenLabsClient {
    pub fn new(config: ElevenLabsConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("failed to build ElevenLabs http client")?;

        Ok(Self {
            http,
            api_key: config.api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model_id: config.model_id,
        })
    }

    fn endpoint(&self, voice_id: &str) -> String {
        format!("{}/v1/text-to-speech/{}", self.base_url, voice_id)
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Bytes, SynthesisError> {
        if self.api_key.trim().is_empty() {
            return Err(SynthesisError::MissingApiKey);
        }

        // https://elevenlabs.io/docs/api-reference/text-to-speech/convert
        let resp = self
            .http
            .post(self.endpoint(voice_id))
            .header("xi-api-key", &self.api_key)
            .header(ACCEPT, "audio/mpeg")
            .header(CONTENT_TYPE, "application/json")
            .json(&TextToSpeechBody {
                text,
                model_id: &self.model_id,
                voice_settings: VoiceSettings::default(),
            })
            .send()
            .await
            .context("elevenlabs request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = match resp.text().await {
                Ok(text) if !text.is_empty() => text,
                Ok(_) => "<empty response body>".to_string(),
                Err(err) => format!("<failed to read response body: {err}>"),
            };

            error!(
                status = %status,
                %voice_id,
                response_body = %body,
                "elevenlabs: text-to-speech request failed"
            );

            return Err(SynthesisError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let audio = resp
            .bytes()
            .await
            .context("failed to read elevenlabs audio body")?;

        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_key: &str) -> ElevenLabsClient {
        ElevenLabsClient::new(ElevenLabsConfig {
            api_key: api_key.to_string(),
            base_url: format!("{}/", DEFAULT_BASE_URL),
            model_id: DEFAULT_MODEL_ID.to_string(),
            request_timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn endpoint_includes_voice_id() {
        assert_eq!(
            client("key").endpoint("voice123"),
            "https://api.elevenlabs.io/v1/text-to-speech/voice123"
        );
    }

    #[tokio::test]
    async fn blank_api_key_fails_before_any_request() {
        let result = client("  ").synthesize("hello", DEFAULT_VOICE_ID).await;
        assert!(matches!(result, Err(SynthesisError::MissingApiKey)));
    }

    #[test]
    fn request_body_uses_provider_field_names() {
        let body = serde_json::to_value(TextToSpeechBody {
            text: "hi",
            model_id: DEFAULT_MODEL_ID,
            voice_settings: VoiceSettings::default(),
        })
        .unwrap();

        assert_eq!(body["text"], "hi");
        assert_eq!(body["model_id"], DEFAULT_MODEL_ID);
        assert_eq!(body["voice_settings"]["stability"], 0.5);
        assert_eq!(body["voice_settings"]["similarity_boost"], 0.75);
    }
}
