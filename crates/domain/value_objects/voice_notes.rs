use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const VOICE_NOTE_CONTENT_TYPE: &str = "audio/mpeg";
pub const VOICE_NOTE_FILE_PREFIX: &str = "amara";

/// Body of `POST /generate-tts`. Fields stay optional so that missing values
/// surface as a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVoiceNoteRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub voice_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVoiceNoteResponse {
    pub voice_note_url: String,
    pub file_name: String,
    pub file_path: String,
}

/// One synthesized utterance and where it lives in object storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceNoteArtifact {
    pub message_id: String,
    pub voice_id: String,
    pub file_name: String,
    pub storage_key: String,
    pub created_at: DateTime<Utc>,
}

impl VoiceNoteArtifact {
    /// Derives `<namespace>/amara_<messageId>_<unixMillis>.mp3`.
    pub fn new(
        namespace: &str,
        message_id: &str,
        voice_id: &str,
        created_at: DateTime<Utc>,
    ) -> Self {
        let file_name = format!(
            "{}_{}_{}.mp3",
            VOICE_NOTE_FILE_PREFIX,
            message_id,
            created_at.timestamp_millis()
        );

        let namespace = namespace.trim_matches('/');
        let storage_key = if namespace.is_empty() {
            file_name.clone()
        } else {
            format!("{}/{}", namespace, file_name)
        };

        Self {
            message_id: message_id.to_string(),
            voice_id: voice_id.to_string(),
            file_name,
            storage_key,
            created_at,
        }
    }

    pub fn into_response(self, public_url: String) -> GenerateVoiceNoteResponse {
        GenerateVoiceNoteResponse {
            voice_note_url: public_url,
            file_name: self.file_name,
            file_path: self.storage_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn storage_key_embeds_message_id_and_millis() {
        let created_at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let artifact = VoiceNoteArtifact::new("voice-notes", "m1", "voice", created_at);

        assert_eq!(artifact.file_name, "amara_m1_1700000000123.mp3");
        assert_eq!(artifact.storage_key, "voice-notes/amara_m1_1700000000123.mp3");
    }

    #[test]
    fn same_message_id_at_different_times_never_collides() {
        let first = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let second = first + Duration::milliseconds(1);

        let a = VoiceNoteArtifact::new("voice-notes", "m1", "voice", first);
        let b = VoiceNoteArtifact::new("voice-notes", "m1", "voice", second);

        assert!(a.storage_key.contains("m1"));
        assert!(b.storage_key.contains("m1"));
        assert_ne!(a.storage_key, b.storage_key);
    }

    #[test]
    fn namespace_slashes_are_normalized() {
        let created_at = Utc.timestamp_millis_opt(42).unwrap();
        let artifact = VoiceNoteArtifact::new("/notes/", "abc", "voice", created_at);
        assert_eq!(artifact.storage_key, "notes/amara_abc_42.mp3");

        let bare = VoiceNoteArtifact::new("", "abc", "voice", created_at);
        assert_eq!(bare.storage_key, "amara_abc_42.mp3");
    }

    #[test]
    fn request_accepts_camel_case_fields() {
        let request: GenerateVoiceNoteRequest =
            serde_json::from_str(r#"{"text":"Hi","messageId":"m1","voiceId":"v"}"#).unwrap();
        assert_eq!(request.text.as_deref(), Some("Hi"));
        assert_eq!(request.message_id.as_deref(), Some("m1"));
        assert_eq!(request.voice_id.as_deref(), Some("v"));
    }
}
