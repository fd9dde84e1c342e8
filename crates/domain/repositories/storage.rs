use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use mockall::automock;

#[automock]
#[async_trait]
pub trait VoiceNoteStorage {
    /// Writes `bytes` under `object_key`. Fails if the key already exists.
    async fn upload_voice_note(
        &self,
        object_key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<()>;

    fn public_url(&self, object_key: &str) -> String;
}
