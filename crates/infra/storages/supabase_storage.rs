use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::{
    error::{ProvideErrorMetadata, SdkError},
    operation::put_object::PutObjectError,
    primitives::ByteStream,
};
use bytes::Bytes;

use crate::domain::repositories::storage::VoiceNoteStorage;

use super::s3::{S3Config, build_s3_client};

#[derive(Debug, Clone)]
pub struct SupabaseStorageConfig {
    pub project_url: String,
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
}

pub struct SupabaseStorageClient {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl SupabaseStorageClient {
    pub async fn new(config: SupabaseStorageConfig) -> Result<Self> {
        let client = build_s3_client(&S3Config::new(
            config.endpoint,
            config.region,
            config.access_key,
            config.secret_key,
        ))
        .await
        .context("failed to build Supabase s3 client")?;

        Ok(Self {
            client,
            public_base_url: public_base_url(&config.project_url, &config.bucket),
            bucket: config.bucket,
        })
    }
}

#[async_trait]
impl VoiceNoteStorage for SupabaseStorageClient {
    /// Supabase Storage S3-compatible API reference:
    /// https://supabase.com/docs/guides/storage/s3/compatibility
    async fn upload_voice_note(
        &self,
        object_key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(object_key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .if_none_match("*")
            .send()
            .await
            .map_err(|err| map_put_object_error(err, &self.bucket, object_key))?;

        Ok(())
    }

    fn public_url(&self, object_key: &str) -> String {
        format!("{}/{}", self.public_base_url, object_key.trim_start_matches('/'))
    }
}

fn public_base_url(project_url: &str, bucket: &str) -> String {
    format!(
        "{}/storage/v1/object/public/{}",
        project_url.trim_end_matches('/'),
        bucket.trim_matches('/')
    )
}

fn map_put_object_error(
    err: SdkError<PutObjectError>,
    bucket: &str,
    object_key: &str,
) -> anyhow::Error {
    if let SdkError::ServiceError(service_err) = &err {
        let raw = service_err.raw();
        let status = raw.status().as_u16();
        let code = service_err.err().code().unwrap_or("unknown");

        if matches!(status, 409 | 412) {
            return anyhow::anyhow!(
                "voice note object already exists [bucket={}, key={}]",
                bucket,
                object_key
            );
        }

        let mut detail = format!(
            "failed to upload voice note to Supabase Storage (status {}, code {})",
            status, code
        );

        if let Some(message) = service_err.err().message().filter(|m| !m.is_empty()) {
            detail.push_str(&format!(": {}", message));
        }

        detail.push_str(&format!(" [bucket={}, key={}]", bucket, object_key));

        return anyhow::anyhow!(detail);
    }

    anyhow::Error::new(err).context("failed to upload voice note to Supabase Storage")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_points_at_public_object_route() {
        assert_eq!(
            public_base_url("https://abc.supabase.co/", "voice-notes"),
            "https://abc.supabase.co/storage/v1/object/public/voice-notes"
        );
    }

    fn load_supabase_config_from_env() -> Result<SupabaseStorageConfig> {
        dotenvy::dotenv().ok();

        let project_url =
            std::env::var("SUPABASE_PROJECT_URL").context("SUPABASE_PROJECT_URL is required")?;
        let endpoint = std::env::var("SUPABASE_S3_ENDPOINT").unwrap_or_else(|_| {
            format!("{}/storage/v1/s3", project_url.trim_end_matches('/'))
        });

        Ok(SupabaseStorageConfig {
            project_url,
            endpoint,
            region: std::env::var("SUPABASE_S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
            bucket: std::env::var("SUPABASE_VOICE_NOTE_BUCKET")
                .unwrap_or_else(|_| "voice-notes".into()),
            access_key: std::env::var("SUPABASE_S3_ACCESS_KEY_ID")
                .context("SUPABASE_S3_ACCESS_KEY_ID is required")?,
            secret_key: std::env::var("SUPABASE_S3_SECRET_ACCESS_KEY")
                .context("SUPABASE_S3_SECRET_ACCESS_KEY is required")?,
        })
    }

    // Manual check: export the Supabase S3 credentials, then run:
    // cargo test -p amara-core supabase_storage::tests::second_upload_to_same_key_is_rejected -- --ignored
    #[tokio::test]
    #[ignore = "hits real Supabase Storage and needs credentials"]
    async fn second_upload_to_same_key_is_rejected() -> Result<()> {
        let client = SupabaseStorageClient::new(load_supabase_config_from_env()?).await?;
        let key = format!(
            "manual-checks/amara_collision_check_{}.mp3",
            chrono::Utc::now().timestamp_millis()
        );
        let bytes = Bytes::from_static(b"ID3");

        client
            .upload_voice_note(&key, bytes.clone(), "audio/mpeg")
            .await?;
        println!("uploaded collision check object to {}", client.public_url(&key));

        assert!(
            client
                .upload_voice_note(&key, bytes, "audio/mpeg")
                .await
                .is_err()
        );
        Ok(())
    }
}
