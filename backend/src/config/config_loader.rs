use std::str::FromStr;

use amara_core::{
    domain::value_objects::plans::{PlanLimitsOverride, PlanLimitsTable},
    infra::speech::elevenlabs::{DEFAULT_BASE_URL, DEFAULT_MODEL_ID, DEFAULT_VOICE_ID},
};
use anyhow::{Context, Result, bail};

use super::config_model::{
    BackendServer, Database, DotEnvyConfig, ElevenLabs, Paystack, Supabase,
};

/// Reads `.env` (when present) and the process environment. Any missing
/// credential fails here, before the server binds.
pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();
    load_from(|key| std::env::var(key).ok())
}

pub fn load_from<F>(lookup: F) -> Result<DotEnvyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let env = Env { lookup };

    let backend_server = BackendServer {
        port: env.parse_required("SERVER_PORT_BACKEND")?,
        body_limit: env.parse_or("SERVER_BODY_LIMIT", 10)?,
        timeout: env.parse_or("SERVER_TIMEOUT", 30)?,
    };

    let database = Database {
        url: env.required("DATABASE_URL")?,
        max_connections: env.parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
    };

    let project_url = env.required("SUPABASE_PROJECT_URL")?;
    let supabase = Supabase {
        s3_endpoint: env.optional("SUPABASE_S3_ENDPOINT").unwrap_or_else(|| {
            format!("{}/storage/v1/s3", project_url.trim_end_matches('/'))
        }),
        s3_region: env.or("SUPABASE_S3_REGION", "us-east-1"),
        s3_access_key: env.required("SUPABASE_S3_ACCESS_KEY_ID")?,
        s3_secret_key: env.required("SUPABASE_S3_SECRET_ACCESS_KEY")?,
        voice_note_bucket: env.or("SUPABASE_VOICE_NOTE_BUCKET", "voice-notes"),
        voice_note_prefix: env.or("VOICE_NOTE_PREFIX", "voice-notes"),
        project_url,
    };

    let elevenlabs = ElevenLabs {
        api_key: env.required("ELEVENLABS_API_KEY")?,
        base_url: env.or("ELEVENLABS_BASE_URL", DEFAULT_BASE_URL),
        default_voice_id: env.or("ELEVENLABS_DEFAULT_VOICE_ID", DEFAULT_VOICE_ID),
        model_id: env.or("ELEVENLABS_MODEL_ID", DEFAULT_MODEL_ID),
        request_timeout_secs: provider_timeout(&env, backend_server.timeout)?,
    };

    let paystack = Paystack {
        secret_key: env.required("PAYSTACK_SECRET_KEY")?,
    };

    let plan_limits = match env.optional("PLAN_LIMITS") {
        Some(raw) => {
            let overrides: PlanLimitsOverride =
                serde_json::from_str(&raw).context("PLAN_LIMITS is invalid")?;
            PlanLimitsTable::default().with_override(overrides)
        }
        None => PlanLimitsTable::default(),
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        supabase,
        elevenlabs,
        paystack,
        plan_limits,
    })
}

/// The provider call must give up before the server timeout so the caller
/// gets `Failed to generate audio` instead of an empty 408.
fn provider_timeout<F>(env: &Env<F>, server_timeout: u64) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let default = server_timeout.saturating_sub(PROVIDER_TIMEOUT_HEADROOM_SECS).max(1);
    let timeout = env.parse_or("ELEVENLABS_TIMEOUT", default)?;

    if timeout >= server_timeout {
        bail!(
            "ELEVENLABS_TIMEOUT ({timeout}s) must be below SERVER_TIMEOUT ({server_timeout}s)"
        );
    }

    Ok(timeout)
}

const PROVIDER_TIMEOUT_HEADROOM_SECS: u64 = 5;

struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.optional(key)
            .with_context(|| format!("{key} is missing"))
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parse_required<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.required(key)?
            .parse()
            .with_context(|| format!("{key} is invalid"))
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match self.optional(key) {
            Some(raw) => raw.parse().with_context(|| format!("{key} is invalid")),
            None => Ok(default),
        }
    }
}
