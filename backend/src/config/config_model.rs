use amara_core::domain::value_objects::plans::PlanLimitsTable;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Database,
    pub supabase: Supabase,
    pub elevenlabs: ElevenLabs,
    pub paystack: Paystack,
    pub plan_limits: PlanLimitsTable,
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    /// MiB
    pub body_limit: u64,
    /// seconds
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct Supabase {
    pub project_url: String,
    pub voice_note_bucket: String,
    pub voice_note_prefix: String,
    pub s3_endpoint: String,
    pub s3_region: String,
    pub s3_access_key: String,
    pub s3_secret_key: String,
}

#[derive(Debug, Clone)]
pub struct ElevenLabs {
    pub api_key: String,
    pub base_url: String,
    pub default_voice_id: String,
    pub model_id: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct Paystack {
    pub secret_key: String,
}
