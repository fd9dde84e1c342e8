use crate::{
    axum_http::{
        default_routers::{self, CORS_ALLOW_HEADERS},
        error_responses::panic_response,
        routers,
    },
    config::config_model::{BackendServer, DotEnvyConfig},
    usecases::{
        entitlements::EntitlementUpdater,
        paystack_webhook::PaystackWebhookUseCase,
        plan_limits::PlanLimitResolver,
        voice_notes::{VoiceNoteSettings, VoiceNoteUseCase},
    },
};
use amara_core::{
    domain::repositories::{
        profiles::ProfileRepository, speech::SpeechSynthesizer, storage::VoiceNoteStorage,
    },
    infra::{
        db::{postgres::postgres_connection::PgPoolSquad, repositories::profiles::ProfilePostgres},
        speech::elevenlabs::{ElevenLabsClient, ElevenLabsConfig},
        storages::supabase_storage::{SupabaseStorageClient, SupabaseStorageConfig},
    },
    payments::paystack_webhook::PaystackWebhookVerifier,
};
use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderName, Method, StatusCode},
    middleware,
    routing::get,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<()> {
    let synthesizer = Arc::new(ElevenLabsClient::new(ElevenLabsConfig {
        api_key: config.elevenlabs.api_key.clone(),
        base_url: config.elevenlabs.base_url.clone(),
        model_id: config.elevenlabs.model_id.clone(),
        request_timeout_secs: config.elevenlabs.request_timeout_secs,
    })?);

    let storage = Arc::new(
        SupabaseStorageClient::new(SupabaseStorageConfig {
            project_url: config.supabase.project_url.clone(),
            endpoint: config.supabase.s3_endpoint.clone(),
            region: config.supabase.s3_region.clone(),
            bucket: config.supabase.voice_note_bucket.clone(),
            access_key: config.supabase.s3_access_key.clone(),
            secret_key: config.supabase.s3_secret_key.clone(),
        })
        .await?,
    );

    let voice_notes = Arc::new(VoiceNoteUseCase::new(
        synthesizer,
        storage,
        VoiceNoteSettings {
            default_voice_id: config.elevenlabs.default_voice_id.clone(),
            storage_prefix: config.supabase.voice_note_prefix.clone(),
        },
    ));

    let entitlements = Arc::new(EntitlementUpdater::new(Arc::new(ProfilePostgres::new(
        Arc::clone(&db_pool),
    ))));
    let paystack = Arc::new(PaystackWebhookUseCase::new(
        PaystackWebhookVerifier::new(config.paystack.secret_key.clone()),
        entitlements,
    ));

    let plan_limits = Arc::new(PlanLimitResolver::new(config.plan_limits.clone()));

    let app = app(&config.backend_server, voice_notes, paystack, plan_limits)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.backend_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.backend_server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Routes plus the full layer stack, exactly as served.
pub fn app<S, V, P>(
    server: &BackendServer,
    voice_notes: Arc<VoiceNoteUseCase<S, V>>,
    paystack: Arc<PaystackWebhookUseCase<P>>,
    plan_limits: Arc<PlanLimitResolver>,
) -> Result<Router>
where
    S: SpeechSynthesizer + Send + Sync + 'static,
    V: VoiceNoteStorage + Send + Sync + 'static,
    P: ProfileRepository + Send + Sync + 'static,
{
    let app = Router::new()
        .fallback(default_routers::not_found)
        .merge(routers::voice_notes::routes(voice_notes))
        .merge(routers::paystack_webhook::routes(paystack))
        .nest("/plan-limits", routers::plan_limits::routes(plan_limits))
        .route("/api/v1/health-check", get(default_routers::health_check))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(server.timeout),
        ))
        .layer(RequestBodyLimitLayer::new(
            (server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers(cors_allow_headers()?)
                .allow_origin(Any),
        )
        .layer(middleware::from_fn(default_routers::answer_preflight))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

fn cors_allow_headers() -> Result<Vec<HeaderName>> {
    CORS_ALLOW_HEADERS
        .split(',')
        .map(|name| {
            HeaderName::try_from(name.trim())
                .with_context(|| format!("invalid CORS header name: {name}"))
        })
        .collect()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
