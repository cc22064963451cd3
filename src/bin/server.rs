//! HTTP front end for the normalizer.
//!
//! ```text
//! GET  /health              liveness
//! GET  /v1/config           effective configuration + generation
//! POST /v1/config/reload    re-read every layer now
//! POST /v1/normalize        {"input": "...", "config": {...}?, "split_sentences": bool?}
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tts_normalize::config::{assignment_to_tree, deep_merge};
use tts_normalize::{ConfigResolver, ConfigSources, NormalizationResult, Sentence, TextProcessor};

/// Text normalization service for text-to-speech
#[derive(Parser, Debug)]
#[command(name = "tts-normalize-server")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8090)]
    port: u16,

    /// Base settings file (JSON)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// User override file (JSON), layered over the base file
    #[arg(long = "user-config", value_name = "FILE")]
    user_config: Option<PathBuf>,

    /// Prefix of environment overrides (`<PREFIX>__SECTION__KEY=value`)
    #[arg(long, default_value = "TTS_NORMALIZE")]
    env_prefix: String,

    /// Override a single key, e.g. `--set currency_processing.style=decimal-words`
    #[arg(long = "set", value_name = "SECTION.KEY=VALUE")]
    set: Vec<String>,

    /// Do not watch the settings files for changes
    #[arg(long)]
    no_watch: bool,
}

struct AppState {
    resolver: Arc<ConfigResolver>,
    processor: Arc<TextProcessor>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct NormalizeRequest {
    input: String,
    /// Per-request overrides, layered over the current snapshot.
    #[serde(default)]
    config: Option<Value>,
    #[serde(default)]
    split_sentences: bool,
}

#[derive(Debug, Serialize)]
struct NormalizeResponse {
    #[serde(flatten)]
    result: NormalizationResult,
    rejected_overrides: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sentences: Option<Vec<Sentence>>,
    config_generation: u64,
}

async fn health() -> &'static str {
    "ok"
}

async fn get_config(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "generation": state.resolver.generation(),
        "config": state.resolver.snapshot().to_tree(),
    }))
}

async fn reload_config(State(state): State<Arc<AppState>>) -> Json<Value> {
    let resolver = Arc::clone(&state.resolver);
    let errors = tokio::task::spawn_blocking(move || resolver.reload())
        .await
        .map(|errors| errors.iter().map(ToString::to_string).collect::<Vec<_>>())
        .unwrap_or_else(|e| vec![e.to_string()]);
    Json(json!({
        "generation": state.resolver.generation(),
        "errors": errors,
    }))
}

async fn normalize_text(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NormalizeRequest>,
) -> Result<Json<NormalizeResponse>, (StatusCode, String)> {
    let generation = state.resolver.generation();
    let snapshot = state.resolver.snapshot();
    let processor = Arc::clone(&state.processor);

    let response = tokio::task::spawn_blocking(move || {
        let (config, rejected) = match &request.config {
            Some(overlay) => snapshot.with_overrides(overlay),
            None => ((*snapshot).clone(), Vec::new()),
        };
        for e in &rejected {
            warn!("rejected per-request override: {}", e);
        }
        let result = processor.process(&request.input, &config);
        let sentences = request
            .split_sentences
            .then(|| result.sentences(config.text_processing.max_sentence_chars));
        NormalizeResponse {
            result,
            rejected_overrides: rejected.iter().map(ToString::to_string).collect(),
            sentences,
            config_generation: generation,
        }
    })
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(response))
}

fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/v1/config", get(get_config))
        .route("/v1/config/reload", post(reload_config))
        .route("/v1/normalize", post(normalize_text))
        .layer(TraceLayer::new_for_http());

    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// main
// ─────────────────────────────────────────────────────────────────────────────

fn cli_overrides(assignments: &[String]) -> anyhow::Result<Option<Value>> {
    if assignments.is_empty() {
        return Ok(None);
    }
    let mut tree = Value::Object(Map::new());
    for assignment in assignments {
        let overlay = assignment_to_tree(assignment).with_context(|| format!("invalid --set {assignment:?}"))?;
        deep_merge(&mut tree, &overlay);
    }
    Ok(Some(tree))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let sources = ConfigSources {
        base: cli.config.clone(),
        user_override: cli.user_config.clone(),
        env_prefix: Some(cli.env_prefix.clone()),
        cli: cli_overrides(&cli.set)?,
    };
    let resolver = Arc::new(ConfigResolver::new(sources));
    let watcher = if cli.no_watch {
        None
    } else {
        resolver.watch().context("failed to start config watcher")?
    };

    let state = Arc::new(AppState {
        resolver: Arc::clone(&resolver),
        processor: Arc::new(TextProcessor::new()),
    });
    let app = create_router(state);

    let address: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", cli.host, cli.port))?;
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(watcher) = watcher {
        watcher.stop();
    }
    Ok(())
}
