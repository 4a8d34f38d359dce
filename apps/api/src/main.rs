mod config;
mod errors;
mod generation;
mod llm_client;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{HfClient, TextGenerator};
use crate::render::{HtmlPdfRenderer, LineGrammar};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the inference client only when a token is available
    let generator: Option<Arc<dyn TextGenerator>> = match &config.hf_api_token {
        Some(token) => {
            let client = HfClient::new(
                token.clone(),
                &config.hf_api_base,
                &config.hf_model,
                config.generation_timeout,
            )?;
            info!(
                "Inference client initialized (endpoint: {}, timeout: {:?})",
                client.endpoint(),
                config.generation_timeout
            );
            Some(Arc::new(client) as Arc<dyn TextGenerator>)
        }
        None => {
            warn!("HUGGING_FACE_API_TOKEN is not set; generation requests will fail");
            None
        }
    };

    let grammar = LineGrammar::default().with_max_list_item(config.max_list_item);
    info!(
        "PDF temp dir: {}, list items up to {}.",
        config.pdf_temp_dir.display(),
        grammar.max_list_item
    );

    // Build app state
    let state = AppState {
        generator,
        renderer: Arc::new(HtmlPdfRenderer),
        grammar: Arc::new(grammar),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
