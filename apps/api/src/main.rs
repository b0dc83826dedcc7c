mod chat;
mod cli;
mod config;
mod errors;
mod llm_client;
mod pipeline;
mod prompting;
mod retrieval;
mod routes;
mod session;
mod state;
mod transform;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::llm_client::{CompletionClient, OpenRouterClient};
use crate::pipeline::Orchestrator;
use crate::retrieval::chunker::TextChunker;
use crate::retrieval::embedding::HashEmbedder;
use crate::retrieval::index::build_index;
use crate::retrieval::{IndexRetriever, Retriever};
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => serve(config, port).await,
        Command::Index {
            docs,
            out,
            chunk_size,
            overlap,
            dimension,
        } => index(&docs, &out, chunk_size, overlap, dimension),
    }
}

async fn serve(config: Config, port: Option<u16>) -> Result<()> {
    config.check_credentials()?;
    info!("Starting Guaraní RAG API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize retriever (fails open)
    let index = IndexRetriever::load(&config.index_dir);
    match index.unavailable_reason() {
        None => info!("Vector index loaded from {}", config.index_dir.display()),
        Some(reason) => warn!("Vector index unavailable, continuing without RAG: {reason}"),
    }
    let retriever: Arc<dyn Retriever> = Arc::new(index);

    // Initialize completion client; without a key the shell answers 503
    let pipeline = match &config.api_key {
        Some(key) => {
            let client = OpenRouterClient::new(
                key.clone(),
                config.model_name.clone(),
                &config.api_url,
                config.completion_timeout,
            )?;
            info!("Completion client initialized (model: {})", client.model());
            Some(Orchestrator::new(
                retriever.clone(),
                Arc::new(client),
                config.pipeline_config(),
            ))
        }
        None => {
            warn!("OPENROUTER_API_KEY is not set; completion endpoints will answer 503");
            None
        }
    };

    // Build app state
    let state = AppState {
        pipeline,
        retriever,
        sessions: Arc::new(SessionStore::new()),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", port.unwrap_or(config.port)).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn index(docs: &Path, out: &Path, chunk_size: usize, overlap: f32, dimension: usize) -> Result<()> {
    info!(
        "Indexing {} (chunk_size={chunk_size}, overlap={overlap}, dimension={dimension})",
        docs.display()
    );
    let chunker = TextChunker::new(chunk_size, overlap);
    let index = build_index(docs, Box::new(HashEmbedder::new(dimension)), &chunker)
        .with_context(|| format!("failed to index {}", docs.display()))?;
    if index.is_empty() {
        warn!("No .txt/.md content found in {}", docs.display());
    } else {
        info!("Indexed {} chunks from {}", index.len(), docs.display());
    }
    index
        .save(out)
        .with_context(|| format!("failed to write index to {}", out.display()))?;
    Ok(())
}
