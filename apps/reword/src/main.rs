mod config;
mod discord;
mod errors;
mod feedback;
mod llm_client;
mod models;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::discord::commands::command_definitions;
use crate::discord::signature::SignatureVerifier;
use crate::discord::DiscordClient;
use crate::feedback::extract::PdfTextExtractor;
use crate::feedback::Pipeline;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Reword bot v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Discord client and confirm the token works
    let discord = DiscordClient::new(config.discord_token.clone(), &config.discord_api_base)?;
    let application = discord
        .current_application()
        .await
        .context("Failed to fetch Discord application; check DISCORD_TOKEN")?;

    let public_key = config
        .discord_public_key
        .as_deref()
        .unwrap_or(&application.verify_key);
    let verifier = SignatureVerifier::from_hex(public_key)
        .context("Discord public key is not a valid Ed25519 key")?;

    let registered = discord
        .sync_commands(&application.id, &command_definitions())
        .await
        .context("Failed to register slash commands")?;
    let names: Vec<&str> = registered.iter().map(|c| c.name.as_str()).collect();
    info!("Synced slash commands: {}", names.join(", "));

    // Initialize LLM client
    let llm = LlmClient::new(config.openai_api_key.clone(), &config.openai_base_url)?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let pipeline = Pipeline::new(
        Arc::new(llm),
        Arc::new(discord.clone()),
        Arc::new(PdfTextExtractor),
        config.scratch_dir.clone(),
    )
    .with_max_chunk_chars(config.chunk_chars);
    info!(
        "Feedback pipeline ready (scratch dir: {}, chunk size: {})",
        config.scratch_dir.display(),
        config.chunk_chars
    );

    let state = AppState {
        pipeline: Arc::new(pipeline),
        discord,
        verifier,
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    info!("✅ Logged in as {}", application.name);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening for interactions on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
