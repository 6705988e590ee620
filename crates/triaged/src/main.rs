//! Triage daemon - conversational symptom triage for the appointment scheduler.
//!
//! Classifies patient messages into intents and specialty recommendations,
//! falling back from static keyword mapping to a local LLM to clarification.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn, Level};

use triaged::config::Config;
use triaged::llm::{OllamaGenerator, SamplingParams, TextGenerator};
use triaged::server::{self, AppState};
use triaged::triage::TriageEngine;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("triaged v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load();

    let generator: Arc<dyn TextGenerator> = Arc::new(OllamaGenerator::new(&config.llm)?);
    if generator.is_available().await {
        info!("Model backend reachable at {}", config.llm.ollama_url);
    } else {
        warn!("Model backend unreachable, keyword fallback will answer /chat");
    }

    let engine = TriageEngine::new(generator, SamplingParams::from(&config.llm));

    server::run(AppState::new(engine), &config.server.bind_addr).await
}
