// src/main.rs — ManualMate entry point

use clap::Parser;
use std::sync::Arc;

use manualmate::cli::{chat, Cli};
use manualmate::core::binding::DocumentBinder;
use manualmate::core::controller::Controller;
use manualmate::infra::config::Config;
use manualmate::infra::logger;
use manualmate::provider::google::GeminiClient;
use manualmate::provider::{DocumentStore, Inference};

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG)
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    let model = cli.model.unwrap_or(config.model.name);
    let api_key = GeminiClient::api_key_from_env()?;

    // One client serves as both collaborators: the file store and the
    // generate-content service live behind the same API key.
    let client = Arc::new(GeminiClient::new(api_key, model, config.upload.clone()));
    let store: Arc<dyn DocumentStore> = client.clone();
    let inference: Arc<dyn Inference> = client;

    let binder = DocumentBinder::new(store, &config.upload);
    let mut controller = Controller::new(binder, inference);

    chat::run_chat(&mut controller, cli.manual.as_deref(), cli.quiet).await
}
