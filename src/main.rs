use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use palisade::classifier::traits::TextClassifier;
use palisade::config::{ClassifierBackend, Config};
use palisade::moderation::engine::ModerationEngine;
use palisade::web::AppState;

/// Palisade: content moderation API.
///
/// Classifies text as toxic or safe against a confidence threshold and
/// serves the decisions over HTTP.
#[derive(Parser)]
#[command(name = "palisade", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the moderation API server
    Serve {
        /// Port to listen on (overrides the PORT env var)
        #[arg(long)]
        port: Option<u16>,

        /// Bind address (overrides PALISADE_BIND)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Moderate texts from the command line
    Check {
        /// One or more texts to moderate
        #[arg(required = true)]
        texts: Vec<String>,

        /// Confidence threshold between 0 and 1
        #[arg(long, default_value = "0.5")]
        threshold: f64,
    },

    /// Download the ONNX toxicity model (~110 MB)
    DownloadModel,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("palisade=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            config.require_classifier()?;

            info!(model = %config.model_name(), "Loading classifier...");
            let classifier = create_classifier(&config)?;
            let engine = Arc::new(ModerationEngine::new(classifier));

            let state = AppState {
                engine,
                model_name: config.model_name(),
            };

            let port = port.unwrap_or(config.port);
            let bind = bind.unwrap_or_else(|| config.bind.clone());
            palisade::web::run_server(state, port, &bind).await?;
        }

        Commands::Check { texts, threshold } => {
            if !(0.0..=1.0).contains(&threshold) {
                anyhow::bail!("threshold must be between 0 and 1");
            }

            let config = Config::load()?;
            config.require_classifier()?;

            let classifier = create_classifier(&config)?;
            let engine = ModerationEngine::new(classifier);

            println!("Analyzing {} text(s)...\n", texts.len());
            let (verdicts, stats) = engine.moderate_batch(&texts, threshold).await?;

            for (i, verdict) in verdicts.iter().enumerate() {
                palisade::output::display_verdict(i, verdict);
            }
            palisade::output::display_stats(&stats);
        }

        Commands::DownloadModel => {
            let config = Config::load()?;

            println!("Downloading ONNX model...");
            println!("  Destination: {}", config.model_dir.display());

            palisade::classifier::download::download_model(&config.model_dir).await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("You can now run `palisade serve` or `palisade check \"some text\"`.");
        }
    }

    Ok(())
}

/// Build the classifier chosen by configuration. Loading happens once
/// here, before any request is served; the handle is then injected into
/// the engine.
fn create_classifier(config: &Config) -> Result<Arc<dyn TextClassifier>> {
    match config.classifier_backend {
        ClassifierBackend::Onnx => {
            let classifier = palisade::classifier::onnx::OnnxClassifier::load(&config.model_dir)?;
            Ok(Arc::new(classifier))
        }
        ClassifierBackend::Remote => Ok(Arc::new(
            palisade::classifier::remote::RemoteClassifier::new(
                config.classifier_url.clone(),
                config.classifier_api_key.clone(),
            ),
        )),
    }
}
