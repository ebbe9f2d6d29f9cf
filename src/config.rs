use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Which classifier backend to serve.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierBackend {
    /// Local ONNX toxic-bert model (default) — no API key, no network
    Onnx,
    /// Hosted text-classification endpoint — requires PALISADE_CLASSIFIER_URL
    Remote,
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy; nothing
/// is hardcoded.
pub struct Config {
    /// Port the API listens on (PORT, default 5000)
    pub port: u16,
    /// Bind address (PALISADE_BIND, default 0.0.0.0)
    pub bind: String,
    /// Which classifier to serve (default: Onnx)
    pub classifier_backend: ClassifierBackend,
    /// Directory containing the ONNX model files
    pub model_dir: PathBuf,
    /// Hosted classifier endpoint (remote backend only)
    pub classifier_url: String,
    /// Bearer token for the hosted endpoint, if it needs one
    pub classifier_api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let classifier_backend = match env::var("PALISADE_CLASSIFIER").as_deref() {
            Ok("remote") => ClassifierBackend::Remote,
            // "onnx" or unset both default to the local model
            _ => ClassifierBackend::Onnx,
        };

        let model_dir = env::var("PALISADE_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::classifier::download::default_model_dir());

        let port = match env::var("PORT") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("Invalid PORT value: {value}"))?,
            Err(_) => 5000,
        };

        Ok(Self {
            port,
            bind: env::var("PALISADE_BIND").unwrap_or_else(|_| "0.0.0.0".to_string()),
            classifier_backend,
            model_dir,
            classifier_url: env::var("PALISADE_CLASSIFIER_URL").unwrap_or_default(),
            classifier_api_key: env::var("PALISADE_CLASSIFIER_API_KEY").ok(),
        })
    }

    /// Check that the chosen classifier backend has what it needs.
    /// For Onnx: model files must exist (or the user should run download-model).
    /// For Remote: the endpoint URL must be set.
    pub fn require_classifier(&self) -> Result<()> {
        match self.classifier_backend {
            ClassifierBackend::Onnx => {
                if !crate::classifier::download::model_files_present(&self.model_dir) {
                    anyhow::bail!(
                        "ONNX model files not found in {}\n\
                         Run `palisade download-model` to download them.\n\
                         Or set PALISADE_CLASSIFIER=remote to use a hosted endpoint instead.",
                        self.model_dir.display()
                    );
                }
                Ok(())
            }
            ClassifierBackend::Remote => {
                if self.classifier_url.is_empty() {
                    anyhow::bail!(
                        "PALISADE_CLASSIFIER_URL not set. The remote backend needs a \
                         text-classification endpoint to call."
                    );
                }
                Ok(())
            }
        }
    }

    /// Human-readable model identifier for /health and startup logs.
    pub fn model_name(&self) -> String {
        match self.classifier_backend {
            ClassifierBackend::Onnx => "toxic-bert".to_string(),
            ClassifierBackend::Remote => self.classifier_url.clone(),
        }
    }
}
