// Hosted text-classification backend.
//
// Calls an HTTP inference endpoint speaking the HuggingFace
// text-classification format: POST {"inputs": "..."} returns one row of
// {label, score} pairs per input. Works against Inference API deployments
// of toxic-bert and anything wire-compatible with them.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::pacer::Pacer;
use super::traits::{ClassifierUnavailable, LabelScore, TextClassifier};

/// Hosted inference endpoints commonly cap free tiers around 1 QPS.
const DEFAULT_REQUESTS_PER_MINUTE: f64 = 60.0;

/// Classifier backed by a hosted text-classification endpoint.
pub struct RemoteClassifier {
    client: Client,
    endpoint: String,
    /// Bearer token, if the endpoint requires one
    api_key: Option<String>,
    pacer: Pacer,
}

impl RemoteClassifier {
    /// Create a classifier for the given endpoint URL.
    pub fn new(endpoint: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
            pacer: Pacer::per_minute(DEFAULT_REQUESTS_PER_MINUTE),
        }
    }
}

#[async_trait]
impl TextClassifier for RemoteClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, ClassifierUnavailable> {
        // Pace outbound calls before hitting the endpoint
        self.pacer.wait().await;

        let request = InferenceRequest {
            inputs: text.to_string(),
        };

        let mut call = self.client.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            call = call.bearer_auth(key);
        }

        let response = call.send().await.map_err(|e| {
            ClassifierUnavailable::new(format!("request to classifier endpoint failed: {e}"))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierUnavailable::new(format!(
                "classifier endpoint returned {status}: {body}"
            )));
        }

        let rows: Vec<Vec<RawScore>> = response.json().await.map_err(|e| {
            ClassifierUnavailable::new(format!("failed to parse classifier response: {e}"))
        })?;

        let labels: Vec<LabelScore> = rows
            .into_iter()
            .next()
            .unwrap_or_default()
            .into_iter()
            .map(|raw| LabelScore::new(raw.label, raw.score))
            .collect();

        // The adapter guarantees a non-empty label set on success
        if labels.is_empty() {
            return Err(ClassifierUnavailable::new("classifier returned no labels"));
        }

        debug!(
            labels = labels.len(),
            text_preview = %crate::output::truncate_chars(text, 50),
            "Remote classifier scored text"
        );

        Ok(labels)
    }
}

// --- Inference endpoint request/response types ---

#[derive(Serialize)]
struct InferenceRequest {
    inputs: String,
}

#[derive(Deserialize)]
struct RawScore {
    label: String,
    score: f64,
}
