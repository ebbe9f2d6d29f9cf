// Text classifier trait — the swap-ready abstraction.
//
// This trait defines the interface for text classification. The default
// implementation runs the toxic-bert ONNX model locally; a hosted
// HTTP endpoint is available as an alternative backend.

use async_trait::async_trait;
use thiserror::Error;

/// One class the model knows about and its score for a given text.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore {
    /// Class name as the model reports it (e.g. "toxic", "insult")
    pub label: String,
    /// Score from 0.0 to 1.0
    pub score: f64,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// The classifier could not produce a result: the model failed to load,
/// the endpoint was unreachable, or inference itself failed.
///
/// Never retried anywhere in the pipeline — each text gets at most one
/// inference call per request, and a batch aborts as a whole on the first
/// failure.
#[derive(Debug, Error)]
#[error("classifier unavailable: {reason}")]
pub struct ClassifierUnavailable {
    reason: String,
}

impl ClassifierUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Trait for classifying text. Implementations must be async because the
/// hosted backends require HTTP calls.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    /// Classify a single text, returning one entry per class the model
    /// recognizes, in no guaranteed order. The text is passed through
    /// verbatim — no mutation, no truncation, empty strings included.
    /// A successful result is never empty.
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, ClassifierUnavailable>;

    /// Classify multiple texts, returning results in input order.
    /// Default implementation calls classify sequentially — backends can
    /// override with true batched inference.
    async fn classify_batch(
        &self,
        texts: &[String],
    ) -> Result<Vec<Vec<LabelScore>>, ClassifierUnavailable> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.classify(text).await?);
        }
        Ok(results)
    }
}
