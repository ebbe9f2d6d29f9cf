// The moderation engine — classification plus decision policy.
//
// Holds the classifier handle built once at startup and injected here.
// Per call: classify, derive verdicts, aggregate. Stateless between
// calls; thresholds arrive already validated.

use std::sync::Arc;

use tracing::debug;

use super::verdict::{BatchStats, Verdict};
use crate::classifier::traits::{ClassifierUnavailable, TextClassifier};

pub struct ModerationEngine {
    classifier: Arc<dyn TextClassifier>,
}

impl ModerationEngine {
    /// Build an engine around an already-initialized classifier.
    pub fn new(classifier: Arc<dyn TextClassifier>) -> Self {
        Self { classifier }
    }

    /// Moderate a single text against `threshold`.
    ///
    /// `threshold` must already be validated to [0, 1] — the engine does
    /// not re-check it. One classifier invocation, no retries.
    pub async fn moderate(
        &self,
        text: &str,
        threshold: f64,
    ) -> Result<Verdict, ClassifierUnavailable> {
        let labels = self.classifier.classify(text).await?;
        Ok(Verdict::from_labels(text, &labels, threshold))
    }

    /// Moderate a batch of texts, preserving input order.
    ///
    /// Fail-fast: if any item fails to classify, the whole batch errors
    /// and no partial results are returned. Statistics are computed only
    /// once every verdict is in.
    pub async fn moderate_batch(
        &self,
        texts: &[String],
        threshold: f64,
    ) -> Result<(Vec<Verdict>, BatchStats), ClassifierUnavailable> {
        let results = self.classifier.classify_batch(texts).await?;

        let verdicts: Vec<Verdict> = texts
            .iter()
            .zip(results.iter())
            .map(|(text, labels)| Verdict::from_labels(text, labels, threshold))
            .collect();

        let stats = BatchStats::from_verdicts(&verdicts);
        debug!(total = stats.total, flagged = stats.flagged, "Moderated batch");

        Ok((verdicts, stats))
    }
}
