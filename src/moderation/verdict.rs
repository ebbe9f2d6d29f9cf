// Verdict derivation and batch statistics.
//
// Pure functions: given the classifier's label scores and a threshold,
// derive the per-text decision; given a batch of verdicts, the aggregate
// counts. Everything here is deterministic and side-effect free.

use serde::Serialize;

use crate::classifier::traits::LabelScore;

/// Display alias for the toxic flag. Always agrees with `Verdict::is_toxic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerdictStatus {
    Flagged,
    Safe,
}

impl VerdictStatus {
    pub fn from_flag(is_toxic: bool) -> Self {
        if is_toxic {
            Self::Flagged
        } else {
            Self::Safe
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flagged => "FLAGGED",
            Self::Safe => "SAFE",
        }
    }
}

impl std::fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The moderation decision for a single text. Immutable once derived.
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    /// The input text, echoed verbatim (empty strings included)
    pub text: String,
    /// True iff the toxic score strictly exceeds the threshold
    pub is_toxic: bool,
    /// Toxic score as a 0-100 percentage, rounded to 2 decimals.
    /// 0.0 when the model reports no toxic-labeled class.
    pub confidence: f64,
    pub status: VerdictStatus,
    /// The threshold the decision was made against, as a 0-100 percentage
    pub threshold: f64,
}

impl Verdict {
    /// Derive a verdict from a classification result.
    ///
    /// The toxic score is the maximum over all labels whose name contains
    /// "toxic" (case-insensitive) — toxic-bert reports both `toxic` and
    /// `severe_toxic`, and taking the max keeps the decision independent
    /// of the order the model lists them in. A score exactly equal to the
    /// threshold is not flagged. A result with no toxic-labeled class is
    /// treated as safe, not as an error.
    pub fn from_labels(text: &str, labels: &[LabelScore], threshold: f64) -> Self {
        let toxic_score = labels
            .iter()
            .filter(|entry| entry.label.to_lowercase().contains("toxic"))
            .map(|entry| entry.score)
            .fold(None, |best: Option<f64>, score| {
                Some(best.map_or(score, |b| b.max(score)))
            });

        let (is_toxic, confidence) = match toxic_score {
            Some(score) => (score > threshold, round2(score * 100.0)),
            None => (false, 0.0),
        };

        Self {
            text: text.to_string(),
            is_toxic,
            confidence,
            status: VerdictStatus::from_flag(is_toxic),
            threshold: threshold * 100.0,
        }
    }
}

/// Aggregate counts over one batch of verdicts. Computed once per batch
/// call, after every item has resolved; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchStats {
    pub total: usize,
    pub flagged: usize,
    pub safe: usize,
    /// flagged / total as a percentage, rounded to 2 decimals.
    /// 0.0 for an empty batch.
    pub flagged_percentage: f64,
}

impl BatchStats {
    pub fn from_verdicts(verdicts: &[Verdict]) -> Self {
        let total = verdicts.len();
        let flagged = verdicts.iter().filter(|v| v.is_toxic).count();
        let flagged_percentage = if total > 0 {
            round2(flagged as f64 / total as f64 * 100.0)
        } else {
            0.0
        };

        Self {
            total,
            flagged,
            safe: total - flagged,
            flagged_percentage,
        }
    }
}

/// Round to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
