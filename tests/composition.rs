// Composition tests — the engine over scripted classifier doubles.
//
// These exercise the data flow classifier -> verdicts -> statistics with
// no network, filesystem, or model dependency: order preservation, index
// alignment, idempotence, fail-fast batch abort, and the documented
// scenarios.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use palisade::classifier::traits::{ClassifierUnavailable, LabelScore, TextClassifier};
use palisade::moderation::engine::ModerationEngine;
use palisade::moderation::verdict::VerdictStatus;

/// Deterministic classifier: maps exact texts to toxic scores, with a
/// default for anything unlisted. Emits the full label set a real model
/// would, so verdict derivation sees realistic input.
struct ScriptedClassifier {
    scores: HashMap<String, f64>,
    default_score: f64,
}

impl ScriptedClassifier {
    fn new(entries: &[(&str, f64)]) -> Self {
        Self {
            scores: entries
                .iter()
                .map(|(text, score)| (text.to_string(), *score))
                .collect(),
            default_score: 0.02,
        }
    }
}

#[async_trait]
impl TextClassifier for ScriptedClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, ClassifierUnavailable> {
        let toxic = self.scores.get(text).copied().unwrap_or(self.default_score);
        Ok(vec![
            LabelScore::new("toxic", toxic),
            LabelScore::new("insult", toxic * 0.8),
            LabelScore::new("threat", 0.01),
        ])
    }
}

/// Fails on one specific text, succeeds on everything else. Counts calls
/// so tests can assert where the batch stopped.
struct TrippingClassifier {
    poison: String,
    calls: AtomicUsize,
}

impl TrippingClassifier {
    fn new(poison: &str) -> Self {
        Self {
            poison: poison.to_string(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TextClassifier for TrippingClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, ClassifierUnavailable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text == self.poison {
            return Err(ClassifierUnavailable::new("model crashed"));
        }
        Ok(vec![LabelScore::new("toxic", 0.1)])
    }
}

/// A classifier whose model never reports any toxic-like class.
struct NoToxicLabelClassifier;

#[async_trait]
impl TextClassifier for NoToxicLabelClassifier {
    async fn classify(&self, _text: &str) -> Result<Vec<LabelScore>, ClassifierUnavailable> {
        Ok(vec![
            LabelScore::new("insult", 0.95),
            LabelScore::new("threat", 0.9),
        ])
    }
}

fn engine_with(entries: &[(&str, f64)]) -> ModerationEngine {
    ModerationEngine::new(Arc::new(ScriptedClassifier::new(entries)))
}

// ============================================================
// Single moderation — documented scenarios
// ============================================================

#[tokio::test]
async fn polite_text_is_safe() {
    let engine = engine_with(&[("Thank you so much for your help!", 0.02)]);
    let verdict = engine
        .moderate("Thank you so much for your help!", 0.5)
        .await
        .unwrap();

    assert!(!verdict.is_toxic);
    assert_eq!(verdict.confidence, 2.0);
    assert_eq!(verdict.status, VerdictStatus::Safe);
    assert_eq!(verdict.threshold, 50.0);
}

#[tokio::test]
async fn hostile_text_is_flagged() {
    let engine = engine_with(&[("You're an idiot and I hate you!", 0.91)]);
    let verdict = engine
        .moderate("You're an idiot and I hate you!", 0.5)
        .await
        .unwrap();

    assert!(verdict.is_toxic);
    assert_eq!(verdict.confidence, 91.0);
    assert_eq!(verdict.status, VerdictStatus::Flagged);
}

#[tokio::test]
async fn empty_text_is_classified_not_rejected() {
    let engine = engine_with(&[("", 0.02)]);
    let verdict = engine.moderate("", 0.5).await.unwrap();
    assert_eq!(verdict.text, "");
    assert!(!verdict.is_toxic);
}

#[tokio::test]
async fn moderation_is_idempotent_against_a_deterministic_classifier() {
    let engine = engine_with(&[("same text", 0.42)]);
    let first = engine.moderate("same text", 0.4).await.unwrap();
    let second = engine.moderate("same text", 0.4).await.unwrap();

    assert_eq!(first.text, second.text);
    assert_eq!(first.is_toxic, second.is_toxic);
    assert_eq!(first.confidence, second.confidence);
    assert_eq!(first.status, second.status);
    assert_eq!(first.threshold, second.threshold);
}

#[tokio::test]
async fn model_without_toxic_class_yields_safe_zero_confidence() {
    let engine = ModerationEngine::new(Arc::new(NoToxicLabelClassifier));
    // Threshold 0.0 would flag any positive toxic score — but there is none
    let verdict = engine.moderate("anything", 0.0).await.unwrap();

    assert!(!verdict.is_toxic);
    assert_eq!(verdict.confidence, 0.0);
    assert_eq!(verdict.status, VerdictStatus::Safe);
}

// ============================================================
// Batch moderation — ordering and statistics
// ============================================================

#[tokio::test]
async fn batch_scenario_with_four_texts() {
    let texts: Vec<String> = ["polite", "rude", "neutral", "vile"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let engine = engine_with(&[
        ("polite", 0.02),
        ("rude", 0.85),
        ("neutral", 0.01),
        ("vile", 0.93),
    ]);

    let (verdicts, stats) = engine.moderate_batch(&texts, 0.5).await.unwrap();

    assert_eq!(verdicts.len(), texts.len());
    assert_eq!(stats.total, 4);
    assert_eq!(stats.flagged, 2);
    assert_eq!(stats.safe, 2);
    assert_eq!(stats.flagged_percentage, 50.0);
}

#[tokio::test]
async fn batch_results_align_with_input_indices() {
    let texts: Vec<String> = (0..6).map(|i| format!("text number {i}")).collect();
    let engine = engine_with(&[("text number 2", 0.99), ("text number 4", 0.88)]);

    let (verdicts, _) = engine.moderate_batch(&texts, 0.5).await.unwrap();

    for (i, verdict) in verdicts.iter().enumerate() {
        assert_eq!(verdict.text, texts[i], "verdict {i} must echo input {i}");
    }
    assert!(verdicts[2].is_toxic);
    assert!(verdicts[4].is_toxic);
    assert!(!verdicts[0].is_toxic);
}

#[tokio::test]
async fn empty_batch_yields_empty_results_and_zero_stats() {
    let engine = engine_with(&[]);
    let (verdicts, stats) = engine.moderate_batch(&[], 0.5).await.unwrap();

    assert!(verdicts.is_empty());
    assert_eq!(stats.total, 0);
    assert_eq!(stats.flagged, 0);
    assert_eq!(stats.safe, 0);
    assert_eq!(stats.flagged_percentage, 0.0);
}

#[tokio::test]
async fn batch_statuses_always_agree_with_flags() {
    let texts: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
    let engine = engine_with(&[("a", 0.9), ("b", 0.5), ("c", 0.1)]);

    let (verdicts, _) = engine.moderate_batch(&texts, 0.5).await.unwrap();
    for verdict in &verdicts {
        assert_eq!(verdict.status, VerdictStatus::from_flag(verdict.is_toxic));
    }
}

// ============================================================
// Failure propagation — fail-fast, no retries
// ============================================================

#[tokio::test]
async fn unavailable_classifier_fails_single_moderation() {
    let classifier = TrippingClassifier::new("boom");
    let engine = ModerationEngine::new(Arc::new(classifier));

    let err = engine.moderate("boom", 0.5).await.unwrap_err();
    assert!(err.to_string().contains("classifier unavailable"));
}

#[tokio::test]
async fn batch_aborts_on_first_failing_item() {
    let classifier = Arc::new(TrippingClassifier::new("poison"));
    let engine = ModerationEngine::new(classifier.clone());

    let texts: Vec<String> = ["fine", "poison", "never reached", "never reached either"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let result = engine.moderate_batch(&texts, 0.5).await;
    assert!(result.is_err(), "one bad item must abort the whole batch");

    // Fail-fast: items after the failure are never classified, and the
    // failing item itself is not retried
    assert_eq!(classifier.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn single_failure_is_not_retried() {
    let classifier = Arc::new(TrippingClassifier::new("boom"));
    let engine = ModerationEngine::new(classifier.clone());

    let _ = engine.moderate("boom", 0.5).await;
    assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
}

// ============================================================
// Default sequential classify_batch preserves order
// ============================================================

#[tokio::test]
async fn default_classify_batch_matches_per_item_calls() {
    let classifier = ScriptedClassifier::new(&[("x", 0.7), ("y", 0.3)]);
    let texts: Vec<String> = ["x", "y"].iter().map(|s| s.to_string()).collect();

    let batched = classifier.classify_batch(&texts).await.unwrap();
    let single_x = classifier.classify("x").await.unwrap();
    let single_y = classifier.classify("y").await.unwrap();

    assert_eq!(batched.len(), 2);
    assert_eq!(batched[0], single_x);
    assert_eq!(batched[1], single_y);
}
