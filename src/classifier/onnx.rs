// Local ONNX classifier running the toxic-bert model.
//
// This backend runs entirely on the local CPU — no API calls, no rate
// limits, no network dependency. toxic-bert is a multi-label BERT
// classifier: six toxicity categories, each with an independent sigmoid
// score.
//
// Model: Xenova/toxic-bert (quantized ONNX export, ~110MB)

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::debug;

use super::traits::{ClassifierUnavailable, LabelScore, TextClassifier};

/// Labels output by toxic-bert, in the order the model returns them.
const LABEL_ORDER: [&str; 6] = [
    "toxic",
    "severe_toxic",
    "obscene",
    "threat",
    "insult",
    "identity_hate",
];

/// Local ONNX-based classifier. Holds the model session and tokenizer
/// behind Arc<Mutex> so inference can be offloaded to spawn_blocking
/// without blocking the async runtime.
pub struct OnnxClassifier {
    // Arc+Mutex because:
    // 1. ort::Session::run takes &mut self, so we need interior mutability
    // 2. spawn_blocking requires 'static, so we need Arc for shared ownership
    // 3. We need Send+Sync for the TextClassifier trait
    // Inference is CPU-bound and serialized through spawn_blocking, so
    // contention is minimal.
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
}

impl OnnxClassifier {
    /// Load the ONNX model and tokenizer from the given directory.
    ///
    /// Expects `model_quantized.onnx` and `tokenizer.json` to exist in
    /// `model_dir`. Call `download::download_model()` first if they don't.
    /// Loading happens once at startup, before any request is served.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join("model_quantized.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        if !model_path.exists() {
            anyhow::bail!(
                "Model file not found: {}\nRun `palisade download-model` to download it.",
                model_path.display()
            );
        }
        if !tokenizer_path.exists() {
            anyhow::bail!(
                "Tokenizer file not found: {}\nRun `palisade download-model` to download it.",
                tokenizer_path.display()
            );
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;

        debug!("Loaded ONNX toxic-bert model from {}", model_dir.display());

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
        })
    }
}

#[async_trait]
impl TextClassifier for OnnxClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, ClassifierUnavailable> {
        let mut results = self.classify_batch(&[text.to_string()]).await?;
        Ok(results.remove(0))
    }

    /// True batch inference: tokenize all texts, run one forward pass,
    /// apply sigmoid to the logits, and map each output row to its label
    /// set. Row order matches input order.
    ///
    /// The CPU-bound tokenization and inference are offloaded to
    /// spawn_blocking so they don't block the tokio async runtime.
    async fn classify_batch(
        &self,
        texts: &[String],
    ) -> Result<Vec<Vec<LabelScore>>, ClassifierUnavailable> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        // Clone Arc handles for the spawn_blocking closure ('static requirement)
        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || {
            let encodings: Vec<_> = texts
                .iter()
                .map(|t| {
                    tokenizer.encode(t.as_str(), true).map_err(|e| {
                        ClassifierUnavailable::new(format!("tokenization failed: {e}"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let batch_size = encodings.len();
            let max_len = encodings
                .iter()
                .map(|e| e.get_ids().len())
                .max()
                .unwrap_or(0);

            // Build flat input tensors with right-padding to max_len.
            // Shape: [batch_size, max_len]
            let mut input_ids_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);
            let mut attention_mask_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);

            for enc in &encodings {
                let ids = enc.get_ids();
                let mask = enc.get_attention_mask();
                let seq_len = ids.len();

                for &id in ids {
                    input_ids_flat.push(id as i64);
                }
                for &m in mask {
                    attention_mask_flat.push(m as i64);
                }

                // Pad to max_len (pad_id = 0 for BERT)
                for _ in seq_len..max_len {
                    input_ids_flat.push(0);
                    attention_mask_flat.push(0);
                }
            }

            // Single-segment input: token_type_ids are all zero
            let token_type_ids_flat: Vec<i64> = vec![0; batch_size * max_len];

            let shape = [batch_size as i64, max_len as i64];

            let input_ids_tensor = Tensor::from_array((shape, input_ids_flat))
                .map_err(|e| ClassifierUnavailable::new(format!("bad input_ids tensor: {e}")))?;
            let attention_mask_tensor = Tensor::from_array((shape, attention_mask_flat))
                .map_err(|e| {
                    ClassifierUnavailable::new(format!("bad attention_mask tensor: {e}"))
                })?;
            let token_type_ids_tensor = Tensor::from_array((shape, token_type_ids_flat))
                .map_err(|e| {
                    ClassifierUnavailable::new(format!("bad token_type_ids tensor: {e}"))
                })?;

            let logits_data = {
                let mut session = session.lock().map_err(|e| {
                    ClassifierUnavailable::new(format!("session lock poisoned: {e}"))
                })?;

                let outputs = session
                    .run(ort::inputs! {
                        "input_ids" => input_ids_tensor,
                        "attention_mask" => attention_mask_tensor,
                        "token_type_ids" => token_type_ids_tensor
                    })
                    .map_err(|e| {
                        ClassifierUnavailable::new(format!("ONNX inference failed: {e}"))
                    })?;

                // Output shape: [batch_size, 6] — raw logits (pre-sigmoid)
                let (_out_shape, data) = outputs[0].try_extract_tensor::<f32>().map_err(|e| {
                    ClassifierUnavailable::new(format!("failed to extract output tensor: {e}"))
                })?;

                data.to_vec()
            };

            let mut results = Vec::with_capacity(batch_size);
            for (i, text) in texts.iter().enumerate() {
                let offset = i * LABEL_ORDER.len();
                let row = &logits_data[offset..offset + LABEL_ORDER.len()];

                let scores: Vec<f64> = row.iter().map(|&logit| sigmoid(logit as f64)).collect();
                let labels = scores_to_labels(&scores);

                debug!(
                    toxic = labels[0].score,
                    text_preview = %crate::output::truncate_chars(text, 50),
                    "ONNX classified text"
                );

                results.push(labels);
            }

            Ok(results)
        })
        .await
        .map_err(|e| ClassifierUnavailable::new(format!("spawn_blocking panicked: {e}")))?
    }
}

/// Sigmoid activation: maps any real number to (0, 1).
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Pair one row of sigmoid scores with the model's label names.
fn scores_to_labels(scores: &[f64]) -> Vec<LabelScore> {
    LABEL_ORDER
        .iter()
        .zip(scores)
        .map(|(label, &score)| LabelScore::new(*label, score))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_zero() {
        let result = sigmoid(0.0);
        assert!((result - 0.5).abs() < 1e-10, "sigmoid(0) should be 0.5");
    }

    #[test]
    fn test_sigmoid_large_positive() {
        let result = sigmoid(10.0);
        assert!(result > 0.999, "sigmoid(10) should be very close to 1.0");
    }

    #[test]
    fn test_sigmoid_large_negative() {
        let result = sigmoid(-10.0);
        assert!(result < 0.001, "sigmoid(-10) should be very close to 0.0");
    }

    #[test]
    fn test_sigmoid_symmetry() {
        // sigmoid(x) + sigmoid(-x) = 1.0
        for x in [0.5, 1.0, 2.0, 5.0] {
            let sum = sigmoid(x) + sigmoid(-x);
            assert!(
                (sum - 1.0).abs() < 1e-10,
                "sigmoid({x}) + sigmoid(-{x}) should equal 1.0"
            );
        }
    }

    #[test]
    fn test_scores_to_labels_preserves_model_order() {
        let scores = vec![0.9, 0.1, 0.8, 0.05, 0.7, 0.3];
        let labels = scores_to_labels(&scores);

        assert_eq!(labels.len(), 6);
        assert_eq!(labels[0], LabelScore::new("toxic", 0.9));
        assert_eq!(labels[1], LabelScore::new("severe_toxic", 0.1));
        assert_eq!(labels[3], LabelScore::new("threat", 0.05));
        assert_eq!(labels[5], LabelScore::new("identity_hate", 0.3));
    }

    #[test]
    fn test_label_order_count() {
        assert_eq!(LABEL_ORDER.len(), 6, "toxic-bert outputs 6 categories");
    }

    #[test]
    fn test_two_labels_mention_toxic() {
        // toxic-bert reports both "toxic" and "severe_toxic" — the verdict
        // derivation takes the max over them rather than relying on order
        let matching = LABEL_ORDER
            .iter()
            .filter(|l| l.to_lowercase().contains("toxic"))
            .count();
        assert_eq!(matching, 2);
    }
}
