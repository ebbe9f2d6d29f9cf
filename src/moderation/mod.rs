// Moderation — verdict derivation and batch aggregation over a classifier.
//
// The engine owns the decision policy; the classifier only reports label
// scores. Verdict and BatchStats are pure data derived per call.

pub mod engine;
pub mod verdict;
