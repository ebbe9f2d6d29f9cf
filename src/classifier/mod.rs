// Text classification — trait-based abstraction for swappable backends.
//
// The TextClassifier trait defines the interface. OnnxClassifier runs the
// toxic-bert model on the local CPU (default); RemoteClassifier calls a
// hosted text-classification endpoint. The moderation engine only ever
// sees the trait, so backends can be swapped without touching it.

pub mod download;
pub mod onnx;
pub mod pacer;
pub mod remote;
pub mod traits;
