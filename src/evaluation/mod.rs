pub mod evaluator;
pub mod latency;
pub mod metrics;

pub use evaluator::{Evaluation, Predictions, collect_predictions, evaluate_model};
pub use latency::{LatencyStats, benchmark_inference, measure_inference};
pub use metrics::{ClassificationReport, ConfusionMatrix};
