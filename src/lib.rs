//! Post-training evaluation for classification models.
//!
//! - [`plot_curves`] draws train/validation loss and accuracy per epoch.
//! - [`evaluate_model`] runs a held-out set through the model, prints a
//!   per-class precision/recall/F1 report and renders a confusion matrix.
//! - [`measure_inference`] reports mean single-sample forward latency.
//!
//! The model, loader and device are supplied by the caller through the
//! [`Classifier`] and [`Device`] traits and an iterator of [`Batch`]es.

pub mod config;
pub mod data;
pub mod error;
pub mod evaluation;
pub mod model;
pub mod training;
pub mod utils;

pub use config::{EvalOptions, PlotOptions};
pub use data::Batch;
pub use error::{EvalError, Result};
pub use evaluation::{ClassificationReport, ConfusionMatrix, evaluate_model, measure_inference};
pub use model::{Classifier, Cpu, Device, no_grad};
pub use training::TrainingHistory;
pub use utils::plot::plot_curves;
