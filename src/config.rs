use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Figure sizes in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    pub curves_size: (u32, u32),
    pub heatmap_size: (u32, u32),
}

impl Default for PlotOptions {
    fn default() -> Self {
        PlotOptions {
            curves_size: (1200, 500),
            heatmap_size: (1200, 1000),
        }
    }
}

/// Options for [`evaluate_model`](crate::evaluation::evaluator::evaluate_model).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalOptions {
    pub confusion_matrix_path: PathBuf,
    pub plot: PlotOptions,
}

impl Default for EvalOptions {
    fn default() -> Self {
        EvalOptions {
            confusion_matrix_path: PathBuf::from("confusion_matrix.png"),
            plot: PlotOptions::default(),
        }
    }
}
