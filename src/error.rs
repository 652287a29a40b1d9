use thiserror::Error;

pub type Result<T> = std::result::Result<T, EvalError>;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("history has no series named `{0}`")]
    MissingSeries(String),

    #[error("no samples to evaluate")]
    EmptyEvaluation,

    #[error("length mismatch: {expected} labels vs {actual} predictions")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("number of classes, {labels}, does not match size of target_names, {names}")]
    ClassCountMismatch { labels: usize, names: usize },

    #[error("score matrix has no class columns")]
    EmptyScores,

    #[error("batch {index} contains no samples")]
    EmptyBatch { index: usize },

    #[error("no timing samples recorded, cannot compute a mean")]
    NoTimingSamples,

    #[error("forward pass failed: {0}")]
    Forward(String),

    #[error("plotting failed: {0}")]
    Plot(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

impl EvalError {
    pub(crate) fn plot(err: impl std::fmt::Display) -> Self {
        EvalError::Plot(err.to_string())
    }
}
