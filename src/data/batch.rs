use ndarray::{Array1, Array2, s};

/// One step of an evaluation loader: a `batch x features` input matrix and
/// the matching class indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub inputs: Array2<f64>,
    pub labels: Array1<usize>,
}

impl Batch {
    pub fn new(inputs: Array2<f64>, labels: Array1<usize>) -> Self {
        Batch { inputs, labels }
    }

    pub fn len(&self) -> usize {
        self.inputs.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.nrows() == 0
    }

    /// The first sample as a `1 x features` matrix, or `None` for an empty batch.
    pub fn first_sample(&self) -> Option<Array2<f64>> {
        if self.is_empty() {
            return None;
        }
        Some(self.inputs.slice(s![0..1, ..]).to_owned())
    }
}

impl From<(Array2<f64>, Array1<usize>)> for Batch {
    fn from((inputs, labels): (Array2<f64>, Array1<usize>)) -> Self {
        Batch::new(inputs, labels)
    }
}
