use ndarray::{Array, Array2, Dimension};

use crate::error::Result;

/// A trained classifier evaluated by this crate. The caller owns it and is
/// expected to have placed it on the device it passes alongside.
pub trait Classifier {
    /// Switch to evaluation mode (dropout and other training-only behaviour off).
    fn eval(&mut self);

    fn is_eval(&self) -> bool;

    /// Scores for a `batch x features` input, shaped `batch x classes`.
    fn forward(&self, inputs: &Array2<f64>) -> Result<Array2<f64>>;
}

/// Where arrays must reside before they are handed to the model.
pub trait Device {
    fn name(&self) -> &str;

    fn to_device<A: Clone, D: Dimension>(&self, array: Array<A, D>) -> Array<A, D>;

    fn to_host<A: Clone, D: Dimension>(&self, array: Array<A, D>) -> Array<A, D>;
}

/// Host memory. Transfers are no-ops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cpu;

impl Device for Cpu {
    fn name(&self) -> &str {
        "cpu"
    }

    fn to_device<A: Clone, D: Dimension>(&self, array: Array<A, D>) -> Array<A, D> {
        array
    }

    fn to_host<A: Clone, D: Dimension>(&self, array: Array<A, D>) -> Array<A, D> {
        array
    }
}

impl<C: Classifier + ?Sized> Classifier for &mut C {
    fn eval(&mut self) {
        (**self).eval()
    }

    fn is_eval(&self) -> bool {
        (**self).is_eval()
    }

    fn forward(&self, inputs: &Array2<f64>) -> Result<Array2<f64>> {
        (**self).forward(inputs)
    }
}
