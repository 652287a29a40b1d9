pub mod classifier;
pub mod grad;
pub mod ops;

pub use classifier::{Classifier, Cpu, Device};
pub use grad::{NoGradGuard, is_grad_enabled, no_grad};
