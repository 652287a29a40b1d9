//! Single-sample inference latency.
//!
//! Only the first sample of every batch is timed, one forward call each, so
//! the figure is per-sample latency at batch size 1 rather than throughput.

use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::data::Batch;
use crate::error::{EvalError, Result};
use crate::model::{Classifier, Device, no_grad};

/// Wall-clock duration of each timed forward call, in batch order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatencyStats {
    pub samples: Vec<Duration>,
}

impl LatencyStats {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Arithmetic mean in seconds. An empty run has no mean.
    pub fn mean(&self) -> Result<f64> {
        if self.samples.is_empty() {
            return Err(EvalError::NoTimingSamples);
        }
        let total: f64 = self.samples.iter().map(Duration::as_secs_f64).sum();
        Ok(total / self.samples.len() as f64)
    }
}

pub fn benchmark_inference<M, I, D>(model: &mut M, batches: I, device: &D) -> Result<LatencyStats>
where
    M: Classifier + ?Sized,
    I: IntoIterator<Item = Batch>,
    D: Device,
{
    model.eval();
    let _no_grad = no_grad();

    let mut stats = LatencyStats::default();
    for (index, batch) in batches.into_iter().enumerate() {
        let sample = batch
            .first_sample()
            .ok_or(EvalError::EmptyBatch { index })?;
        let sample = device.to_device(sample);

        let start = Instant::now();
        model.forward(&sample)?;
        let elapsed = start.elapsed();

        debug!(batch = index, elapsed_us = elapsed.as_micros() as u64, "timed forward");
        stats.samples.push(elapsed);
    }

    info!(samples = stats.len(), device = device.name(), "latency benchmark complete");
    Ok(stats)
}

/// Times one forward pass per batch and returns the mean in seconds, after
/// printing it in milliseconds. Fails with [`EvalError::NoTimingSamples`]
/// when `batches` yields nothing.
pub fn measure_inference<M, I, D>(model: &mut M, batches: I, device: &D) -> Result<f64>
where
    M: Classifier + ?Sized,
    I: IntoIterator<Item = Batch>,
    D: Device,
{
    let mean = benchmark_inference(model, batches, device)?.mean()?;
    println!("Average inference time per sample: {:.3} ms", mean * 1000.0);
    Ok(mean)
}
