use tracing::{debug, info};

use crate::config::EvalOptions;
use crate::data::Batch;
use crate::error::{EvalError, Result};
use crate::evaluation::metrics::{ClassificationReport, ConfusionMatrix};
use crate::model::ops::argmax_rows;
use crate::model::{Classifier, Device, no_grad};
use crate::utils::plot::plot_confusion_matrix;

/// Labels and predictions accumulated over one pass, in encounter order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predictions {
    pub labels: Vec<usize>,
    pub predicted: Vec<usize>,
}

impl Predictions {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub predictions: Predictions,
    pub report: ClassificationReport,
    pub confusion: ConfusionMatrix,
}

/// Runs the model over every batch with gradient tracking off and collects
/// the arg-max prediction for each sample next to its true label.
pub fn collect_predictions<M, I, D>(model: &mut M, batches: I, device: &D) -> Result<Predictions>
where
    M: Classifier + ?Sized,
    I: IntoIterator<Item = Batch>,
    D: Device,
{
    model.eval();
    let _no_grad = no_grad();

    let mut predictions = Predictions::default();
    for (index, batch) in batches.into_iter().enumerate() {
        let inputs = device.to_device(batch.inputs);
        let labels = device.to_device(batch.labels);

        let scores = model.forward(&inputs)?;
        let predicted = argmax_rows(&scores)?;
        if predicted.len() != labels.len() {
            return Err(EvalError::LengthMismatch {
                expected: labels.len(),
                actual: predicted.len(),
            });
        }

        debug!(batch = index, samples = labels.len(), "evaluated batch");
        predictions.predicted.extend(device.to_host(predicted).iter().copied());
        predictions.labels.extend(device.to_host(labels).iter().copied());
    }

    info!(samples = predictions.len(), device = device.name(), "evaluation pass complete");
    Ok(predictions)
}

/// Evaluates `model` on a held-out set: prints a per-class classification
/// report and renders the confusion matrix as a heatmap to
/// `options.confusion_matrix_path`.
///
/// `class_names` must be ordered like the model's output indices. Only its
/// length is checked against the labels that occur.
pub fn evaluate_model<M, I, D, S>(
    model: &mut M,
    batches: I,
    class_names: &[S],
    device: &D,
    options: &EvalOptions,
) -> Result<Evaluation>
where
    M: Classifier + ?Sized,
    I: IntoIterator<Item = Batch>,
    D: Device,
    S: AsRef<str>,
{
    let predictions = collect_predictions(model, batches, device)?;

    let confusion = ConfusionMatrix::compute(&predictions.labels, &predictions.predicted)?;
    let report = ClassificationReport::from_confusion(&confusion, class_names)?;

    println!("Classification Report:");
    println!("{report}");

    plot_confusion_matrix(
        &confusion,
        class_names,
        &options.confusion_matrix_path,
        &options.plot,
    )?;
    info!(path = %options.confusion_matrix_path.display(), "confusion matrix written");

    Ok(Evaluation {
        predictions,
        report,
        confusion,
    })
}
