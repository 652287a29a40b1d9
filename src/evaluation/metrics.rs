//! Classification metrics over accumulated label/prediction sequences.
//!
//! Both the confusion matrix and the report index classes by the sorted
//! union of every label that occurs in either sequence, so a class that is
//! only ever predicted still gets a row.

use ndarray::Array2;
use std::fmt;

use crate::error::{EvalError, Result};

fn check_lengths(y_true: &[usize], y_pred: &[usize]) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(EvalError::LengthMismatch {
            expected: y_true.len(),
            actual: y_pred.len(),
        });
    }
    if y_true.is_empty() {
        return Err(EvalError::EmptyEvaluation);
    }
    Ok(())
}

fn unique_labels(y_true: &[usize], y_pred: &[usize]) -> Vec<usize> {
    let mut labels: Vec<usize> = y_true.iter().chain(y_pred).copied().collect();
    labels.sort_unstable();
    labels.dedup();
    labels
}

/// Counts of (true class, predicted class) pairs. Rows are true labels,
/// columns are predictions.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    pub labels: Vec<usize>,
    pub matrix: Array2<usize>,
}

impl ConfusionMatrix {
    pub fn compute(y_true: &[usize], y_pred: &[usize]) -> Result<Self> {
        check_lengths(y_true, y_pred)?;

        let labels = unique_labels(y_true, y_pred);
        let n = labels.len();
        let mut matrix = Array2::zeros((n, n));
        for (t, p) in y_true.iter().zip(y_pred) {
            // Both are present in `labels` by construction.
            let (Ok(row), Ok(col)) = (labels.binary_search(t), labels.binary_search(p)) else {
                continue;
            };
            matrix[[row, col]] += 1;
        }

        Ok(ConfusionMatrix { labels, matrix })
    }

    pub fn num_classes(&self) -> usize {
        self.labels.len()
    }

    pub fn total(&self) -> usize {
        self.matrix.sum()
    }

    /// Count for a pair of class labels; zero if either label never occurred.
    pub fn count(&self, true_label: usize, predicted: usize) -> usize {
        match (
            self.labels.binary_search(&true_label),
            self.labels.binary_search(&predicted),
        ) {
            (Ok(row), Ok(col)) => self.matrix[[row, col]],
            _ => 0,
        }
    }

    pub fn max_count(&self) -> usize {
        self.matrix.iter().copied().max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetrics {
    pub name: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class precision, recall and F1 plus accuracy and macro/weighted
/// averages. `Display` renders the usual fixed-width text table.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: AverageMetrics,
    pub weighted_avg: AverageMetrics,
}

fn ratio(numerator: usize, denominator: usize, metric: &str, class: &str) -> f64 {
    if denominator == 0 {
        tracing::warn!(
            metric,
            class,
            "{metric} is ill-defined and being set to 0.0 for a class with no samples"
        );
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

fn f1_score(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

impl ClassificationReport {
    pub fn compute<S: AsRef<str>>(
        y_true: &[usize],
        y_pred: &[usize],
        target_names: &[S],
    ) -> Result<Self> {
        let cm = ConfusionMatrix::compute(y_true, y_pred)?;
        Self::from_confusion(&cm, target_names)
    }

    pub fn from_confusion<S: AsRef<str>>(cm: &ConfusionMatrix, target_names: &[S]) -> Result<Self> {
        if cm.num_classes() != target_names.len() {
            return Err(EvalError::ClassCountMismatch {
                labels: cm.num_classes(),
                names: target_names.len(),
            });
        }

        let total = cm.total();
        if total == 0 {
            return Err(EvalError::EmptyEvaluation);
        }

        let mut classes = Vec::with_capacity(cm.num_classes());
        let mut correct = 0;
        for (i, name) in target_names.iter().enumerate() {
            let name = name.as_ref();
            let tp = cm.matrix[[i, i]];
            let predicted = cm.matrix.column(i).sum();
            let support = cm.matrix.row(i).sum();
            correct += tp;

            let precision = ratio(tp, predicted, "precision", name);
            let recall = ratio(tp, support, "recall", name);
            classes.push(ClassMetrics {
                name: name.to_string(),
                precision,
                recall,
                f1: f1_score(precision, recall),
                support,
            });
        }

        let n = classes.len() as f64;
        let macro_avg = AverageMetrics {
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / n,
            recall: classes.iter().map(|c| c.recall).sum::<f64>() / n,
            f1: classes.iter().map(|c| c.f1).sum::<f64>() / n,
            support: total,
        };

        let weight = |c: &ClassMetrics| c.support as f64 / total as f64;
        let weighted_avg = AverageMetrics {
            precision: classes.iter().map(|c| c.precision * weight(c)).sum(),
            recall: classes.iter().map(|c| c.recall * weight(c)).sum(),
            f1: classes.iter().map(|c| c.f1 * weight(c)).sum(),
            support: total,
        };

        Ok(ClassificationReport {
            classes,
            accuracy: correct as f64 / total as f64,
            macro_avg,
            weighted_avg,
        })
    }

    pub fn class(&self, name: &str) -> Option<&ClassMetrics> {
        self.classes.iter().find(|c| c.name == name)
    }
}

const DIGITS: usize = 2;
const LAST_LINE_HEADING: &str = "weighted avg";

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|c| c.name.chars().count())
            .chain([LAST_LINE_HEADING.len(), DIGITS])
            .max()
            .unwrap_or(LAST_LINE_HEADING.len());

        write!(f, "{:>width$} ", "")?;
        for header in ["precision", "recall", "f1-score", "support"] {
            write!(f, " {header:>9}")?;
        }
        writeln!(f)?;
        writeln!(f)?;

        let row = |f: &mut fmt::Formatter<'_>,
                   heading: &str,
                   p: f64,
                   r: f64,
                   f1: f64,
                   support: usize| {
            writeln!(
                f,
                "{heading:>width$}  {p:>9.DIGITS$} {r:>9.DIGITS$} {f1:>9.DIGITS$} {support:>9}"
            )
        };

        for c in &self.classes {
            row(f, &c.name, c.precision, c.recall, c.f1, c.support)?;
        }
        writeln!(f)?;

        let total = self.macro_avg.support;
        writeln!(
            f,
            "{:>width$}  {:>9} {:>9} {:>9.DIGITS$} {:>9}",
            "accuracy", "", "", self.accuracy, total
        )?;
        let m = &self.macro_avg;
        row(f, "macro avg", m.precision, m.recall, m.f1, m.support)?;
        let w = &self.weighted_avg;
        row(f, LAST_LINE_HEADING, w.precision, w.recall, w.f1, w.support)
    }
}
