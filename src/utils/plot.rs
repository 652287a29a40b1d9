use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

use crate::config::PlotOptions;
use crate::error::{EvalError, Result};
use crate::evaluation::metrics::ConfusionMatrix;
use crate::training::history::{TRAIN_ACC, TRAIN_LOSS, TrainingHistory, VAL_ACC, VAL_LOSS};

const TRAIN_COLOR: RGBColor = RGBColor(31, 119, 180);
const VAL_COLOR: RGBColor = RGBColor(255, 127, 14);

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: &'static str,
    pub color: RGBColor,
    /// `(epoch, value)` with 1-based epochs.
    pub points: Vec<(usize, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurvePanel {
    pub title: &'static str,
    pub y_desc: &'static str,
    pub train: Series,
    pub val: Series,
}

impl CurvePanel {
    /// Last epoch shown on the x axis. At least 2 so the range is never empty.
    pub fn max_epoch(&self) -> usize {
        self.train
            .points
            .iter()
            .chain(&self.val.points)
            .map(|&(epoch, _)| epoch)
            .max()
            .unwrap_or(1)
            .max(2)
    }

    pub fn value_range(&self) -> (f64, f64) {
        let (min, max) = self
            .train
            .points
            .iter()
            .chain(&self.val.points)
            .map(|&(_, v)| v)
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

        if min > max {
            return (0.0, 1.0);
        }
        let pad = if max > min { (max - min) * 0.05 } else { 0.5 };
        (min - pad, max + pad)
    }
}

fn epoch_points(values: &[f64]) -> Vec<(usize, f64)> {
    values.iter().enumerate().map(|(i, &v)| (i + 1, v)).collect()
}

/// Loss and accuracy panels, in drawing order. Each series is paired with
/// its own 1-based epoch indices, so unequal lengths are drawn as they are.
pub fn curve_panels(history: &TrainingHistory) -> Result<[CurvePanel; 2]> {
    let series = |key: &str, label: &'static str, color: RGBColor| -> Result<Series> {
        Ok(Series {
            label,
            color,
            points: epoch_points(history.series(key)?),
        })
    };

    Ok([
        CurvePanel {
            title: "Loss during training",
            y_desc: "Loss",
            train: series(TRAIN_LOSS, "Train Loss", TRAIN_COLOR)?,
            val: series(VAL_LOSS, "Val Loss", VAL_COLOR)?,
        },
        CurvePanel {
            title: "Accuracy during training",
            y_desc: "Accuracy",
            train: series(TRAIN_ACC, "Train Acc", TRAIN_COLOR)?,
            val: series(VAL_ACC, "Val Acc", VAL_COLOR)?,
        },
    ])
}

fn draw_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, panel: &CurvePanel) -> Result<()> {
    let (y_min, y_max) = panel.value_range();

    let mut chart = ChartBuilder::on(area)
        .caption(panel.title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(1usize..panel.max_epoch(), y_min..y_max)
        .map_err(EvalError::plot)?;

    chart
        .configure_mesh()
        .x_desc("Epochs")
        .y_desc(panel.y_desc)
        .draw()
        .map_err(EvalError::plot)?;

    for series in [&panel.train, &panel.val] {
        let color = series.color;
        chart
            .draw_series(LineSeries::new(series.points.iter().copied(), &color))
            .map_err(EvalError::plot)?
            .label(series.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(EvalError::plot)?;

    Ok(())
}

pub fn draw_curves<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    history: &TrainingHistory,
) -> Result<()> {
    let panels = curve_panels(history)?;
    root.fill(&WHITE).map_err(EvalError::plot)?;

    let areas = root.split_evenly((1, 2));
    for (area, panel) in areas.iter().zip(&panels) {
        draw_panel(area, panel)?;
    }
    Ok(())
}

/// Renders train/validation loss and accuracy side by side and writes the
/// figure to `path` as PNG.
pub fn plot_curves(history: &TrainingHistory, path: &Path, options: &PlotOptions) -> Result<()> {
    let root = BitMapBackend::new(path, options.curves_size).into_drawing_area();
    draw_curves(&root, history)?;
    root.present().map_err(EvalError::plot)?;

    info!(epochs = history.len(), path = %path.display(), "learning curves written");
    Ok(())
}

/// Sequential white-to-blue colormap, `t` in `[0, 1]`.
pub fn blues(t: f64) -> RGBColor {
    const LIGHT: (f64, f64, f64) = (247.0, 251.0, 255.0);
    const DARK: (f64, f64, f64) = (8.0, 48.0, 107.0);

    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    RGBColor(lerp(LIGHT.0, DARK.0), lerp(LIGHT.1, DARK.1), lerp(LIGHT.2, DARK.2))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapCell {
    pub row: usize,
    pub col: usize,
    pub count: usize,
    pub color: RGBColor,
}

impl HeatmapCell {
    /// Cell corners in chart coordinates, where cell centres sit on integer
    /// positions and row 0 is drawn at the top.
    pub fn bounds(&self, n: usize) -> [(f64, f64); 2] {
        let x = self.col as f64;
        let y = (n - 1 - self.row) as f64;
        [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)]
    }
}

/// One cell per matrix entry, shaded by count relative to the largest count.
pub fn heatmap_cells(cm: &ConfusionMatrix) -> Vec<HeatmapCell> {
    let max = cm.max_count().max(1) as f64;
    cm.matrix
        .indexed_iter()
        .map(|((row, col), &count)| HeatmapCell {
            row,
            col,
            count,
            color: blues(count as f64 / max),
        })
        .collect()
}

fn tick_name<S: AsRef<str>>(names: &[S], position: f64) -> Option<&str> {
    let rounded = position.round();
    if (position - rounded).abs() > 1e-6 || rounded < 0.0 {
        return None;
    }
    names.get(rounded as usize).map(|name| name.as_ref())
}

pub fn draw_confusion_matrix<DB: DrawingBackend, S: AsRef<str>>(
    root: &DrawingArea<DB, Shift>,
    cm: &ConfusionMatrix,
    class_names: &[S],
) -> Result<()> {
    root.fill(&WHITE).map_err(EvalError::plot)?;

    let n = cm.num_classes();
    let extent = n as f64 - 0.5;
    let mut chart = ChartBuilder::on(root)
        .caption("Confusion Matrix", ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(80)
        .y_label_area_size(140)
        .build_cartesian_2d(-0.5f64..extent, -0.5f64..extent)
        .map_err(EvalError::plot)?;

    let x_label = |v: &f64| tick_name(class_names, *v).unwrap_or_default().to_string();
    let y_label = |v: &f64| {
        tick_name(class_names, n as f64 - 1.0 - *v)
            .unwrap_or_default()
            .to_string()
    };

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n)
        .y_labels(n)
        .x_label_formatter(&x_label)
        .y_label_formatter(&y_label)
        .x_desc("Predicted")
        .y_desc("True label")
        .draw()
        .map_err(EvalError::plot)?;

    chart
        .draw_series(
            heatmap_cells(cm)
                .into_iter()
                .map(|cell| Rectangle::new(cell.bounds(n), cell.color.filled())),
        )
        .map_err(EvalError::plot)?;

    Ok(())
}

/// Renders the confusion matrix as a heatmap (predicted on x, true label on
/// y) and writes it to `path` as PNG.
pub fn plot_confusion_matrix<S: AsRef<str>>(
    cm: &ConfusionMatrix,
    class_names: &[S],
    path: &Path,
    options: &PlotOptions,
) -> Result<()> {
    let root = BitMapBackend::new(path, options.heatmap_size).into_drawing_area();
    draw_confusion_matrix(&root, cm, class_names)?;
    root.present().map_err(EvalError::plot)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(epochs: usize) -> TrainingHistory {
        let mut history = TrainingHistory::default();
        for e in 0..epochs {
            let e = e as f64;
            history.record(1.0 / (e + 1.0), 1.2 / (e + 1.0), 0.5 + e * 0.05, 0.45 + e * 0.04);
        }
        history
    }

    #[test]
    fn curves_use_one_based_epochs() {
        let [loss, acc] = curve_panels(&history(5)).unwrap();
        let epochs: Vec<usize> = loss.train.points.iter().map(|&(e, _)| e).collect();
        assert_eq!(epochs, vec![1, 2, 3, 4, 5]);
        assert_eq!(acc.val.points.first().map(|p| p.0), Some(1));
        assert_eq!(acc.val.points.last().map(|p| p.0), Some(5));
        assert_eq!(loss.max_epoch(), 5);
    }

    #[test]
    fn panels_pair_train_with_validation() {
        let [loss, acc] = curve_panels(&history(2)).unwrap();
        assert_eq!((loss.train.label, loss.val.label), ("Train Loss", "Val Loss"));
        assert_eq!((acc.train.label, acc.val.label), ("Train Acc", "Val Acc"));
        assert_eq!(loss.y_desc, "Loss");
        assert_eq!(acc.y_desc, "Accuracy");
        assert_eq!(acc.train.points[1], (2, 0.5 + 1.0 * 0.05));
    }

    #[test]
    fn unequal_series_keep_their_own_length() {
        let mut h = history(3);
        h.val_loss.pop();
        let [loss, _] = curve_panels(&h).unwrap();
        assert_eq!(loss.train.points.len(), 3);
        assert_eq!(loss.val.points.len(), 2);
    }

    #[test]
    fn value_range_pads_and_handles_degenerate_input() {
        let [loss, _] = curve_panels(&history(1)).unwrap();
        let (lo, hi) = loss.value_range();
        assert!(lo < 1.0 && hi > 1.2);

        let [empty, _] = curve_panels(&TrainingHistory::default()).unwrap();
        assert_eq!(empty.value_range(), (0.0, 1.0));
        assert_eq!(empty.max_epoch(), 2);
    }

    #[test]
    fn writes_learning_curves_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curves.png");

        plot_curves(&history(4), &path, &PlotOptions::default()).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn writes_confusion_heatmap_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cm.png");
        let cm = ConfusionMatrix::compute(&[0, 1, 1, 2], &[0, 1, 2, 2]).unwrap();

        plot_confusion_matrix(&cm, &["cat", "dog", "bird"], &path, &PlotOptions::default())
            .unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn colormap_endpoints() {
        assert_eq!(blues(0.0), RGBColor(247, 251, 255));
        assert_eq!(blues(1.0), RGBColor(8, 48, 107));
        assert_eq!(blues(7.0), blues(1.0));
    }

    #[test]
    fn heatmap_cells_place_first_row_on_top() {
        let cm = ConfusionMatrix::compute(&[0, 0, 1, 1], &[0, 0, 1, 0]).unwrap();
        let cells = heatmap_cells(&cm);
        assert_eq!(cells.len(), 4);

        let top_left = cells.iter().find(|c| c.row == 0 && c.col == 0).unwrap();
        assert_eq!(top_left.count, 2);
        assert_eq!(top_left.color, blues(1.0));
        assert_eq!(top_left.bounds(2), [(-0.5, 0.5), (0.5, 1.5)]);

        let off = cells.iter().find(|c| c.row == 0 && c.col == 1).unwrap();
        assert_eq!(off.color, blues(0.0));
        let bottom_left = cells.iter().find(|c| c.row == 1 && c.col == 0).unwrap();
        assert_eq!(bottom_left.bounds(2), [(-0.5, -0.5), (0.5, 0.5)]);
    }

    #[test]
    fn tick_names_only_at_cell_centres() {
        let names = ["cat", "dog", "bird"];
        assert_eq!(tick_name(&names, 0.0), Some("cat"));
        assert_eq!(tick_name(&names, 2.0), Some("bird"));
        assert_eq!(tick_name(&names, 0.5), None);
        assert_eq!(tick_name(&names, 3.0), None);
        assert_eq!(tick_name(&names, -1.0), None);
    }
}
