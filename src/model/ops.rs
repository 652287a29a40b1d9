use ndarray::{Array1, Array2, Axis};

use crate::error::{EvalError, Result};

/// Index of the highest score in each row. Ties go to the lowest index and
/// a NaN counts as the maximum, so the first NaN in a row wins.
pub fn argmax_rows(scores: &Array2<f64>) -> Result<Array1<usize>> {
    if scores.ncols() == 0 {
        return Err(EvalError::EmptyScores);
    }

    Ok(scores.map_axis(Axis(1), |row| {
        row.iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |(best, best_score), (index, &score)| {
                if best_score.is_nan() {
                    (best, best_score)
                } else if score.is_nan() || score > best_score {
                    (index, score)
                } else {
                    (best, best_score)
                }
            })
            .0
    }))
}
