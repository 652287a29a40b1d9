use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{EvalError, Result};

pub const TRAIN_LOSS: &str = "train_loss";
pub const VAL_LOSS: &str = "val_loss";
pub const TRAIN_ACC: &str = "train_acc";
pub const VAL_ACC: &str = "val_acc";

/// Per-epoch metrics recorded by a training loop. The four series are
/// expected to have equal length but nothing enforces it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub train_loss: Vec<f64>,
    pub val_loss: Vec<f64>,
    pub train_acc: Vec<f64>,
    pub val_acc: Vec<f64>,
}

impl TrainingHistory {
    pub fn record(&mut self, train_loss: f64, val_loss: f64, train_acc: f64, val_acc: f64) {
        self.train_loss.push(train_loss);
        self.val_loss.push(val_loss);
        self.train_acc.push(train_acc);
        self.val_acc.push(val_acc);
    }

    /// Builds a history from a loosely typed key/series map, as produced by
    /// training scripts that keep their metrics in a dictionary. Extra keys
    /// are ignored.
    pub fn from_map(mut map: HashMap<String, Vec<f64>>) -> Result<Self> {
        let mut take = |key: &str| {
            map.remove(key)
                .ok_or_else(|| EvalError::MissingSeries(key.to_string()))
        };

        Ok(TrainingHistory {
            train_loss: take(TRAIN_LOSS)?,
            val_loss: take(VAL_LOSS)?,
            train_acc: take(TRAIN_ACC)?,
            val_acc: take(VAL_ACC)?,
        })
    }

    pub fn series(&self, key: &str) -> Result<&[f64]> {
        match key {
            TRAIN_LOSS => Ok(&self.train_loss),
            VAL_LOSS => Ok(&self.val_loss),
            TRAIN_ACC => Ok(&self.train_acc),
            VAL_ACC => Ok(&self.val_acc),
            other => Err(EvalError::MissingSeries(other.to_string())),
        }
    }

    /// Number of recorded epochs, taken from the training loss.
    pub fn len(&self) -> usize {
        self.train_loss.len()
    }

    pub fn is_empty(&self) -> bool {
        self.train_loss.is_empty()
    }

    /// 1-based epoch indices, `1..=len()`.
    pub fn epochs(&self) -> Vec<usize> {
        (1..=self.len()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TrainingHistory {
        let mut history = TrainingHistory::default();
        history.record(1.2, 1.3, 0.40, 0.35);
        history.record(0.8, 0.9, 0.65, 0.60);
        history.record(0.5, 0.7, 0.80, 0.72);
        history
    }

    #[test]
    fn epochs_are_one_based() {
        assert_eq!(sample().epochs(), vec![1, 2, 3]);
        assert!(TrainingHistory::default().epochs().is_empty());
    }

    #[test]
    fn series_lookup_by_key() {
        let history = sample();
        assert_eq!(history.series(VAL_ACC).unwrap(), &[0.35, 0.60, 0.72]);
        assert!(matches!(
            history.series("lr"),
            Err(EvalError::MissingSeries(key)) if key == "lr"
        ));
    }

    #[test]
    fn from_map_reports_missing_key() {
        let mut map = HashMap::new();
        map.insert(TRAIN_LOSS.to_string(), vec![1.0]);
        map.insert(VAL_LOSS.to_string(), vec![1.1]);
        map.insert(TRAIN_ACC.to_string(), vec![0.5]);

        let err = TrainingHistory::from_map(map).unwrap_err();
        assert!(matches!(err, EvalError::MissingSeries(key) if key == VAL_ACC));
    }

    #[test]
    fn from_map_ignores_extra_keys() {
        let map: HashMap<String, Vec<f64>> = [
            (TRAIN_LOSS, vec![1.0, 0.5]),
            (VAL_LOSS, vec![1.1, 0.6]),
            (TRAIN_ACC, vec![0.5, 0.7]),
            (VAL_ACC, vec![0.4, 0.6]),
            ("lr", vec![0.01, 0.005]),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let history = TrainingHistory::from_map(map).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.train_acc, vec![0.5, 0.7]);
    }

    #[test]
    fn deserializes_python_style_keys() {
        let json = r#"{"train_loss":[0.9],"val_loss":[1.0],"train_acc":[0.6],"val_acc":[0.55]}"#;
        let history: TrainingHistory = serde_json::from_str(json).unwrap();
        assert_eq!(history.val_loss, vec![1.0]);
    }
}
