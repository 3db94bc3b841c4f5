use std::fmt;

use serde::{Deserialize, Serialize};

use crate::history::{count_lr_changes, StepRecord};

/// Summary of a run, computed from its history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub steps: usize,
    /// Accuracy of the last step that reported one
    pub final_accuracy: Option<f64>,
    /// Number of steps where the learning rate actually changed
    pub lr_changes: usize,
    /// Percent loss reduction relative to the first step
    pub improvement: Option<f64>,
    pub initial_loss: Option<f64>,
    pub final_loss: Option<f64>,
    pub initial_lr: f64,
    pub final_lr: f64,
}

impl Stats {
    pub fn from_history(history: &[StepRecord], initial_lr: f64) -> Self {
        let first = history.first();
        let last = history.last();

        let improvement = match (first, last) {
            (Some(first), Some(last)) if first.loss.abs() > 1e-12 => {
                Some((first.loss - last.loss) / first.loss.abs() * 100.0)
            }
            _ => None,
        };

        Stats {
            steps: history.len(),
            final_accuracy: history.iter().rev().find_map(|r| r.accuracy),
            lr_changes: count_lr_changes(history, initial_lr),
            improvement,
            initial_loss: first.map(|r| r.loss),
            final_loss: last.map(|r| r.loss),
            initial_lr,
            final_lr: last.map(|r| r.learning_rate).unwrap_or(initial_lr),
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "steps={} lr_changes={}", self.steps, self.lr_changes)?;
        if let Some(improvement) = self.improvement {
            write!(f, " improvement={:.2}%", improvement)?;
        }
        if let Some(accuracy) = self.final_accuracy {
            write!(f, " final_accuracy={:.2}", accuracy)?;
        }
        write!(f, " lr={:.5e} -> {:.5e}", self.initial_lr, self.final_lr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::Decision;

    fn record(step: usize, loss: f64, accuracy: Option<f64>, learning_rate: f64) -> StepRecord {
        StepRecord {
            step,
            loss,
            accuracy,
            learning_rate,
            delta: None,
            decision: Decision::Hold,
        }
    }

    #[test]
    fn test_empty_history() {
        let stats = Stats::from_history(&[], 0.01);

        assert_eq!(stats.steps, 0);
        assert_eq!(stats.lr_changes, 0);
        assert_eq!(stats.improvement, None);
        assert_eq!(stats.final_accuracy, None);
        assert_eq!(stats.final_lr, 0.01);
    }

    #[test]
    fn test_improvement_and_final_accuracy() {
        let history = vec![
            record(0, 2.0, Some(40.0), 0.01),
            record(1, 1.0, Some(70.0), 0.012),
            record(2, 0.5, None, 0.012),
        ];
        let stats = Stats::from_history(&history, 0.01);

        assert_eq!(stats.steps, 3);
        assert_eq!(stats.lr_changes, 1);
        assert!((stats.improvement.unwrap() - 75.0).abs() < 1e-9);
        assert_eq!(stats.final_accuracy, Some(70.0));
        assert_eq!(stats.final_lr, 0.012);
    }

    #[test]
    fn test_display() {
        let history = vec![record(0, 1.0, None, 0.001)];
        let rendered = Stats::from_history(&history, 0.001).to_string();

        assert!(rendered.contains("steps=1"));
        assert!(rendered.contains("improvement=0.00%"));
    }
}
