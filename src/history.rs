use serde::{Deserialize, Serialize};

/// What the controller did to the learning rate at a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Increase,
    Decrease,
    Hold,
}

/// One observation and the learning rate in effect after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: usize,
    pub loss: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    pub learning_rate: f64,
    /// `None` on the first step, where there is nothing to compare against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
    pub decision: Decision,
}

/// The trailing `window` records of a history.
pub fn window(history: &[StepRecord], window: usize) -> &[StepRecord] {
    let start = history.len().saturating_sub(window);
    &history[start..]
}

/// Number of steps whose learning rate differs from the one before it.
pub fn count_lr_changes(history: &[StepRecord], initial_lr: f64) -> usize {
    let mut previous = initial_lr;
    let mut changes = 0;
    for record in history {
        if record.learning_rate != previous {
            changes += 1;
        }
        previous = record.learning_rate;
    }
    changes
}
