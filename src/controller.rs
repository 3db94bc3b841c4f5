use crate::config::DeltaConfig;
use crate::error::{Error, Result};
use crate::history::{self, Decision, StepRecord};
use crate::signal;
use crate::stats::Stats;

/// Decides, step by step, whether the learning rate goes up, down, or stays.
///
/// The controller owns the full history of observations. It does not touch
/// any optimizer; see [`DeltaOptimizer`](crate::DeltaOptimizer) for that.
#[derive(Debug, Clone)]
pub struct RateController {
    config: DeltaConfig,
    learning_rate: f64,
    history: Vec<StepRecord>,
    lr_changes: usize,
}

impl RateController {
    pub fn new(config: DeltaConfig) -> Result<Self> {
        config.validate()?;
        Ok(RateController {
            learning_rate: config.initial_lr,
            config,
            history: Vec::new(),
            lr_changes: 0,
        })
    }

    /// Record a new observation and adjust the learning rate.
    ///
    /// A non-finite loss or an out-of-range accuracy is rejected and leaves
    /// the controller untouched.
    pub fn observe(&mut self, loss: f64, accuracy: Option<f64>) -> Result<StepRecord> {
        if !loss.is_finite() {
            return Err(Error::NonFiniteLoss(loss));
        }
        if let Some(accuracy) = accuracy {
            if !self.config.accuracy_unit.contains(accuracy) {
                return Err(Error::InvalidAccuracy(accuracy));
            }
        }

        let window = history::window(&self.history, self.config.window);
        let delta = signal::compute(&self.config, self.history.first(), window, loss, accuracy);
        let decision = self.decide(delta);

        let proposed = match decision {
            Decision::Increase => self.learning_rate * self.config.lr_increase,
            Decision::Decrease => self.learning_rate * self.config.lr_decrease,
            Decision::Hold => self.learning_rate,
        };
        let learning_rate = self.config.clamp_lr(proposed);
        if learning_rate != self.learning_rate {
            self.lr_changes += 1;
        }
        self.learning_rate = learning_rate;

        let record = StepRecord {
            step: self.history.len(),
            loss,
            accuracy,
            learning_rate,
            delta,
            decision,
        };
        self.history.push(record.clone());
        Ok(record)
    }

    fn decide(&self, delta: Option<f64>) -> Decision {
        match delta {
            Some(delta) if delta >= self.config.delta_high => Decision::Increase,
            Some(delta) if delta <= self.config.delta_low => Decision::Decrease,
            _ => Decision::Hold,
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn config(&self) -> &DeltaConfig {
        &self.config
    }

    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }

    pub fn last(&self) -> Option<&StepRecord> {
        self.history.last()
    }

    pub fn lr_changes(&self) -> usize {
        self.lr_changes
    }

    pub fn get_stats(&self) -> Stats {
        Stats::from_history(&self.history, self.config.initial_lr)
    }

    /// Forget all observations and go back to the initial learning rate.
    pub fn reset(&mut self) {
        self.history.clear();
        self.learning_rate = self.config.initial_lr;
        self.lr_changes = 0;
    }
}
