use crate::config::DeltaConfig;
use crate::controller::RateController;
use crate::error::{Error, Result};
use crate::history::StepRecord;
use crate::logging::Logger;
use crate::optimizer::Optimizer;
use crate::stats::Stats;

/// Wraps an optimizer and steers its learning rate from the delta signal.
///
/// ```
/// use delta_optim::{DeltaConfig, DeltaOptimizer, Optimizer, Sgd};
/// use ndarray::array;
///
/// let mut sgd = Sgd::new(array![0.0, 0.0], 0.1);
/// let mut delta = DeltaOptimizer::new(&mut sgd, DeltaConfig::default()).unwrap();
///
/// delta.step(1.0, None).unwrap();
/// let lr = delta.step(0.5, None).unwrap();
/// assert!((lr - 0.0012).abs() < 1e-12);
/// assert!((sgd.learning_rate() - 0.0012).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct DeltaOptimizer<O: Optimizer> {
    optimizer: O,
    controller: RateController,
    logger: Option<Logger>,
}

impl<O: Optimizer> DeltaOptimizer<O> {
    pub fn new(mut optimizer: O, config: DeltaConfig) -> Result<Self> {
        let controller = RateController::new(config)?;
        optimizer.set_learning_rate(controller.learning_rate());
        Ok(Self {
            optimizer,
            controller,
            logger: None,
        })
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Observe the latest loss (and optional accuracy), update the learning
    /// rate, then run one optimizer step. Returns the learning rate in use.
    ///
    /// The observation is recorded before the optimizer runs, so it stays in
    /// the history even when the optimizer step fails.
    pub fn step(&mut self, loss: f64, accuracy: Option<f64>) -> Result<f64> {
        let record = self.controller.observe(loss, accuracy)?;
        if let Some(logger) = self.logger.as_mut() {
            logger.log_step(&record);
        }

        self.optimizer.set_learning_rate(record.learning_rate);
        self.optimizer
            .step()
            .map_err(|err| Error::Optimizer(Box::new(err)))?;

        Ok(record.learning_rate)
    }

    pub fn learning_rate(&self) -> f64 {
        self.controller.learning_rate()
    }

    pub fn history(&self) -> &[StepRecord] {
        self.controller.history()
    }

    pub fn get_stats(&self) -> Stats {
        self.controller.get_stats()
    }

    pub fn controller(&self) -> &RateController {
        &self.controller
    }

    pub fn optimizer(&self) -> &O {
        &self.optimizer
    }

    pub fn optimizer_mut(&mut self) -> &mut O {
        &mut self.optimizer
    }

    /// Log the run summary through the attached logger, if any.
    pub fn finish(&self) -> Stats {
        let stats = self.get_stats();
        if let Some(logger) = self.logger.as_ref() {
            logger.log_summary(&stats);
        }
        stats
    }

    pub fn into_inner(self) -> (O, RateController) {
        (self.optimizer, self.controller)
    }
}
