use crate::history::{Decision, StepRecord};
use crate::stats::Stats;

#[derive(Clone, Debug)]
pub struct LoggingSettings {
    pub enable_stdout: bool,
    pub log_every_n: usize,
}

impl LoggingSettings {
    pub fn new(enable_stdout: bool, log_every_n: usize) -> Self {
        Self {
            enable_stdout,
            log_every_n: log_every_n.max(1),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self::new(true, 100)
    }
}

/// Writes controller progress to stdout.
#[derive(Clone, Debug)]
pub struct Logger {
    settings: LoggingSettings,
    previous_lr: Option<f64>,
}

impl Logger {
    pub fn new(settings: LoggingSettings) -> Self {
        Self {
            settings,
            previous_lr: None,
        }
    }

    /// Format a step, or `None` when it should not be printed.
    ///
    /// Every `log_every_n`-th step is printed, plus any step where the
    /// learning rate moved.
    pub fn format_step(&mut self, record: &StepRecord) -> Option<String> {
        let changed = self
            .previous_lr
            .is_some_and(|previous| previous != record.learning_rate);
        self.previous_lr = Some(record.learning_rate);

        if !changed && record.step % self.settings.log_every_n != 0 {
            return None;
        }

        let mut line = format!("step={} loss={:.4}", record.step, record.loss);
        if let Some(accuracy) = record.accuracy {
            line.push_str(&format!(" acc={:.2}", accuracy));
        }
        if let Some(delta) = record.delta {
            line.push_str(&format!(" delta={:+.5}", delta));
        }
        let action = match record.decision {
            Decision::Increase => "increase",
            Decision::Decrease => "decrease",
            Decision::Hold => "hold",
        };
        line.push_str(&format!(" {} lr={:.5e}", action, record.learning_rate));
        Some(line)
    }

    pub fn log_step(&mut self, record: &StepRecord) {
        if let Some(line) = self.format_step(record) {
            if self.settings.enable_stdout {
                println!("{}", line);
            }
        }
    }

    pub fn log_summary(&self, stats: &Stats) {
        if self.settings.enable_stdout {
            println!("summary {}", stats);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(step: usize, learning_rate: f64, decision: Decision) -> StepRecord {
        StepRecord {
            step,
            loss: 0.5,
            accuracy: Some(80.0),
            learning_rate,
            delta: Some(0.01),
            decision,
        }
    }

    #[test]
    fn test_prints_every_n_and_on_change() {
        let mut logger = Logger::new(LoggingSettings::new(false, 10));

        assert!(logger.format_step(&record(0, 0.1, Decision::Hold)).is_some());
        assert!(logger.format_step(&record(1, 0.1, Decision::Hold)).is_none());

        let line = logger
            .format_step(&record(2, 0.12, Decision::Increase))
            .unwrap();
        assert!(line.contains("increase"));
        assert!(line.contains("acc=80.00"));

        assert!(logger.format_step(&record(10, 0.12, Decision::Hold)).is_some());
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let settings = LoggingSettings::new(true, 0);
        assert_eq!(settings.log_every_n, 1);
    }
}
