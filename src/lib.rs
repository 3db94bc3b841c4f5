mod config;
mod controller;
mod delta;
mod error;
mod history;
mod logging;
mod optimizer;
mod report;
mod signal;
mod stats;

pub mod harness;
pub mod loss;
pub mod plots;

pub use config::{AccuracyUnit, DeltaConfig, SignalKind};
pub use controller::RateController;
pub use delta::DeltaOptimizer;
pub use error::{Error, Result};
pub use history::{Decision, StepRecord};
pub use logging::{Logger, LoggingSettings};
pub use optimizer::{Optimizer, Sgd, SgdError};
pub use report::{write_report, Report};
pub use stats::Stats;
