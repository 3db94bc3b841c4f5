use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::DeltaConfig;
use crate::controller::RateController;
use crate::error::Result;
use crate::history::StepRecord;
use crate::stats::Stats;

/// Everything worth keeping from a run: the settings, the summary, and
/// every step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub config: DeltaConfig,
    pub stats: Stats,
    pub history: Vec<StepRecord>,
}

impl Report {
    pub fn from_controller(controller: &RateController) -> Self {
        Report {
            config: controller.config().clone(),
            stats: controller.get_stats(),
            history: controller.history().to_vec(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Write a report as pretty JSON, creating parent directories as needed.
pub fn write_report(path: impl AsRef<Path>, report: &Report) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, report.to_json()?)?;
    Ok(())
}
