use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How the delta signal measures loss improvement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// Improvement in units of the baseline loss, damped by the fraction of
    /// the baseline loss still remaining
    ProgressWeighted,
    /// Improvement relative to the window's mean loss
    Relative,
}

/// Scale of the accuracy values the caller reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyUnit {
    /// Accuracy in [0, 100]
    Percent,
    /// Accuracy in [0, 1]
    Fraction,
}

impl AccuracyUnit {
    pub fn scale(&self) -> f64 {
        match self {
            AccuracyUnit::Percent => 100.0,
            AccuracyUnit::Fraction => 1.0,
        }
    }

    pub fn contains(&self, accuracy: f64) -> bool {
        accuracy.is_finite() && (0.0..=self.scale()).contains(&accuracy)
    }
}

/// Configuration for the learning rate controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeltaConfig {
    /// Learning rate written into the optimizer before the first step
    pub initial_lr: f64,

    /// Delta at or above which the learning rate is increased
    pub delta_high: f64,

    /// Delta at or below which the learning rate is decreased
    pub delta_low: f64,

    /// Multiplier applied on increase
    pub lr_increase: f64,

    /// Multiplier applied on decrease
    pub lr_decrease: f64,

    /// Number of recent records the new loss is compared against
    pub window: usize,

    /// Floor for the learning rate
    pub min_lr: f64,

    /// Optional ceiling for the learning rate
    pub max_lr: Option<f64>,

    /// Weight of the accuracy term in the delta signal
    pub accuracy_weight: f64,

    pub accuracy_unit: AccuracyUnit,

    pub signal: SignalKind,
}

impl Default for DeltaConfig {
    fn default() -> Self {
        DeltaConfig {
            initial_lr: 0.001,
            delta_high: 0.03,
            delta_low: 0.005,
            lr_increase: 1.2,
            lr_decrease: 0.7,
            window: 1,
            min_lr: 1e-12,
            max_lr: None,
            accuracy_weight: 1.0,
            accuracy_unit: AccuracyUnit::Percent,
            signal: SignalKind::ProgressWeighted,
        }
    }
}

impl DeltaConfig {
    /// Load a config from a TOML or JSON file and validate it.
    ///
    /// The format is picked from the extension: `.json` is JSON, `.toml` or
    /// no extension is TOML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config: DeltaConfig = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&contents)?,
            Some("toml") | None => toml::from_str(&contents)?,
            Some(other) => {
                return Err(Error::ConfigFormat(format!(
                    "unsupported configuration extension '{}'",
                    other
                )));
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        let floats = [
            ("initial_lr", self.initial_lr),
            ("delta_high", self.delta_high),
            ("delta_low", self.delta_low),
            ("lr_increase", self.lr_increase),
            ("lr_decrease", self.lr_decrease),
            ("min_lr", self.min_lr),
            ("accuracy_weight", self.accuracy_weight),
        ];
        for (name, value) in floats {
            if !value.is_finite() {
                errors.push(format!("{} must be finite", name));
            }
        }

        if self.initial_lr <= 0.0 {
            errors.push("initial_lr must be greater than 0".to_string());
        }

        if self.delta_low > self.delta_high {
            errors.push("delta_low cannot exceed delta_high".to_string());
        }

        if self.lr_increase < 1.0 {
            errors.push("lr_increase must be >= 1".to_string());
        }

        if !(self.lr_decrease > 0.0 && self.lr_decrease <= 1.0) {
            errors.push("lr_decrease must be in (0, 1]".to_string());
        }

        if self.window == 0 {
            errors.push("window must be greater than 0".to_string());
        }

        if self.min_lr <= 0.0 {
            errors.push("min_lr must be greater than 0".to_string());
        }

        if self.initial_lr < self.min_lr {
            errors.push("initial_lr cannot be below min_lr".to_string());
        }

        if let Some(max_lr) = self.max_lr {
            if !max_lr.is_finite() {
                errors.push("max_lr must be finite".to_string());
            } else {
                if max_lr < self.min_lr {
                    errors.push("max_lr cannot be below min_lr".to_string());
                }
                if self.initial_lr > max_lr {
                    errors.push("initial_lr cannot exceed max_lr".to_string());
                }
            }
        }

        if self.accuracy_weight < 0.0 {
            errors.push("accuracy_weight must be >= 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidConfig(errors))
        }
    }

    /// Clamp a learning rate into `[min_lr, max_lr]`.
    ///
    /// Without `max_lr` the ceiling is `f64::MAX`, so an overflowing product
    /// never becomes infinite.
    pub fn clamp_lr(&self, lr: f64) -> f64 {
        let ceiling = self.max_lr.unwrap_or(f64::MAX);
        lr.max(self.min_lr).min(ceiling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DeltaConfig::default();

        assert_eq!(config.initial_lr, 0.001);
        assert_eq!(config.delta_high, 0.03);
        assert_eq!(config.delta_low, 0.005);
        assert_eq!(config.lr_increase, 1.2);
        assert_eq!(config.lr_decrease, 0.7);
        assert_eq!(config.window, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let config = DeltaConfig {
            delta_high: 0.001,
            delta_low: 0.01,
            ..DeltaConfig::default()
        };

        match config.validate() {
            Err(Error::InvalidConfig(messages)) => {
                assert!(messages.iter().any(|m| m.contains("delta_low")));
            }
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_all_violations_reported() {
        let config = DeltaConfig {
            initial_lr: -1.0,
            lr_increase: 0.5,
            lr_decrease: 1.5,
            window: 0,
            ..DeltaConfig::default()
        };

        match config.validate() {
            Err(Error::InvalidConfig(messages)) => assert!(messages.len() >= 4),
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_threshold_rejected() {
        let config = DeltaConfig {
            delta_high: f64::NAN,
            ..DeltaConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_lr_bounds() {
        let config = DeltaConfig {
            max_lr: Some(0.0005),
            ..DeltaConfig::default()
        };
        assert!(config.validate().is_err());

        let config = DeltaConfig {
            max_lr: Some(0.01),
            ..DeltaConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.clamp_lr(1.0), 0.01);
        assert_eq!(config.clamp_lr(0.0), config.min_lr);
    }

    #[test]
    fn test_clamp_without_ceiling_stays_finite() {
        let config = DeltaConfig::default();

        assert_eq!(config.clamp_lr(f64::INFINITY), f64::MAX);
        assert_eq!(config.clamp_lr(f64::MAX * 1.2), f64::MAX);
        assert_eq!(config.clamp_lr(0.5), 0.5);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: DeltaConfig = toml::from_str(
            "initial_lr = 0.01\nsignal = \"relative\"\naccuracy_unit = \"fraction\"\n",
        )
        .unwrap();

        assert_eq!(config.initial_lr, 0.01);
        assert_eq!(config.signal, SignalKind::Relative);
        assert_eq!(config.accuracy_unit, AccuracyUnit::Fraction);
        assert_eq!(config.delta_high, 0.03);
    }

    #[test]
    fn test_accuracy_unit_ranges() {
        assert!(AccuracyUnit::Percent.contains(87.5));
        assert!(!AccuracyUnit::Fraction.contains(87.5));
        assert!(AccuracyUnit::Fraction.contains(0.875));
        assert!(!AccuracyUnit::Percent.contains(-1.0));
        assert!(!AccuracyUnit::Percent.contains(f64::NAN));
    }
}
