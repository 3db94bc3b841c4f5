//! The delta signal: a scalar summarizing how much training improved at the
//! latest step.
//!
//! The loss term depends on [`SignalKind`]. With `L0` the baseline (first)
//! loss, `ref` the mean loss over the comparison window and `L` the new loss:
//!
//! - `ProgressWeighted`: `((ref - L) / |L0|) * (|L| / |L0|)`
//! - `Relative`: `(ref - L) / |ref|`
//!
//! When the observation carries an accuracy and the window has at least one
//! accuracy to compare against, `weight * (a - mean_acc) / scale` is added,
//! with `scale` taken from the configured [`AccuracyUnit`].

use crate::config::{AccuracyUnit, DeltaConfig, SignalKind};
use crate::history::StepRecord;

const EPS: f64 = 1e-12;

/// Compute the delta for a new observation.
///
/// Returns `None` when there is no previous record to compare against.
pub fn compute(
    config: &DeltaConfig,
    baseline: Option<&StepRecord>,
    window: &[StepRecord],
    loss: f64,
    accuracy: Option<f64>,
) -> Option<f64> {
    let baseline = baseline?;
    if window.is_empty() {
        return None;
    }

    let reference = mean(window.iter().map(|r| r.loss))?;
    let loss_term = match config.signal {
        SignalKind::ProgressWeighted => progress_weighted(baseline.loss, reference, loss),
        SignalKind::Relative => relative(reference, loss),
    };

    let accuracy_term = match accuracy {
        Some(current) => mean(window.iter().filter_map(|r| r.accuracy))
            .map(|previous| accuracy_gain(config.accuracy_unit, previous, current))
            .unwrap_or(0.0),
        None => 0.0,
    };

    Some(loss_term + config.accuracy_weight * accuracy_term)
}

fn progress_weighted(baseline: f64, reference: f64, loss: f64) -> f64 {
    let scale = baseline.abs();
    if scale < EPS {
        return 0.0;
    }
    ((reference - loss) / scale) * (loss.abs() / scale)
}

fn relative(reference: f64, loss: f64) -> f64 {
    let scale = reference.abs();
    if scale < EPS {
        return 0.0;
    }
    (reference - loss) / scale
}

fn accuracy_gain(unit: AccuracyUnit, previous: f64, current: f64) -> f64 {
    (current - previous) / unit.scale()
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
