//! Training history visualization.
//!
//! Two modes:
//! - **Terminal**: unicode sparklines of loss and learning rate
//! - **PNG export**: two-panel chart via plotters (optional feature)

use std::path::Path;

#[cfg(feature = "plotters")]
use plotters::prelude::*;

use crate::error::{Error, Result};
use crate::history::StepRecord;
use crate::stats::Stats;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render values as a sparkline of exactly `width` characters.
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() {
        return " ".repeat(width);
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = (max - min).max(f64::EPSILON);

    let mut result = String::with_capacity(width * 3);
    for i in 0..width {
        let idx = if values.len() <= width {
            if i < values.len() {
                Some(i)
            } else {
                None
            }
        } else {
            Some(i * values.len() / width)
        };

        match idx {
            Some(idx) => {
                let normalized = (values[idx] - min) / range;
                let bar = ((normalized * 7.0).round() as usize).min(7);
                result.push(BARS[bar]);
            }
            None => result.push(' '),
        }
    }
    result
}

/// Print loss and learning-rate sparklines followed by the run stats.
pub fn print_summary(history: &[StepRecord], stats: &Stats) {
    let losses: Vec<f64> = history.iter().map(|r| r.loss).collect();
    let rates: Vec<f64> = history.iter().map(|r| r.learning_rate).collect();

    println!("loss {}", sparkline(&losses, 40));
    println!("lr   {}", sparkline(&rates, 40));
    println!("{}", stats);
}

/// Draw loss (top) and learning rate (bottom) against step into a PNG.
#[cfg(feature = "plotters")]
pub fn plot_history(history: &[StepRecord], output_path: impl AsRef<Path>) -> Result<()> {
    draw(history, output_path.as_ref()).map_err(|err| Error::Plot(err.to_string()))
}

#[cfg(feature = "plotters")]
fn draw(history: &[StepRecord], output_path: &Path) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(output_path, (1000, 700)).into_drawing_area();
    root.fill(&WHITE)?;

    let n = history.len();
    if n == 0 {
        root.present()?;
        return Ok(());
    }
    let areas = root.split_evenly((2, 1));

    {
        let losses: Vec<_> = history.iter().map(|r| (r.step as f64, r.loss)).collect();
        let (min_l, max_l) = bounds(losses.iter().map(|(_, l)| *l));

        let mut chart = ChartBuilder::on(&areas[0])
            .caption("Loss", ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(0.0..(n as f64), min_l..max_l)?;

        chart.configure_mesh().draw()?;
        chart.draw_series(LineSeries::new(losses, &BLUE))?;
    }

    {
        let rates: Vec<_> = history
            .iter()
            .map(|r| (r.step as f64, r.learning_rate))
            .collect();
        let (min_r, max_r) = bounds(rates.iter().map(|(_, r)| *r));

        let mut chart = ChartBuilder::on(&areas[1])
            .caption("Learning Rate", ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(0.0..(n as f64), min_r..max_r)?;

        chart.configure_mesh().draw()?;
        chart.draw_series(LineSeries::new(rates, &RED))?;
    }

    root.present()?;
    Ok(())
}

#[cfg(feature = "plotters")]
fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
        (min.min(v), max.max(v))
    });
    let pad = ((max - min) * 0.05).max(1e-12);
    (min - pad, max + pad)
}

/// Stub when the plotters feature is disabled.
#[cfg(not(feature = "plotters"))]
pub fn plot_history(_history: &[StepRecord], _output_path: impl AsRef<Path>) -> Result<()> {
    Err(Error::FeatureDisabled("plot_history"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparkline_width() {
        let values = [1.0, 2.0, 3.0];
        let line = sparkline(&values, 5);

        assert_eq!(line.chars().count(), 5);
        assert!(line.starts_with('▁'));
        assert_eq!(line.chars().nth(2), Some('█'));
    }

    #[test]
    fn test_sparkline_downsamples() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        assert_eq!(sparkline(&values, 10).chars().count(), 10);
    }

    #[test]
    fn test_sparkline_flat_and_empty() {
        assert_eq!(sparkline(&[], 3), "   ");
        assert_eq!(sparkline(&[0.5, 0.5], 2), "▁▁");
    }

    #[cfg(not(feature = "plotters"))]
    #[test]
    fn test_plot_without_feature() {
        assert!(matches!(
            plot_history(&[], "unused.png"),
            Err(Error::FeatureDisabled(_))
        ));
    }
}
