//! A synthetic logistic-regression problem for exercising the controller
//! end to end.

use ndarray::{s, Array1, Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::config::DeltaConfig;
use crate::controller::RateController;
use crate::delta::DeltaOptimizer;
use crate::error::{Error, Result};
use crate::logging::Logger;
use crate::loss::Loss;
use crate::optimizer::Sgd;
use crate::stats::Stats;

#[derive(Debug, Clone)]
pub struct SyntheticProblem {
    /// samples × features
    pub inputs: Array2<f32>,
    /// 0.0 or 1.0 per sample
    pub labels: Array1<f32>,
    pub true_weights: Array1<f32>,
}

impl SyntheticProblem {
    /// Draw a binary classification problem whose labels come from a random
    /// hyperplane, with Gaussian label noise of standard deviation `noise`.
    pub fn generate(samples: usize, features: usize, noise: f32, seed: u64) -> Result<Self> {
        if samples == 0 || features == 0 {
            return Err(Error::InvalidInput(
                "synthetic problem needs at least one sample and one feature".to_string(),
            ));
        }
        let standard = Normal::new(0.0f32, 1.0).map_err(|e| Error::InvalidInput(e.to_string()))?;
        let jitter = Normal::new(0.0f32, noise)
            .map_err(|e| Error::InvalidInput(format!("noise {}: {}", noise, e)))?;

        let mut rng = StdRng::seed_from_u64(seed);
        let true_weights: Array1<f32> =
            Array1::from_shape_fn(features, |_| standard.sample(&mut rng));
        let inputs: Array2<f32> =
            Array2::from_shape_fn((samples, features), |_| standard.sample(&mut rng));

        let logits = inputs.dot(&true_weights);
        let labels = logits.mapv(|z| {
            if z + jitter.sample(&mut rng) > 0.0 {
                1.0
            } else {
                0.0
            }
        });

        Ok(SyntheticProblem {
            inputs,
            labels,
            true_weights,
        })
    }

    pub fn samples(&self) -> usize {
        self.inputs.nrows()
    }

    pub fn features(&self) -> usize {
        self.inputs.ncols()
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Predicted probabilities for `inputs` under `params` (weights then bias).
///
/// `params` must hold one weight per input column plus the bias.
pub fn predict(inputs: &Array2<f32>, params: ArrayView1<f32>) -> Result<Array1<f32>> {
    let features = inputs.ncols();
    if params.len() != features + 1 {
        return Err(Error::InvalidInput(format!(
            "expected {} parameters for {} features, got {}",
            features + 1,
            features,
            params.len()
        )));
    }
    let weights = params.slice(s![..features]);
    let bias = params[features];
    Ok((inputs.dot(&weights) + bias).mapv(sigmoid))
}

/// Percent of predictions on the right side of 0.5.
pub fn accuracy(prediction: &Array1<f32>, labels: &Array1<f32>) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let correct = prediction
        .iter()
        .zip(labels.iter())
        .filter(|(p, y)| (**p >= 0.5) == (**y >= 0.5))
        .count();
    correct as f64 / labels.len() as f64 * 100.0
}

/// Loss and accuracy (percent) of `params` over the whole problem.
pub fn evaluate(problem: &SyntheticProblem, params: ArrayView1<f32>) -> Result<(f64, f64)> {
    let prediction = predict(&problem.inputs, params)?;
    let loss = Loss::BinaryCrossEntropy.calculate(&prediction, &problem.labels);
    Ok((loss as f64, accuracy(&prediction, &problem.labels)))
}

#[derive(Debug, Clone)]
pub struct TrainSettings {
    pub epochs: usize,
    pub batch_size: usize,
    pub seed: u64,
}

impl Default for TrainSettings {
    fn default() -> Self {
        TrainSettings {
            epochs: 10,
            batch_size: 32,
            seed: 0,
        }
    }
}

/// Train logistic regression with mini-batch SGD under the delta controller.
///
/// The controller sees the loss and accuracy of each batch before the update
/// computed from that batch is applied.
pub fn train(
    problem: &SyntheticProblem,
    config: DeltaConfig,
    settings: &TrainSettings,
    logger: Option<Logger>,
) -> Result<DeltaOptimizer<Sgd>> {
    if settings.batch_size == 0 {
        return Err(Error::InvalidInput("batch_size must be greater than 0".to_string()));
    }

    let features = problem.features();
    let sgd = Sgd::new(Array1::zeros(features + 1), config.initial_lr);
    let mut delta = DeltaOptimizer::new(sgd, config)?;
    if let Some(logger) = logger {
        delta = delta.with_logger(logger);
    }

    let mut rng = fastrand::Rng::with_seed(settings.seed);
    let mut indices: Vec<usize> = (0..problem.samples()).collect();
    let loss_fn = Loss::BinaryCrossEntropy;

    for _ in 0..settings.epochs {
        rng.shuffle(&mut indices);

        for batch in indices.chunks(settings.batch_size) {
            let inputs = problem.inputs.select(Axis(0), batch);
            let labels = problem.labels.select(Axis(0), batch);

            let prediction = predict(&inputs, delta.optimizer().params.view())?;
            let loss = loss_fn.calculate(&prediction, &labels);
            let batch_accuracy = accuracy(&prediction, &labels);

            let grad_logits = loss_fn.logit_gradient(&prediction, &labels);
            let sgd = delta.optimizer_mut();
            sgd.zero_grad();
            sgd.grads
                .slice_mut(s![..features])
                .assign(&inputs.t().dot(&grad_logits));
            sgd.grads[features] = grad_logits.sum();

            delta.step(loss as f64, Some(batch_accuracy))?;
        }
    }

    Ok(delta)
}

/// Loss sequence replayed by [`dry_run`]: one large improvement, then a tiny one.
pub const DRY_RUN_LOSSES: [f64; 3] = [1.0, 0.5, 0.49];

/// Check a config end to end without training: validate it, replay
/// [`DRY_RUN_LOSSES`] through a fresh controller, and return the stats.
pub fn dry_run(config: DeltaConfig, logger: &mut Logger) -> Result<Stats> {
    let mut controller = RateController::new(config)?;
    for loss in DRY_RUN_LOSSES {
        let record = controller.observe(loss, None)?;
        logger.log_step(&record);
    }
    let stats = controller.get_stats();
    logger.log_summary(&stats);
    Ok(stats)
}
