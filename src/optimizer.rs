use ndarray::Array1;
use thiserror::Error;

/// An optimizer whose learning rate can be driven from outside.
///
/// The controller never builds an optimizer itself; the caller constructs one
/// and hands it over, either by value or as `&mut`.
pub trait Optimizer {
    type Error: std::error::Error + Send + Sync + 'static;

    fn learning_rate(&self) -> f64;
    fn set_learning_rate(&mut self, learning_rate: f64);

    /// Apply one parameter update with the current learning rate.
    fn step(&mut self) -> Result<(), Self::Error>;
}

impl<O: Optimizer + ?Sized> Optimizer for &mut O {
    type Error = O::Error;

    fn learning_rate(&self) -> f64 {
        (**self).learning_rate()
    }

    fn set_learning_rate(&mut self, learning_rate: f64) {
        (**self).set_learning_rate(learning_rate)
    }

    fn step(&mut self) -> Result<(), Self::Error> {
        (**self).step()
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SgdError {
    #[error("gradient has {found} entries, parameters have {expected}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("gradient contains a non-finite value")]
    NonFiniteGradient,

    #[error("learning rate {0} is not representable as a finite f32")]
    NonFiniteLearningRate(f64),
}

/// Plain gradient descent over a flat parameter vector.
#[derive(Debug, Clone)]
pub struct Sgd {
    pub learning_rate: f64,
    pub params: Array1<f32>,
    pub grads: Array1<f32>,
    steps: usize,
}

impl Sgd {
    pub fn new(params: Array1<f32>, learning_rate: f64) -> Self {
        let grads = Array1::zeros(params.len());
        Self {
            learning_rate,
            params,
            grads,
            steps: 0,
        }
    }

    pub fn zero_grad(&mut self) {
        self.grads.fill(0.0);
    }

    /// Number of successful updates applied so far
    pub fn steps(&self) -> usize {
        self.steps
    }
}

impl Optimizer for Sgd {
    type Error = SgdError;

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn set_learning_rate(&mut self, learning_rate: f64) {
        self.learning_rate = learning_rate;
    }

    fn step(&mut self) -> Result<(), SgdError> {
        if self.grads.len() != self.params.len() {
            return Err(SgdError::ShapeMismatch {
                expected: self.params.len(),
                found: self.grads.len(),
            });
        }
        if self.grads.iter().any(|g| !g.is_finite()) {
            return Err(SgdError::NonFiniteGradient);
        }

        let lr = self.learning_rate as f32;
        if !lr.is_finite() {
            return Err(SgdError::NonFiniteLearningRate(self.learning_rate));
        }
        self.params.scaled_add(-lr, &self.grads);
        self.steps += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_sgd_update() {
        let mut sgd = Sgd::new(array![1.0, -2.0], 0.5);
        sgd.grads = array![2.0, -4.0];

        sgd.step().unwrap();

        assert_eq!(sgd.params, array![0.0, 0.0]);
        assert_eq!(sgd.steps(), 1);
    }

    #[test]
    fn test_sgd_rejects_non_finite_gradient() {
        let mut sgd = Sgd::new(array![1.0, 1.0], 0.1);
        sgd.grads = array![f32::NAN, 0.0];

        assert_eq!(sgd.step(), Err(SgdError::NonFiniteGradient));
        assert_eq!(sgd.params, array![1.0, 1.0]);
        assert_eq!(sgd.steps(), 0);
    }

    #[test]
    fn test_sgd_rejects_rate_beyond_f32() {
        let mut sgd = Sgd::new(array![1.0, 1.0], 1e300);
        sgd.grads = array![0.0, 0.0];

        assert_eq!(sgd.step(), Err(SgdError::NonFiniteLearningRate(1e300)));
        assert_eq!(sgd.params, array![1.0, 1.0]);
        assert_eq!(sgd.steps(), 0);
    }

    #[test]
    fn test_sgd_rejects_shape_mismatch() {
        let mut sgd = Sgd::new(array![1.0, 1.0], 0.1);
        sgd.grads = array![1.0];

        assert_eq!(
            sgd.step(),
            Err(SgdError::ShapeMismatch { expected: 2, found: 1 })
        );
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut sgd = Sgd::new(array![0.0], 0.1);
        {
            let mut borrowed = &mut sgd;
            borrowed.set_learning_rate(0.25);
            borrowed.grads = array![1.0];
            Optimizer::step(&mut borrowed).unwrap();
        }
        assert_eq!(sgd.learning_rate, 0.25);
        assert_eq!(sgd.params, array![-0.25]);
    }
}
