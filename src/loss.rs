use ndarray::Array1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Loss {
    BinaryCrossEntropy,
}

impl Loss {
    /// Mean loss over a batch of predicted probabilities.
    pub fn calculate(&self, prediction: &Array1<f32>, target: &Array1<f32>) -> f32 {
        match self {
            Loss::BinaryCrossEntropy => {
                // -mean(t * ln(p) + (1 - t) * ln(1 - p)), with p clamped away from 0 and 1
                let epsilon = 1e-7;
                let safe_pred = prediction.mapv(|x| x.max(epsilon).min(1.0 - epsilon));
                let terms = target * &safe_pred.mapv(f32::ln)
                    + (1.0 - target) * &safe_pred.mapv(|p| (1.0 - p).ln());
                -terms.mean().unwrap_or(0.0)
            }
        }
    }

    /// Gradient of the mean loss with respect to the pre-sigmoid logits.
    pub fn logit_gradient(&self, prediction: &Array1<f32>, target: &Array1<f32>) -> Array1<f32> {
        match self {
            Loss::BinaryCrossEntropy => {
                let n = prediction.len().max(1) as f32;
                (prediction - target) / n
            }
        }
    }
}
