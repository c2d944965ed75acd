use serde::{Serialize, Deserialize};

use crate::activation::activation::sign;
use crate::error::{NnError, Result};

/// Mini-batch SGD hyperparameters with L1/L2 regularization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sgd {
    pub learning_rate: f64,
    #[serde(default)]
    pub l1: f64,
    #[serde(default)]
    pub l2: f64,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_batch_size() -> usize {
    1
}

impl Default for Sgd {
    fn default() -> Self {
        Sgd::new(0.1)
    }
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate, l1: 0.0, l2: 0.0, batch_size: default_batch_size() }
    }

    pub fn with_l1(mut self, l1: f64) -> Sgd {
        self.l1 = l1;
        self
    }

    pub fn with_l2(mut self, l2: f64) -> Sgd {
        self.l2 = l2;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Sgd {
        self.batch_size = batch_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(NnError::InvalidConfiguration("batch size must be at least 1".into()));
        }
        if !self.learning_rate.is_finite() {
            return Err(NnError::InvalidConfiguration(format!(
                "learning rate must be finite, got {}",
                self.learning_rate
            )));
        }
        for (name, v) in [("l1", self.l1), ("l2", self.l2)] {
            if !v.is_finite() || v < 0.0 {
                return Err(NnError::InvalidConfiguration(format!(
                    "{name} coefficient must be a non-negative number, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// One regularized step for a single weight.
    ///
    /// `grad` is the batch-summed gradient, `n` the number of examples that
    /// contributed to it:
    /// `w <- (1 - lr*l2/n)*w - lr*grad/n - lr*l1*sign(w)/n`
    pub fn update_weight(&self, w: f64, grad: f64, n: f64) -> f64 {
        let lr = self.learning_rate;
        (1.0 - lr * self.l2 / n) * w - lr * grad / n - lr * self.l1 * sign(w) / n
    }

    /// Biases are not regularized.
    pub fn update_bias(&self, b: f64, grad: f64, n: f64) -> f64 {
        b - self.learning_rate * grad / n
    }
}
