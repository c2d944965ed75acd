use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};
use crate::math::vector::Vector;

/// One supervised training pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub input: Vector,
    pub target: Vector,
}

impl Example {
    pub fn new(input: impl Into<Vector>, target: impl Into<Vector>) -> Example {
        Example { input: input.into(), target: target.into() }
    }

    /// Builds an example whose target is one-hot at `class`.
    pub fn one_hot(input: impl Into<Vector>, class: usize, classes: usize) -> Result<Example> {
        if class >= classes {
            return Err(NnError::InvalidConfiguration(format!(
                "class {class} out of range for {classes} outputs"
            )));
        }
        let mut target = Vector::zeros(classes);
        target[class] = 1.0;
        Ok(Example { input: input.into(), target })
    }

    /// Fails unless both vectors fit a network with the given end sizes.
    pub fn check(&self, input_size: usize, output_size: usize) -> Result<()> {
        if self.input.len() != input_size {
            return Err(NnError::mismatch("example input", self.input.shape(), (input_size, 1)));
        }
        if self.target.len() != output_size {
            return Err(NnError::mismatch("example target", self.target.shape(), (output_size, 1)));
        }
        Ok(())
    }
}
