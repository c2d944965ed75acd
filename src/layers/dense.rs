use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::{activation::activation::ActivationFunction, math::{matrix::Matrix, vector::Vector}};

/// Per-layer state of a fully-connected network.
///
/// `inputs` and `outputs` are scratch space overwritten by every forward
/// pass; backprop reads them afterwards. Biases of the input layer are kept
/// (and persisted) but never used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer{
    pub count: usize,
    pub inputs: Vector,   // pre-activation values (z = Wx + b), needed for the derivative
    pub outputs: Vector,
    pub biases: Vector,
}

impl Layer {
    pub fn new(count: usize) -> Layer {
        Layer {
            count,
            inputs: Vector::zeros(count),
            outputs: Vector::zeros(count),
            biases: Vector::zeros(count),
        }
    }

    /// Stores `z` and its activation.
    pub fn feed(&mut self, z: Vector, activator: fn(f64) -> f64) -> &Vector {
        self.outputs = z.map(activator);
        self.inputs = z;
        &self.outputs
    }

    /// Redraws every bias from N(0, 1).
    pub fn randomize_biases<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for b in self.biases.as_mut_slice() {
            *b = Matrix::sample_standard_normal(rng);
        }
    }

    /// Derivative of the activation at the stored pre-activation values.
    pub fn activation_slope(&self, activator: ActivationFunction) -> Vector {
        activator.apply_derivative(&self.inputs)
    }
}
