use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};
use crate::math::vector::Vector;

/// Slope used by `LeakyReLU` on the negative side.
pub const LEAKY_SLOPE: f64 = 0.01;

/// Element-wise activation shared by every layer of a network.
///
/// The discriminants are the codes written to model files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Sigmoid = 0,
    Tanh = 1,
    Softsign = 2,
    Softplus = 3,
    ReLU = 4,
    LeakyReLU = 5,
}

impl ActivationFunction {
    pub const ALL: [ActivationFunction; 6] = [
        ActivationFunction::Sigmoid,
        ActivationFunction::Tanh,
        ActivationFunction::Softsign,
        ActivationFunction::Softplus,
        ActivationFunction::ReLU,
        ActivationFunction::LeakyReLU,
    ];

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Result<ActivationFunction> {
        ActivationFunction::ALL
            .iter()
            .copied()
            .find(|a| a.code() == code)
            .ok_or(NnError::UnsupportedActivation(code))
    }

    /// Resolves the scalar function once so hot loops don't re-dispatch.
    pub fn function(self) -> fn(f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => sigmoid,
            ActivationFunction::Tanh => f64::tanh,
            ActivationFunction::Softsign => softsign,
            ActivationFunction::Softplus => softplus,
            ActivationFunction::ReLU => relu,
            ActivationFunction::LeakyReLU => leaky_relu,
        }
    }

    /// Derivative with respect to the pre-activation value.
    pub fn derivative(self) -> fn(f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => sigmoid_deriv,
            ActivationFunction::Tanh => tanh_deriv,
            ActivationFunction::Softsign => softsign_deriv,
            ActivationFunction::Softplus => sigmoid,
            ActivationFunction::ReLU => relu_deriv,
            ActivationFunction::LeakyReLU => leaky_relu_deriv,
        }
    }

    pub fn apply(self, z: &Vector) -> Vector {
        z.map(self.function())
    }

    pub fn apply_derivative(self, z: &Vector) -> Vector {
        z.map(self.derivative())
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

// e^-x / (1 + e^-x)^2, written so it stays finite for large negative x.
fn sigmoid_deriv(x: f64) -> f64 {
    let s = sigmoid(x);
    s * (1.0 - s)
}

fn tanh_deriv(x: f64) -> f64 {
    let t = x.tanh();
    1.0 - t * t
}

fn softsign(x: f64) -> f64 {
    x / (1.0 + x.abs())
}

fn softsign_deriv(x: f64) -> f64 {
    let d = 1.0 + x.abs();
    (d - x * sign(x)) / (d * d)
}

fn softplus(x: f64) -> f64 {
    x.exp().ln_1p()
}

fn relu(x: f64) -> f64 {
    if x > 0.0 { x } else { 0.0 }
}

fn relu_deriv(x: f64) -> f64 {
    if x > 0.0 { 1.0 } else { 0.0 }
}

fn leaky_relu(x: f64) -> f64 {
    if x > 0.0 { x } else { LEAKY_SLOPE * x }
}

fn leaky_relu_deriv(x: f64) -> f64 {
    if x > 0.0 { 1.0 } else { LEAKY_SLOPE }
}

/// Sign with `sign(0) == 0`.
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
