use crate::error::Result;
use crate::math::vector::Vector;

/// Half squared error, `½‖predicted − expected‖²`.
pub struct SquaredError;

impl SquaredError {
    pub fn loss(predicted: &Vector, expected: &Vector) -> Result<f64> {
        Ok(0.5 * predicted.sub(expected)?.norm_squared())
    }

    /// Gradient with respect to `predicted`: predicted − expected
    pub fn derivative(predicted: &Vector, expected: &Vector) -> Result<Vector> {
        predicted.sub(expected)
    }
}
