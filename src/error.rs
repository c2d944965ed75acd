use thiserror::Error;

/// Every failure the engine can report.
///
/// All variants are raised before any state is touched, so a rejected call
/// leaves the network (and both operands of an algebra call) as they were.
#[derive(Debug, Error)]
pub enum NnError {
    /// Operand shapes are incompatible. Shapes are `(rows, cols)`; vectors
    /// report themselves as `(len, 1)`.
    #[error("dimension mismatch in {op}: {left:?} vs {right:?}")]
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Activation code outside the closed set; only reachable from a
    /// corrupted model file.
    #[error("unsupported activation code {0}")]
    UnsupportedActivation(i32),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, NnError>;

impl NnError {
    pub(crate) fn mismatch(op: &'static str, left: (usize, usize), right: (usize, usize)) -> Self {
        NnError::DimensionMismatch { op, left, right }
    }
}
