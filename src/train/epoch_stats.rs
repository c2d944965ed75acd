use serde::{Serialize, Deserialize};

/// What one call to `run_epoch` did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// Size of every mini-batch in the order they were applied. Only the
    /// last one can be shorter than the configured batch size.
    pub batch_sizes: Vec<usize>,
    /// Wall-clock duration of the epoch in milliseconds.
    pub elapsed_ms: u64,
}

impl EpochStats {
    /// Number of gradient steps taken.
    pub fn steps(&self) -> usize {
        self.batch_sizes.len()
    }

    pub fn examples(&self) -> usize {
        self.batch_sizes.iter().sum()
    }
}
