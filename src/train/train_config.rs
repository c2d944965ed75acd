use std::path::PathBuf;

use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`         — total number of full passes over the training data
/// - `log_every`      — log the square cost every this many epochs (0 = only
///                      after the last one)
/// - `snapshot_every` — write a binary model snapshot every this many epochs
///                      (0 = never)
/// - `snapshot_path`  — where snapshots go; required when `snapshot_every > 0`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs: usize,
    #[serde(default)]
    pub log_every: usize,
    #[serde(default)]
    pub snapshot_every: usize,
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig` that logs once at the end and never
    /// snapshots.
    pub fn new(epochs: usize) -> Self {
        TrainConfig {
            epochs,
            log_every: 0,
            snapshot_every: 0,
            snapshot_path: None,
        }
    }

    pub fn with_log_every(mut self, log_every: usize) -> Self {
        self.log_every = log_every;
        self
    }

    pub fn with_snapshots(mut self, every: usize, path: impl Into<PathBuf>) -> Self {
        self.snapshot_every = every;
        self.snapshot_path = Some(path.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.snapshot_every > 0 && self.snapshot_path.is_none() {
            return Err(NnError::InvalidConfiguration(
                "snapshot_every is set but snapshot_path is missing".into(),
            ));
        }
        Ok(())
    }

    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load_json(path: &str) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: TrainConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}
