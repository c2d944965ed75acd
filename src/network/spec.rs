use log::debug;
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{NnError, Result};
use crate::network::metadata::ModelMetadata;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;

/// A fully serializable description of a network architecture plus its
/// training hyperparameters and optional metadata.
///
/// `NetworkSpec` can be saved to / loaded from JSON independently of the
/// trained weights, making it possible to store architecture configurations
/// before training starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name used as the model file stem.
    pub name: String,
    /// Layer sizes, input first.
    pub sizes: Vec<usize>,
    pub activation: ActivationFunction,
    pub hyperparams: Sgd,
    /// Seed for initialization and shuffling; callers pick one when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub metadata: Option<ModelMetadata>,
}

impl NetworkSpec {
    pub fn new(name: &str, sizes: Vec<usize>, activation: ActivationFunction, hyperparams: Sgd) -> NetworkSpec {
        NetworkSpec { name: name.to_owned(), sizes, activation, hyperparams, seed: None, metadata: None }
    }

    /// Configured network with zeroed weights and biases.
    pub fn build(&self) -> Result<Network> {
        if let Some(labels) = self.metadata.as_ref().and_then(|m| m.output_labels.as_ref()) {
            let outputs = self.sizes.last().copied().unwrap_or(0);
            if labels.len() != outputs {
                return Err(NnError::InvalidConfiguration(format!(
                    "{} output labels for {} outputs",
                    labels.len(),
                    outputs
                )));
            }
        }
        let mut net = Network::configure(&self.sizes, self.activation)?;
        net.set_sgd(self.hyperparams)?;
        debug!("built network '{}' from spec", self.name);
        Ok(net)
    }

    /// Like `build`, then draws weights and biases from `rng`.
    pub fn build_initialized<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        let mut net = self.build()?;
        net.initialize(rng);
        Ok(net)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
