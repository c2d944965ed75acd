use log::debug;
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::{
    activation::activation::ActivationFunction,
    error::{NnError, Result},
    layers::dense::Layer,
    math::{matrix::Matrix, vector::Vector},
    optim::sgd::Sgd,
};

/// Fully-connected feedforward network.
///
/// Layers are numbered from 0 (input) to `len - 1` (output). Layer `i > 0`
/// is fed by the weight matrix of shape `(count[i], count[i - 1])` returned
/// by `weight(i)`; the input layer has none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub(crate) layers: Vec<Layer>,
    /// `weights[i - 1]` feeds layer `i`.
    pub(crate) weights: Vec<Matrix>,
    pub(crate) activation: ActivationFunction,
    pub(crate) sgd: Sgd,
}

impl Network {
    /// Allocates zeroed layers and weights for the given layer sizes.
    pub fn configure(sizes: &[usize], activation: ActivationFunction) -> Result<Network> {
        let (layers, weights) = allocate(sizes)?;
        debug!("configured {:?} network with layer sizes {:?}", activation, sizes);
        Ok(Network { layers, weights, activation, sgd: Sgd::default() })
    }

    /// Replaces every layer and weight; activation and hyperparameters stay.
    pub fn reconfigure(&mut self, sizes: &[usize]) -> Result<()> {
        let (layers, weights) = allocate(sizes)?;
        debug!("reconfigured network to layer sizes {:?}", sizes);
        self.layers = layers;
        self.weights = weights;
        Ok(())
    }

    /// Draws every weight from N(0, 1 / fan_in), layer by layer, row-major.
    pub fn initialize_weights<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for (i, w) in self.weights.iter_mut().enumerate() {
            *w = Matrix::xavier(w.rows, w.cols, rng);
            debug!("initialized weights of layer {} with fan-in {}", i + 1, w.cols);
        }
    }

    /// Draws every non-input bias from N(0, 1).
    pub fn initialize_biases<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for layer in self.layers.iter_mut().skip(1) {
            layer.randomize_biases(rng);
        }
    }

    /// Weights first, then biases.
    pub fn initialize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.initialize_weights(rng);
        self.initialize_biases(rng);
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.layers.iter().map(|l| l.count).collect()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    // A configured network always has at least two layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].count
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].count
    }

    pub fn layer(&self, i: usize) -> Option<&Layer> {
        self.layers.get(i)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Weights feeding layer `i`; `None` for the input layer or out of range.
    pub fn weight(&self, i: usize) -> Option<&Matrix> {
        i.checked_sub(1).and_then(|k| self.weights.get(k))
    }

    /// Replaces the weights feeding layer `i`. The shape must not change.
    pub fn set_weights(&mut self, i: usize, w: Matrix) -> Result<()> {
        let slot = i
            .checked_sub(1)
            .and_then(|k| self.weights.get_mut(k))
            .ok_or_else(|| NnError::InvalidConfiguration(format!("layer {i} has no incoming weights")))?;
        if slot.shape() != w.shape() {
            return Err(NnError::mismatch("set_weights", slot.shape(), w.shape()));
        }
        *slot = w;
        Ok(())
    }

    /// Replaces the biases of layer `i`. The length must not change.
    pub fn set_biases(&mut self, i: usize, biases: Vector) -> Result<()> {
        let layer = self
            .layers
            .get_mut(i)
            .ok_or_else(|| NnError::InvalidConfiguration(format!("no layer {i}")))?;
        if layer.biases.len() != biases.len() {
            return Err(NnError::mismatch("set_biases", layer.biases.shape(), biases.shape()));
        }
        layer.biases = biases;
        Ok(())
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }

    pub fn set_activation(&mut self, activation: ActivationFunction) {
        self.activation = activation;
    }

    pub fn sgd(&self) -> &Sgd {
        &self.sgd
    }

    pub fn set_sgd(&mut self, sgd: Sgd) -> Result<()> {
        sgd.validate()?;
        self.sgd = sgd;
        Ok(())
    }

    /// Forward pass; stores pre-activations and activations in each layer
    /// for backprop.
    ///
    /// The input layer goes through the activation too, so layer 1 sees
    /// `activation(input)` rather than the raw values.
    pub fn forward(&mut self, input: &Vector) -> Result<Vector> {
        let expected = self.input_size();
        if input.len() != expected {
            return Err(NnError::mismatch("forward", input.shape(), (expected, 1)));
        }

        let f = self.activation.function();
        self.layers[0].feed(input.clone(), f);
        for i in 1..self.layers.len() {
            let z = self.weights[i - 1]
                .mul_vector(&self.layers[i - 1].outputs)?
                .add(&self.layers[i].biases)?;
            self.layers[i].feed(z, f);
        }

        Ok(self.layers[self.layers.len() - 1].outputs.clone())
    }

    /// Index of the strongest output (first on ties).
    pub fn classify(&mut self, input: &Vector) -> Result<usize> {
        let out = self.forward(input)?;
        out.argmax()
            .ok_or_else(|| NnError::InvalidConfiguration("network has an empty output layer".into()))
    }
}

pub(crate) fn check_sizes(sizes: &[usize]) -> Result<()> {
    if sizes.len() < 2 {
        return Err(NnError::InvalidConfiguration(format!(
            "need at least 2 layer sizes, got {}",
            sizes.len()
        )));
    }
    if let Some(pos) = sizes.iter().position(|&s| s == 0) {
        return Err(NnError::InvalidConfiguration(format!("layer {pos} has size 0")));
    }
    Ok(())
}

fn allocate(sizes: &[usize]) -> Result<(Vec<Layer>, Vec<Matrix>)> {
    check_sizes(sizes)?;
    let layers = sizes.iter().map(|&s| Layer::new(s)).collect();
    let weights = sizes.windows(2).map(|w| Matrix::zeros(w[1], w[0])).collect();
    Ok((layers, weights))
}
