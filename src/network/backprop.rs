use crate::{
    error::{NnError, Result},
    loss::squared_error::SquaredError,
    math::{matrix::Matrix, vector::Vector},
    network::network::Network,
    train::example::Example,
};

/// Batch-summed gradients of `Σ ½‖output − target‖²`.
///
/// `weights[i - 1]` and `biases[i - 1]` belong to layer `i`, mirroring the
/// network's own weight indexing.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub weights: Vec<Matrix>,
    pub biases: Vec<Vector>,
    /// Number of examples summed in.
    pub examples: usize,
}

impl Gradients {
    pub fn zeros_like(network: &Network) -> Gradients {
        Gradients {
            weights: network.weights.iter().map(|w| Matrix::zeros(w.rows, w.cols)).collect(),
            biases: network.layers.iter().skip(1).map(|l| Vector::zeros(l.count)).collect(),
            examples: 0,
        }
    }

    /// Gradient for the weights feeding layer `i`.
    pub fn weight(&self, i: usize) -> Option<&Matrix> {
        i.checked_sub(1).and_then(|k| self.weights.get(k))
    }

    pub fn bias(&self, i: usize) -> Option<&Vector> {
        i.checked_sub(1).and_then(|k| self.biases.get(k))
    }
}

impl Network {
    /// Per-layer error vectors for `target`, output layer last.
    ///
    /// The output error is `(outputs − target) ⊙ f'(inputs)`, not the bare
    /// difference `outputs − target`, so it is the exact derivative of
    /// `½‖outputs − target‖²` with respect to the output layer's inputs for
    /// every activation. Hidden errors are `(Wᵀ·δ_next) ⊙ f'(inputs)`.
    ///
    /// Reads the layer state left by the latest `forward`, so call that first
    /// with the matching input. Entry 0 belongs to the input layer and is
    /// computed for completeness only.
    pub fn backprop(&self, target: &Vector) -> Result<Vec<Vector>> {
        let last = self.layers.len() - 1;
        if target.len() != self.layers[last].count {
            return Err(NnError::mismatch("backprop target", target.shape(), (self.layers[last].count, 1)));
        }

        let mut errors = vec![Vector::default(); self.layers.len()];
        // δ_L = (a_L − t) ⊙ f'(z_L)
        errors[last] = SquaredError::derivative(&self.layers[last].outputs, target)?
            .hadamard(&self.layers[last].activation_slope(self.activation))?;

        for i in (0..last).rev() {
            // weights[i] feeds layer i + 1
            let back = self.weights[i].transpose().mul_vector(&errors[i + 1])?;
            errors[i] = back.hadamard(&self.layers[i].activation_slope(self.activation))?;
        }

        Ok(errors)
    }

    /// Runs forward and backprop over `batch`, summing the gradients.
    ///
    /// The weight gradient adds `error ⊗ previous_outputs` for each example
    /// on its own, rather than pairing the summed error with the outputs of
    /// whichever example ran last. The two agree when the batch holds a
    /// single example.
    ///
    /// Every example is size-checked before the first forward pass.
    pub fn gradients<'a, I>(&mut self, batch: I) -> Result<Gradients>
    where
        I: IntoIterator<Item = &'a Example>,
    {
        let batch: Vec<&Example> = batch.into_iter().collect();
        let (n_in, n_out) = (self.input_size(), self.output_size());
        for ex in &batch {
            ex.check(n_in, n_out)?;
        }

        let mut grads = Gradients::zeros_like(self);
        for ex in batch {
            self.forward(&ex.input)?;
            let errors = self.backprop(&ex.target)?;

            for i in 1..self.layers.len() {
                let dw = Matrix::outer(&errors[i], &self.layers[i - 1].outputs);
                grads.weights[i - 1] = grads.weights[i - 1].add(&dw)?;
                grads.biases[i - 1] = grads.biases[i - 1].add(&errors[i])?;
            }
            grads.examples += 1;
        }

        Ok(grads)
    }

    /// Applies one regularized SGD step scaled by `grads.examples`.
    ///
    /// Shapes are checked for every layer before any weight moves. An empty
    /// gradient set is a no-op.
    pub fn apply_gradients(&mut self, grads: &Gradients) -> Result<()> {
        if grads.weights.len() != self.weights.len() || grads.biases.len() != self.weights.len() {
            return Err(NnError::mismatch(
                "apply_gradients",
                (grads.weights.len(), grads.biases.len()),
                (self.weights.len(), self.weights.len()),
            ));
        }
        for (k, (gw, gb)) in grads.weights.iter().zip(grads.biases.iter()).enumerate() {
            if gw.shape() != self.weights[k].shape() {
                return Err(NnError::mismatch("apply_gradients", gw.shape(), self.weights[k].shape()));
            }
            if gb.len() != self.layers[k + 1].count {
                return Err(NnError::mismatch("apply_gradients", gb.shape(), self.layers[k + 1].biases.shape()));
            }
        }
        if grads.examples == 0 {
            return Ok(());
        }

        let sgd = self.sgd;
        let n = grads.examples as f64;
        for (k, (gw, gb)) in grads.weights.iter().zip(grads.biases.iter()).enumerate() {
            for (w, g) in self.weights[k].iter_mut().zip(gw.iter()) {
                *w = sgd.update_weight(*w, *g, n);
            }
            for (b, g) in self.layers[k + 1].biases.as_mut_slice().iter_mut().zip(gb.iter()) {
                *b = sgd.update_bias(*b, *g, n);
            }
        }
        Ok(())
    }

    /// One gradient step over `batch`. Returns the number of examples used.
    pub fn train_batch<'a, I>(&mut self, batch: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a Example>,
    {
        let grads = self.gradients(batch)?;
        self.apply_gradients(&grads)?;
        Ok(grads.examples)
    }
}
