use crate::{
    error::Result, loss::squared_error::SquaredError, network::network::Network,
    train::example::Example,
};

impl Network {
    /// Number of examples whose strongest output matches the strongest
    /// target component (first maximum wins on ties, on both sides).
    pub fn correct_count(&mut self, examples: &[Example]) -> Result<usize> {
        let (n_in, n_out) = (self.input_size(), self.output_size());
        for ex in examples {
            ex.check(n_in, n_out)?;
        }

        let mut correct = 0;
        for ex in examples {
            let output = self.forward(&ex.input)?;
            if output.argmax() == ex.target.argmax() {
                correct += 1;
            }
        }
        Ok(correct)
    }

    /// `Σ ½‖forward(input) − target‖²` over all examples.
    pub fn square_cost(&mut self, examples: &[Example]) -> Result<f64> {
        let (n_in, n_out) = (self.input_size(), self.output_size());
        for ex in examples {
            ex.check(n_in, n_out)?;
        }

        let mut cost = 0.0;
        for ex in examples {
            let output = self.forward(&ex.input)?;
            cost += SquaredError::loss(&output, &ex.target)?;
        }
        Ok(cost)
    }
}
