//! Model files.
//!
//! The binary layout, all little-endian:
//!
//! ```text
//! i32            activation code
//! i32            layer count
//! i32 * count    layer sizes
//! f64 * Σsize    biases, layer by layer (input layer included)
//! f64 * ...      weights, matrix by matrix, row-major
//! ```
//!
//! Nothing is checksummed: a complete but corrupted file loads as a network
//! with garbage values.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{info, warn};

use crate::{
    activation::activation::ActivationFunction,
    error::{NnError, Result},
    network::network::{check_sizes, Network},
};

impl Network {
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        write_i32(w, self.activation.code())?;
        write_i32(w, to_i32(self.layers.len())?)?;
        for layer in &self.layers {
            write_i32(w, to_i32(layer.count)?)?;
        }
        for layer in &self.layers {
            for b in layer.biases.iter() {
                w.write_all(&b.to_le_bytes())?;
            }
        }
        for m in &self.weights {
            for x in m.iter() {
                w.write_all(&x.to_le_bytes())?;
            }
        }
        Ok(())
    }

    /// Reads a network written by `write_to`. Hyperparameters are not part of
    /// the format and come back as defaults.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Network> {
        let activation = ActivationFunction::from_code(read_i32(r)?)?;

        let count = read_i32(r)?;
        if count < 0 {
            return Err(NnError::InvalidConfiguration(format!("negative layer count {count}")));
        }
        let mut sizes = Vec::new();
        for i in 0..count {
            let s = read_i32(r)?;
            if s < 0 {
                return Err(NnError::InvalidConfiguration(format!("layer {i} has negative size {s}")));
            }
            sizes.push(s as usize);
        }

        check_sizes(&sizes)?;
        let total = parameter_count(&sizes)?;

        // Grows only with bytes actually read; the sizes allocate nothing
        // until the payload is complete.
        let mut values = Vec::new();
        for _ in 0..total {
            values.push(read_f64(r)?);
        }

        let mut net = Network::configure(&sizes, activation)?;
        let slots = net
            .layers
            .iter_mut()
            .flat_map(|layer| layer.biases.as_mut_slice().iter_mut())
            .chain(net.weights.iter_mut().flat_map(|m| m.iter_mut()));
        for (slot, v) in slots.zip(values) {
            *slot = v;
        }
        Ok(net)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        info!("saved {:?} network {:?} to {}", self.activation, self.sizes(), path.display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Network> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        let net = Network::read_from(&mut reader)?;

        let mut rest = [0u8; 1];
        if reader.read(&mut rest)? != 0 {
            warn!("{} has trailing bytes after the model; ignoring them", path.display());
        }
        info!("loaded {:?} network {:?} from {}", net.activation, net.sizes(), path.display());
        Ok(net)
    }

    /// Serializes the whole network, hyperparameters included, to
    /// pretty-printed JSON.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by
    /// `save_json`, rejecting files whose shapes don't line up.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Network> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let net: Network = serde_json::from_reader(reader)?;
        net.check_consistency()?;
        Ok(net)
    }

    fn check_consistency(&self) -> Result<()> {
        let sizes = self.sizes();
        let fresh = Network::configure(&sizes, self.activation)?;
        if fresh.weights.len() != self.weights.len() {
            return Err(NnError::InvalidConfiguration(format!(
                "{} weight matrices for {} layers",
                self.weights.len(),
                sizes.len()
            )));
        }
        for (a, b) in self.weights.iter().zip(fresh.weights.iter()) {
            if a.shape() != b.shape() || a.data.len() != a.rows || a.data.iter().any(|row| row.len() != a.cols) {
                return Err(NnError::mismatch("load_json weights", a.shape(), b.shape()));
            }
        }
        for layer in &self.layers {
            if layer.biases.len() != layer.count {
                return Err(NnError::mismatch("load_json biases", layer.biases.shape(), (layer.count, 1)));
            }
        }
        self.sgd.validate()
    }
}

/// Biases of every layer plus every weight matrix, or an `InvalidData` error
/// if that does not fit in `usize`.
fn parameter_count(sizes: &[usize]) -> Result<usize> {
    let too_big = || io::Error::new(io::ErrorKind::InvalidData, format!("model of shape {sizes:?} is too large"));
    let mut total = sizes.iter().try_fold(0usize, |acc, &s| acc.checked_add(s)).ok_or_else(too_big)?;
    for w in sizes.windows(2) {
        total = w[0]
            .checked_mul(w[1])
            .and_then(|n| total.checked_add(n))
            .ok_or_else(too_big)?;
    }
    Ok(total)
}

fn to_i32(n: usize) -> Result<i32> {
    i32::try_from(n).map_err(|_| NnError::InvalidConfiguration(format!("{n} does not fit the model format")))
}

fn write_i32<W: Write>(w: &mut W, v: i32) -> Result<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

fn read_i32<R: Read>(r: &mut R) -> Result<i32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

fn read_f64<R: Read>(r: &mut R) -> Result<f64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optim::sgd::Sgd;
    use rand::{rngs::StdRng, SeedableRng};
    use std::io::Cursor;

    fn initialized(sizes: &[usize], act: ActivationFunction, seed: u64) -> Network {
        let mut net = Network::configure(sizes, act).unwrap();
        net.initialize(&mut StdRng::seed_from_u64(seed));
        net
    }

    fn bytes_of(net: &Network) -> Vec<u8> {
        let mut buf = Vec::new();
        net.write_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn layout_of_a_tiny_network() {
        let mut net = Network::configure(&[1, 2], ActivationFunction::Softplus).unwrap();
        net.layers[0].biases[0] = 9.0;
        net.layers[1].biases[1] = -1.5;
        net.weights[0].data[1][0] = 0.25;

        let buf = bytes_of(&net);
        // 4 ints + (1 + 2) biases + 2 weights
        assert_eq!(buf.len(), 4 * 4 + 5 * 8);
        assert_eq!(&buf[0..4], &3i32.to_le_bytes());
        assert_eq!(&buf[4..8], &2i32.to_le_bytes());
        assert_eq!(&buf[8..12], &1i32.to_le_bytes());
        assert_eq!(&buf[12..16], &2i32.to_le_bytes());
        assert_eq!(&buf[16..24], &9.0f64.to_le_bytes());
        assert_eq!(&buf[32..40], &(-1.5f64).to_le_bytes());
        assert_eq!(&buf[48..56], &0.25f64.to_le_bytes());
    }

    #[test]
    fn round_trip_every_activation() {
        for (seed, act) in ActivationFunction::ALL.into_iter().enumerate() {
            let net = initialized(&[4, 3, 2], act, seed as u64);
            let back = Network::read_from(&mut Cursor::new(bytes_of(&net))).unwrap();
            assert_eq!(back.activation(), act);
            assert_eq!(back.sizes(), net.sizes());
            assert_eq!(back.weights, net.weights);
            for (a, b) in back.layers().iter().zip(net.layers()) {
                assert_eq!(a.biases, b.biases);
            }
        }
    }

    #[test]
    fn truncated_stream_is_io_error() {
        let buf = bytes_of(&initialized(&[3, 2], ActivationFunction::Tanh, 1));
        for cut in [0, 3, 10, buf.len() - 1] {
            let err = Network::read_from(&mut Cursor::new(&buf[..cut])).unwrap_err();
            assert!(matches!(err, NnError::Io(_)), "cut at {cut}: {err}");
        }
    }

    #[test]
    fn unknown_activation_code() {
        let mut buf = bytes_of(&initialized(&[3, 2], ActivationFunction::Tanh, 1));
        buf[0..4].copy_from_slice(&42i32.to_le_bytes());
        assert!(matches!(
            Network::read_from(&mut Cursor::new(buf)),
            Err(NnError::UnsupportedActivation(42))
        ));
    }

    #[test]
    fn bad_layer_counts() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0i32.to_le_bytes());
        buf.extend_from_slice(&1i32.to_le_bytes());
        buf.extend_from_slice(&5i32.to_le_bytes());
        assert!(matches!(
            Network::read_from(&mut Cursor::new(&buf)),
            Err(NnError::InvalidConfiguration(_))
        ));

        let mut buf = Vec::new();
        buf.extend_from_slice(&0i32.to_le_bytes());
        buf.extend_from_slice(&(-2i32).to_le_bytes());
        assert!(matches!(
            Network::read_from(&mut Cursor::new(&buf)),
            Err(NnError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn oversized_header_without_payload_is_io_error() {
        let mut buf = Vec::new();
        for v in [1i32, 2, 200_000, 200_000] {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        assert!(matches!(Network::read_from(&mut buf.as_slice()), Err(NnError::Io(_))));
    }

    #[test]
    fn header_with_short_payload_is_io_error() {
        let mut buf = bytes_of(&initialized(&[3, 2], ActivationFunction::Tanh, 1));
        // claim a much wider hidden layer than the payload holds
        buf[8..12].copy_from_slice(&3000i32.to_le_bytes());
        let err = Network::read_from(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, NnError::Io(_)), "{err}");
    }

    #[test]
    fn parameter_count_covers_biases_and_weights() {
        assert_eq!(parameter_count(&[1, 2]).unwrap(), 3 + 2);
        assert_eq!(parameter_count(&[4, 3, 2]).unwrap(), 9 + 12 + 6);
        let err = parameter_count(&[usize::MAX / 2, 4]).unwrap_err();
        assert!(matches!(err, NnError::Io(ref e) if e.kind() == io::ErrorKind::InvalidData));
    }

    #[test]
    fn corrupt_but_complete_stream_loads() {
        let net = initialized(&[2, 2], ActivationFunction::Sigmoid, 3);
        let mut buf = bytes_of(&net);
        let last = buf.len() - 1;
        buf[last] ^= 0x40;
        let back = Network::read_from(&mut Cursor::new(buf)).unwrap();
        assert_eq!(back.sizes(), net.sizes());
        assert_ne!(back.weights, net.weights);
    }

    #[test]
    fn file_round_trips() {
        let dir = std::env::temp_dir();
        let bin = dir.join(format!("ferrite-ocr-persist-{}.bin", std::process::id()));
        let json = dir.join(format!("ferrite-ocr-persist-{}.json", std::process::id()));

        let mut net = initialized(&[5, 4, 3], ActivationFunction::LeakyReLU, 9);
        net.set_sgd(Sgd::new(0.05).with_l2(0.1).with_batch_size(16)).unwrap();

        net.save(&bin).unwrap();
        let back = Network::load(&bin).unwrap();
        assert_eq!(back.weights, net.weights);
        assert_eq!(back.sgd(), &Sgd::default());

        net.save_json(&json).unwrap();
        let back = Network::load_json(&json).unwrap();
        assert_eq!(back.weights, net.weights);
        assert_eq!(back.sgd(), net.sgd());

        std::fs::remove_file(bin).unwrap();
        std::fs::remove_file(json).unwrap();
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Network::load("/nonexistent/ferrite-ocr/model.bin").unwrap_err();
        assert!(matches!(err, NnError::Io(_)));
    }
}
