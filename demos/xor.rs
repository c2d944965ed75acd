use env_logger::Env;
use rand::{rngs::StdRng, SeedableRng};

use ferrite_ocr::{train_loop, ActivationFunction, Example, Network, Sgd, TrainConfig};

fn main() -> ferrite_ocr::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut rng = StdRng::seed_from_u64(7);
    let mut network = Network::configure(&[2, 3, 1], ActivationFunction::Tanh)?;
    network.initialize(&mut rng);
    network.set_sgd(Sgd::new(0.5).with_batch_size(4))?;

    let examples = vec![
        Example::new(vec![1.0, 0.0], vec![1.0]),
        Example::new(vec![1.0, 1.0], vec![0.0]),
        Example::new(vec![0.0, 1.0], vec![1.0]),
        Example::new(vec![0.0, 0.0], vec![0.0]),
    ];

    let config = TrainConfig::new(1000).with_log_every(100);
    train_loop(&mut network, &examples, &config, &mut rng)?;

    for ex in &examples {
        let out = network.forward(&ex.input)?;
        println!("Input: {:?} -> Output: {:.4}", ex.input.as_slice(), out[0]);
    }
    Ok(())
}
