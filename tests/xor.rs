use rand::{rngs::StdRng, SeedableRng};

use ferrite_ocr::{run_epoch, ActivationFunction, Example, Network, Sgd};

fn xor() -> Vec<Example> {
    vec![
        Example::new(vec![0.0, 0.0], vec![0.0]),
        Example::new(vec![0.0, 1.0], vec![1.0]),
        Example::new(vec![1.0, 0.0], vec![1.0]),
        Example::new(vec![1.0, 1.0], vec![0.0]),
    ]
}

fn xor_one_hot() -> Vec<Example> {
    xor()
        .into_iter()
        .map(|ex| Example::one_hot(ex.input, ex.target[0] as usize, 2).unwrap())
        .collect()
}

fn train(sizes: &[usize], data: &[Example], epochs: usize, seed: u64) -> Network {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut net = Network::configure(sizes, ActivationFunction::Tanh).unwrap();
    net.initialize(&mut rng);
    net.set_sgd(Sgd::new(0.5).with_batch_size(4)).unwrap();
    for _ in 0..epochs {
        let stats = run_epoch(&mut net, data, &mut rng).unwrap();
        assert_eq!(stats.batch_sizes, vec![4]);
    }
    net
}

#[test]
fn single_output_learns_xor() {
    let data = xor();
    let mut net = train(&[2, 3, 1], &data, 500, 0);

    let cost = net.square_cost(&data).unwrap();
    assert!(cost < 0.01, "cost after 500 epochs: {cost}");
    for ex in &data {
        let y = net.forward(&ex.input).unwrap()[0];
        assert_eq!(y > 0.5, ex.target[0] > 0.5, "{:?} -> {y}", ex.input);
    }
    // argmax of a one-element vector is always 0
    assert_eq!(net.correct_count(&data).unwrap(), 4);
}

#[test]
fn one_hot_xor_is_fully_classified() {
    let data = xor_one_hot();
    let best = (0..10)
        .map(|seed| {
            let mut net = train(&[2, 4, 2], &data, 800, seed);
            net.correct_count(&data).unwrap()
        })
        .max()
        .unwrap();
    assert_eq!(best, 4);
}

#[test]
fn training_is_reproducible() {
    let data = xor();
    let mut a = train(&[2, 3, 1], &data, 20, 99);
    let mut b = train(&[2, 3, 1], &data, 20, 99);
    for ex in &data {
        assert_eq!(a.forward(&ex.input).unwrap(), b.forward(&ex.input).unwrap());
    }
}
