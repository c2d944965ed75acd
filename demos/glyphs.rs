//! Trains a small classifier on synthetic 12x12 strokes ("|", "-", "/", "\")
//! rendered with a little positional jitter, then classifies fresh samples.

use env_logger::Env;
use image::{GrayImage, Luma};
use rand::{rngs::StdRng, Rng, SeedableRng};

use ferrite_ocr::{
    feature_vector, train_loop, ActivationFunction, Example, FeatureWindow, NetworkSpec, Sgd,
    TrainConfig,
};
use ferrite_ocr::network::ModelMetadata;

const SIDE: u32 = 12;
const LABELS: [&str; 4] = ["|", "-", "/", "\\"];

fn render(class: usize, shift: i32) -> GrayImage {
    GrayImage::from_fn(SIDE, SIDE, |x, y| {
        let (x, y) = (x as i32, y as i32);
        let c = SIDE as i32 / 2 + shift;
        let ink = match class {
            0 => x == c,
            1 => y == c,
            2 => x + y == SIDE as i32 - 1 + shift,
            _ => x - y == shift,
        };
        if ink { Luma([20]) } else { Luma([230]) }
    })
}

fn sample<R: Rng>(rng: &mut R, window: FeatureWindow) -> ferrite_ocr::Result<Example> {
    let class = rng.gen_range(0..LABELS.len());
    let img = render(class, rng.gen_range(-2..=2));
    let input = feature_vector(&img, window, 0.05)?;
    Example::one_hot(input, class, LABELS.len())
}

fn main() -> ferrite_ocr::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let window = FeatureWindow::new(SIDE, SIDE);
    let mut spec = NetworkSpec::new(
        "strokes",
        vec![window.len(), 16, LABELS.len()],
        ActivationFunction::Sigmoid,
        Sgd::new(1.0).with_l2(0.001).with_batch_size(8),
    );
    spec.seed = Some(3);
    spec.metadata = Some(ModelMetadata {
        description: Some("synthetic strokes".into()),
        input_window: Some(window),
        ink_fraction: Some(0.05),
        output_labels: Some(LABELS.iter().map(|s| s.to_string()).collect()),
    });

    let mut rng = StdRng::seed_from_u64(spec.seed.unwrap_or(0));
    let mut network = spec.build_initialized(&mut rng)?;

    let train: Vec<Example> = (0..200).map(|_| sample(&mut rng, window)).collect::<Result<_, _>>()?;
    let test: Vec<Example> = (0..50).map(|_| sample(&mut rng, window)).collect::<Result<_, _>>()?;

    train_loop(&mut network, &train, &TrainConfig::new(60).with_log_every(10), &mut rng)?;
    println!(
        "held-out accuracy: {}/{}",
        network.correct_count(&test)?,
        test.len()
    );

    let meta = spec.metadata.unwrap_or_default();
    for (class, label) in LABELS.iter().enumerate() {
        let input = feature_vector(&render(class, 1), window, 0.05)?;
        let guess = network.classify(&input)?;
        println!("drew {} -> read {}", label, meta.label_for(guess).unwrap_or("?"));
    }
    Ok(())
}
