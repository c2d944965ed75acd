use clap::Parser;
use env_logger::Env;
use log::error;
use rand::{rngs::StdRng, SeedableRng};

use ferrite_ocr::{features, Network, NetworkSpec, Result};

/// Print the shape and activation of a saved model.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Info {
    #[clap(short, long)]
    model: String,
}

impl Info {
    fn exec(self) -> Result<()> {
        let net = Network::load(&self.model)?;
        println!("activation: {:?}", net.activation());
        println!("layers:     {:?}", net.sizes());
        let params: usize = (1..net.len())
            .filter_map(|i| net.weight(i))
            .map(|w| w.rows * w.cols)
            .sum::<usize>()
            + net.sizes().iter().skip(1).sum::<usize>();
        println!("parameters: {params}");
        Ok(())
    }
}

/// Build a freshly initialized model from a JSON spec and save it.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Init {
    #[clap(short, long)]
    spec: String,
    #[clap(short, long)]
    out: String,
    /// Overrides the seed in the spec.
    #[clap(long)]
    seed: Option<u64>,
}

impl Init {
    fn exec(self) -> Result<()> {
        let spec = NetworkSpec::load_json(&self.spec)?;
        let seed = self.seed.or(spec.seed).unwrap_or(0);
        let net = spec.build_initialized(&mut StdRng::seed_from_u64(seed))?;
        net.save(&self.out)
    }
}

/// Classify a glyph image with a saved model.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Classify {
    #[clap(short, long)]
    model: String,
    /// Spec whose metadata holds the feature window and output labels.
    #[clap(short, long)]
    spec: String,
    #[clap(short, long)]
    image: String,
}

impl Classify {
    fn exec(self) -> Result<()> {
        let spec = NetworkSpec::load_json(&self.spec)?;
        let meta = spec.metadata.unwrap_or_default();
        let window = meta.input_window.ok_or_else(|| {
            ferrite_ocr::NnError::InvalidConfiguration("spec metadata has no input_window".into())
        })?;
        let input = features::feature_vector_from_path(&self.image, window, meta.ink_fraction.unwrap_or(0.2))?;

        let mut net = Network::load(&self.model)?;
        let class = net.classify(&input)?;
        match meta.label_for(class) {
            Some(label) => println!("{label}"),
            None => println!("{class}"),
        }
        Ok(())
    }
}

#[derive(Parser)]
#[clap(author, version, about = "ferrite-ocr: feedforward networks for glyph recognition")]
enum SubCommand {
    Info(Info),
    Init(Init),
    Classify(Classify),
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let res = match SubCommand::parse() {
        SubCommand::Info(info) => info.exec(),
        SubCommand::Init(init) => init.exec(),
        SubCommand::Classify(classify) => classify.exec(),
    };

    if let Err(e) = res {
        error!("{e}");
        std::process::exit(1);
    }
}
