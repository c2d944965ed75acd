use std::time::Instant;

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::Result;
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::example::Example;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// One full pass of mini-batch SGD over `examples`.
///
/// The example order is shuffled uniformly with `rng`, then cut into
/// consecutive batches of the network's configured batch size (the last
/// batch may be shorter) and one gradient step is applied per batch.
///
/// Blocks until the whole pass is done. Sizes and hyperparameters are
/// checked up front, so a rejected call leaves the network untouched.
pub fn run_epoch<R: Rng + ?Sized>(
    network: &mut Network,
    examples: &[Example],
    rng: &mut R,
) -> Result<EpochStats> {
    network.sgd().validate()?;
    let (n_in, n_out) = (network.input_size(), network.output_size());
    for ex in examples {
        ex.check(n_in, n_out)?;
    }

    let t_start = Instant::now();
    let batch_size = network.sgd().batch_size;

    let mut indices: Vec<usize> = (0..examples.len()).collect();
    indices.shuffle(rng);

    let mut batch_sizes = Vec::with_capacity(examples.len().div_ceil(batch_size));
    for batch in indices.chunks(batch_size) {
        let used = network.train_batch(batch.iter().map(|&i| &examples[i]))?;
        batch_sizes.push(used);
    }

    let stats = EpochStats {
        batch_sizes,
        elapsed_ms: t_start.elapsed().as_millis() as u64,
    };
    debug!(
        "epoch: {} examples in {} batches, {} ms",
        stats.examples(),
        stats.steps(),
        stats.elapsed_ms
    );
    Ok(stats)
}

/// Trains `network` for `config.epochs` epochs and returns the square cost
/// over `examples` after the last one.
///
/// Progress is logged every `config.log_every` epochs and a binary snapshot
/// is written every `config.snapshot_every` epochs.
pub fn train_loop<R: Rng + ?Sized>(
    network: &mut Network,
    examples: &[Example],
    config: &TrainConfig,
    rng: &mut R,
) -> Result<f64> {
    config.validate()?;

    for epoch in 1..=config.epochs {
        let stats = run_epoch(network, examples, rng)?;

        // ── Progress ──────────────────────────────────────────────────────
        if config.log_every > 0 && epoch % config.log_every == 0 {
            let cost = network.square_cost(examples)?;
            let correct = network.correct_count(examples)?;
            info!(
                "epoch {}/{}: cost {:.6}, correct {}/{} ({} ms)",
                epoch,
                config.epochs,
                cost,
                correct,
                examples.len(),
                stats.elapsed_ms
            );
        }

        // ── Snapshot ──────────────────────────────────────────────────────
        if config.snapshot_every > 0 && epoch % config.snapshot_every == 0 {
            if let Some(ref path) = config.snapshot_path {
                network.save(path)?;
            }
        }
    }

    let cost = network.square_cost(examples)?;
    info!("training finished after {} epochs: cost {:.6}", config.epochs, cost);
    Ok(cost)
}
