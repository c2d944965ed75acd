pub mod epoch_stats;
pub mod example;
pub mod loop_fn;
pub mod train_config;

pub use epoch_stats::EpochStats;
pub use example::Example;
pub use loop_fn::{run_epoch, train_loop};
pub use train_config::TrainConfig;
