pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod features;

// Convenience re-exports
pub use error::{NnError, Result};
pub use math::matrix::Matrix;
pub use math::vector::Vector;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::network::Network;
pub use network::backprop::Gradients;
pub use network::spec::NetworkSpec;
pub use loss::squared_error::SquaredError;
pub use optim::sgd::Sgd;
pub use train::example::Example;
pub use train::loop_fn::{run_epoch, train_loop};
pub use train::train_config::TrainConfig;
pub use features::{feature_vector, FeatureWindow};
