pub mod backprop;
pub mod evaluate;
pub mod metadata;
pub mod network;
pub mod persist;
pub mod spec;

pub use backprop::Gradients;
pub use metadata::ModelMetadata;
pub use network::Network;
pub use spec::NetworkSpec;
