pub mod network;
pub mod spec;

pub use network::{residual, Network};
pub use spec::NetworkSpec;
