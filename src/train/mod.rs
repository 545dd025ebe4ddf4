pub mod datasets;
pub mod train_config;
pub mod trainer;

pub use train_config::TrainConfig;
pub use trainer::{evaluate, train_cyclic, Evaluation, Sample, SampleResult, TrainReport};
