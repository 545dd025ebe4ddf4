// Trains the logic-gate scenarios and prints pass/fail per sample.
//
//   cargo run -- [train-config.json]
//
// Set RUST_LOG=debug for construction and progress details.
use ferrite_evo::train::{datasets, evaluate, train_cyclic, Sample, TrainConfig};
use ferrite_evo::{ActivationFunction, Network, NetworkSpec, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => TrainConfig::load_json(path)?,
        None => TrainConfig::new(400_000),
    };
    info!(?config, "starting");

    // Single sigmoid neuron.
    let mut and = Network::new(2.0, &[2, 1])?;
    and.set_all_layers_activation(ActivationFunction::Sigmoid);
    run("AND", &mut and, &datasets::and_gate(), &config)?;

    // Same neuron, non-separable target: expected to fail.
    let mut xor_flat = Network::new(0.5, &[2, 1])?;
    xor_flat.set_all_layers_activation(ActivationFunction::Sigmoid);
    run("XOR, no hidden layer", &mut xor_flat, &datasets::xor_gate(), &config)?;

    let mut xor = Network::new(0.5, &[2, 2, 1])?;
    xor.set_all_except_final_activation(ActivationFunction::Tanh);
    xor.set_final_layer_activation(ActivationFunction::Sigmoid);
    run("XOR, 2 hidden units", &mut xor, &datasets::xor_gate(), &config)?;

    let mut spec = NetworkSpec::new(0.05, vec![4, 8, 6, 1]);
    spec.name = "odd count".to_string();
    spec.hidden_activation = Some(ActivationFunction::HardTanh);
    spec.final_activation = Some(ActivationFunction::HardSigmoid);
    let mut parity = spec.build()?;
    run("odd count (4 bits)", &mut parity, &datasets::odd_count(4)?, &config)?;

    Ok(())
}

fn run(name: &str, network: &mut Network, samples: &[Sample], config: &TrainConfig) -> Result<()> {
    let report = train_cyclic(network, samples, config)?;
    let eval = evaluate(network, samples, config.tolerance)?;

    println!("== {name} (loss {:.6})", report.final_loss);
    for result in &eval.results {
        println!("{result}");
    }
    println!("{}/{} correct\n", eval.correct_count(), eval.results.len());
    Ok(())
}
