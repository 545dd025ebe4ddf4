// Gradient-free training: mutate-and-select on the AND gate, then a short run of
// gradient descent on the winner.
//
//   cargo run --example gates
use ferrite_evo::evolve::{hill_climb, Mutation, SearchConfig};
use ferrite_evo::math::random;
use ferrite_evo::train::{datasets, evaluate, train_cyclic, TrainConfig};
use ferrite_evo::{ActivationFunction, MseLoss, Network};

fn main() -> ferrite_evo::Result<()> {
    tracing_subscriber::fmt().init();
    random::seed(7);

    let samples = datasets::and_gate();
    let mut parent = Network::new(1.0, &[2, 1])?;
    parent.set_all_layers_activation(ActivationFunction::Sigmoid);
    println!("parent loss: {:.6}", MseLoss::over_samples(&parent, &samples)?);

    let config = SearchConfig {
        generations: 300,
        population: 10,
        mutation: Mutation::Gaussian { std_dev: 0.5 },
    };
    let found = random::with_rng(|rng| hill_climb(&parent, &samples, &config, rng))?;
    println!(
        "after search: {:.6} ({} improving generations)",
        found.loss, found.improvements
    );
    println!("parent loss is still {:.6}", MseLoss::over_samples(&parent, &samples)?);

    let mut child = found.network;
    let report = train_cyclic(&mut child, &samples, &TrainConfig::new(20_000))?;
    println!("after gradient descent: {:.6}", report.final_loss);

    for result in &evaluate(&child, &samples, 1e-2)?.results {
        println!("{result}");
    }
    println!("\n{child}");
    Ok(())
}
