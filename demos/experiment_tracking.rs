//! Experiment Tracking Example
//!
//! Walks through one training run: config, metrics, model artifact, and
//! summary, all filed under `experiments/<name>/`.
//!
//! Run with: RUST_LOG=debug cargo run --example experiment_tracking

use anyhow::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use trueno_experiment::{ExperimentConfig, ExperimentContext};

/// Stand-in for whatever the training code produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LinearModel {
    weights: Vec<f64>,
    bias: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Trueno-Experiment Tracking ===\n");

    // -------------------------------------------------------------------------
    // 1. Create an experiment with configuration
    // -------------------------------------------------------------------------
    println!("1. Creating experiment...");

    let config = ExperimentConfig::try_from(serde_json::json!({
        "model": "linear",
        "learning_rate": 0.05,
        "epochs": 10,
        "random_seed": 7
    }))?;

    let mut ctx = ExperimentContext::new(config, Some("linear-demo"))?;
    let config_path = ctx.persist_config()?;

    println!("   Experiment: {}", ctx.name());
    println!("   Directory: {}", ctx.dir().display());
    println!("   Seed: {}", ctx.seed());
    println!("   Config: {}", config_path.display());

    // -------------------------------------------------------------------------
    // 2. Simulate training loop with metric logging
    // -------------------------------------------------------------------------
    println!("\n2. Simulating training (10 epochs)...");

    let mut model = LinearModel {
        weights: (0..4).map(|_| ctx.rng_mut().gen_range(-0.1..0.1)).collect(),
        bias: 0.0,
    };

    for epoch in 0..10_i64 {
        let noise: f64 = ctx.rng_mut().gen_range(-0.01..0.01);
        #[allow(clippy::cast_precision_loss)]
        let loss = 2.5 / (epoch as f64 + 1.0) + 0.1 + noise;
        let accuracy = 0.5 + 0.04 * epoch as f64;

        for w in &mut model.weights {
            *w += 0.05 * (1.0 - *w);
        }
        model.bias += 0.01;

        ctx.record_metric("loss", loss, Some(epoch));
        ctx.record_metric("accuracy", accuracy, Some(epoch));

        println!("   Epoch {epoch}: loss={loss:.4}, accuracy={accuracy:.4}");
    }
    ctx.record_metric("test_accuracy", 0.86, None);

    // -------------------------------------------------------------------------
    // 3. Save model artifact and results
    // -------------------------------------------------------------------------
    println!("\n3. Saving model and results...");

    let model_path = ctx.persist_artifact(model.clone())?;
    let results_path = ctx.persist_results()?;
    println!("   Model: {}", model_path.display());
    println!("   Results: {}", results_path.display());

    // -------------------------------------------------------------------------
    // 4. Reload the model
    // -------------------------------------------------------------------------
    println!("\n4. Reloading model...");

    let loaded: &LinearModel = ctx.load_artifact()?;
    println!("   Round-trip equal: {}", *loaded == model);

    // -------------------------------------------------------------------------
    // 5. Summary
    // -------------------------------------------------------------------------
    println!("\n5. Summary:");
    println!("{}", serde_json::to_string_pretty(&ctx.summarize())?);

    println!("\n=== Experiment Tracking Complete ===");
    Ok(())
}
