// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses command line arguments with clap and prints results.
// All workflow logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `train`   — trains the model, then predicts the held-out window
//   2. `predict` — loads a checkpoint and predicts one window
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PredictArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "sensor-attention-regressor",
    version = "0.1.0",
    about = "Train a self-attention regression model on windowed sensor data, then predict."
)]
pub struct Cli {
    /// The subcommand to run (train or predict)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Predict(args) => run_predict(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on '{}'", args.data_path);

    let outcome = TrainUseCase::new(args.into()).execute()?;

    println!("Train features shape: {:?}", outcome.train_features_shape);
    println!("Train target shape:   ({},)", outcome.train_target_len);
    println!("Held-out shape:       {:?}", outcome.test_shape);
    println!("Windows: {} in {} batches", outcome.windows, outcome.batches);
    println!("Trainable params: {}", outcome.report.model_params);

    if let Some(loss) = outcome.report.final_loss() {
        println!(
            "Training complete. Final loss {:.6}, best {:.6} at epoch {}.",
            loss, outcome.report.best_loss, outcome.report.best_epoch
        );
    }
    println!("Epoch metrics:        {}", outcome.metrics_path.display());

    match outcome.holdout {
        Some(prediction) => println!("Held-out prediction: {prediction}"),
        None => println!("Held-out slice shorter than one window; no prediction."),
    }
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let prediction = PredictUseCase::new(args.checkpoint_dir, args.data_path, args.offset)
        .execute()?;

    println!("\nPrediction: {prediction}");
    Ok(())
}
