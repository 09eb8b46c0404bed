// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `train`    — trains NN1 or NN2 on a CSV dataset
//   2. `evaluate` — loads a checkpoint and scores the test split
//   3. `summary`  — prints a network's layers and parameter counts

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvaluateArgs, SummaryArgs, TrainArgs};

use crate::domain::variant::Variant;

/// The main CLI struct: clap generates the argument parsing
/// from the Parser derive.
#[derive(Parser, Debug)]
#[command(
    name = "facial-emotion-nn",
    version,
    about = "Train and evaluate facial-emotion classifiers over pixels (NN1) or landmarks (NN2)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => run_train(args),
            Commands::Evaluate(args) => run_evaluate(args),
            Commands::Summary(args)  => run_summary(args),
        }
    }
}

/// Handles the `train` subcommand.
fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on: {}", args.data_path.display());

    let use_case = TrainUseCase::new(args.into());
    let report = use_case.execute()?;

    println!("Training complete. Test split:\n{}", report.render());
    Ok(())
}

/// Handles the `evaluate` subcommand.
fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    let use_case = EvaluateUseCase::new(args.artifact_dir, args.backend.map(Into::into))?;
    let report = use_case.execute()?;

    println!("{} test split:\n{}", use_case.variant().model_name(), report.render());
    Ok(())
}

/// Handles the `summary` subcommand.
fn run_summary(args: SummaryArgs) -> Result<()> {
    let variant = Variant::from(args.variant);
    println!("{}", crate::ml::render_summary(variant));
    Ok(())
}
