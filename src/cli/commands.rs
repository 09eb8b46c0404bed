// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `train`, `evaluate` and
// `summary`, and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, enums)

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::train_use_case::{BackendKind, TrainConfig};
use crate::domain::variant::Variant;

/// The top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train NN1 (pixels) or NN2 (landmarks) on a CSV dataset
    Train(TrainArgs),

    /// Score a trained network on its held-out test split
    Evaluate(EvaluateArgs),

    /// Print a network's layer table and parameter counts
    Summary(SummaryArgs),
}

/// Which network to work with
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum VariantArg {
    /// NN1: convolutional net over 48×48 pixel grids
    Pixel,
    /// NN2: feature-group net over 68 facial landmarks
    Landmark,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Pixel    => Variant::Pixel,
            VariantArg::Landmark => Variant::Landmark,
        }
    }
}

/// Which tensor backend to run on
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum BackendArg {
    Wgpu,
    Ndarray,
}

impl From<BackendArg> for BackendKind {
    fn from(b: BackendArg) -> Self {
        match b {
            BackendArg::Wgpu    => BackendKind::Wgpu,
            BackendArg::Ndarray => BackendKind::NdArray,
        }
    }
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Network variant to train
    #[arg(long, value_enum)]
    pub variant: VariantArg,

    /// CSV file: `emotion,pixels[,Usage]` for pixel,
    /// `emotion` plus one column per feature group for landmark
    #[arg(long = "data")]
    pub data_path: PathBuf,

    /// Where checkpoints, metrics and the run config are written
    /// (default: artifacts/NN1 or artifacts/NN2)
    #[arg(long)]
    pub artifact_dir: Option<PathBuf>,

    /// Number of full passes through the training split
    #[arg(long, default_value_t = 16)]
    pub epochs: usize,

    /// Number of samples per mini-batch
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Initial Adam learning rate (default: 1e-4 pixel, 1e-3 landmark)
    #[arg(long)]
    pub lr: Option<f64>,

    /// Seed for the dataset shuffle and the mini-batch order
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Data loader worker threads
    #[arg(long, default_value_t = 1)]
    pub num_workers: usize,

    #[arg(long, value_enum, default_value_t = BackendArg::Wgpu)]
    pub backend: BackendArg,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        let variant = Variant::from(a.variant);
        let defaults = TrainConfig::for_variant(variant, a.data_path);

        TrainConfig {
            artifact_dir: a.artifact_dir.unwrap_or(defaults.artifact_dir.clone()),
            epochs:       a.epochs,
            batch_size:   a.batch_size,
            lr:           a.lr.unwrap_or(defaults.lr),
            seed:         a.seed,
            num_workers:  a.num_workers,
            backend:      a.backend.into(),
            ..defaults
        }
    }
}

/// All arguments for the `evaluate` command
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Artifact directory written by `train`
    #[arg(long)]
    pub artifact_dir: PathBuf,

    /// Backend override (default: the one used for training)
    #[arg(long, value_enum)]
    pub backend: Option<BackendArg>,
}

/// All arguments for the `summary` command
#[derive(Args, Debug)]
pub struct SummaryArgs {
    #[arg(long, value_enum)]
    pub variant: VariantArg,
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn train_config(args: &[&str]) -> TrainConfig {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Train(a) => a.into(),
            other => panic!("expected train, got {other:?}"),
        }
    }

    #[test]
    fn test_train_defaults_follow_variant() {
        let cfg = train_config(&["facial-emotion-nn", "train", "--variant", "pixel", "--data", "fer.csv"]);
        assert_eq!(cfg.variant, Variant::Pixel);
        assert_eq!(cfg.lr, 1e-4);
        assert_eq!(cfg.epochs, 16);
        assert_eq!(cfg.batch_size, 32);
        assert_eq!(cfg.artifact_dir, PathBuf::from("artifacts/NN1"));
        assert_eq!(cfg.backend, BackendKind::Wgpu);
    }

    #[test]
    fn test_train_flags_override_defaults() {
        let cfg = train_config(&[
            "facial-emotion-nn", "train",
            "--variant", "landmark",
            "--data", "lm.csv",
            "--lr", "0.01",
            "--seed", "7",
            "--artifact-dir", "out",
            "--backend", "ndarray",
        ]);
        assert_eq!(cfg.variant, Variant::Landmark);
        assert_eq!(cfg.lr, 0.01);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.artifact_dir, PathBuf::from("out"));
        assert_eq!(cfg.backend, BackendKind::NdArray);
    }

    #[test]
    fn test_unknown_variant_is_rejected() {
        assert!(Cli::try_parse_from(["facial-emotion-nn", "summary", "--variant", "audio"]).is_err());
    }
}
