// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Metrics recorded per epoch:
//   - epoch:      the epoch number (1, 2, 3, ...)
//   - lr:         learning rate the epoch trained with
//   - train_loss: average cross-entropy loss on the training split
//   - val_loss:   average cross-entropy loss on the validation split
//   - val_acc:    fraction of validation samples classified correctly
//
// Output file: <artifact_dir>/metrics.csv
//
// Example CSV output:
//   epoch,lr,train_loss,val_loss,val_acc
//   1,0.0001,1.824500,1.789200,0.283000
//   2,0.0001,1.690100,1.654300,0.334000
//
// An empty validation split logs NaN loss and 0 accuracy.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
};

/// Column order of metrics.csv. Matches the field order of EpochMetrics.
pub const METRICS_HEADER: [&str; 5] = ["epoch", "lr", "train_loss", "val_loss", "val_acc"];

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Learning rate used for this epoch
    pub lr: f64,

    pub train_loss: f64,
    pub val_loss:   f64,

    /// Fraction of validation samples predicted correctly, in [0, 1]
    pub val_acc: f64,
}

impl EpochMetrics {
    pub fn new(
        epoch:      usize,
        lr:         f64,
        train_loss: f64,
        val_loss:   f64,
        val_acc:    f64,
    ) -> Self {
        Self { epoch, lr, train_loss, val_loss, val_acc }
    }
}

/// Appends one CSV row per epoch to <artifact_dir>/metrics.csv.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Start a fresh metrics log for a training run,
    /// replacing any log left by a previous run.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");
        let mut writer = csv::Writer::from_path(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writer.write_record(METRICS_HEADER)?;
        writer.flush()?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(m)?;
        writer.flush()?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_loss={:.4}, val_acc={:.4}",
            m.epoch,
            m.train_loss,
            m.val_loss,
            m.val_acc,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
