// ============================================================
// Layer 5 — Evaluator
// ============================================================
// Runs a model over a split without gradients and reports:
//   - mean cross-entropy loss (weighted by batch size)
//   - accuracy
//   - a confusion matrix, rows = actual, columns = predicted
//
// Used for per-epoch validation and for the held-out test split.

use anyhow::{anyhow, Result};
use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::data::{batcher::{EmotionBatch, EmotionBatcher}, dataset::EmotionDataset};
use crate::domain::emotion::{Emotion, NUM_CLASSES};
use crate::ml::net::EmotionNet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub samples:   usize,
    /// NaN when the split is empty
    pub loss:      f64,
    pub accuracy:  f64,
    /// confusion[actual][predicted]
    pub confusion: [[usize; NUM_CLASSES]; NUM_CLASSES],
}

impl EvaluationReport {
    /// Recall of one class, None if the split holds no such samples.
    pub fn class_accuracy(&self, emotion: Emotion) -> Option<f64> {
        let row     = &self.confusion[emotion.index()];
        let support: usize = row.iter().sum();
        (support > 0).then(|| row[emotion.index()] as f64 / support as f64)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "samples:  {}", self.samples);
        let _ = writeln!(out, "loss:     {:.4}", self.loss);
        let _ = writeln!(out, "accuracy: {:.1}%", self.accuracy * 100.0);
        for emotion in Emotion::ALL {
            let support: usize = self.confusion[emotion.index()].iter().sum();
            match self.class_accuracy(emotion) {
                Some(acc) => {
                    let _ = writeln!(out, "  {:<9} {:>6.1}%  (n={})", emotion.name(), acc * 100.0, support);
                }
                None => {
                    let _ = writeln!(out, "  {:<9}      -  (n=0)", emotion.name());
                }
            }
        }
        out
    }
}

/// Running totals across batches.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    loss_sum:  f64,
    samples:   usize,
    confusion: [[usize; NUM_CLASSES]; NUM_CLASSES],
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `loss` is the batch mean; predictions and targets are class indices.
    pub fn add_batch(&mut self, loss: f64, predictions: &[i64], targets: &[i64]) {
        let n = targets.len();
        self.loss_sum += loss * n as f64;
        self.samples  += n;
        for (&p, &t) in predictions.iter().zip(targets) {
            self.confusion[t as usize][p as usize] += 1;
        }
    }

    pub fn finish(self) -> EvaluationReport {
        let correct: usize = (0..NUM_CLASSES).map(|i| self.confusion[i][i]).sum();
        let (loss, accuracy) = if self.samples > 0 {
            (self.loss_sum / self.samples as f64, correct as f64 / self.samples as f64)
        } else {
            (f64::NAN, 0.0)
        };

        EvaluationReport {
            samples: self.samples,
            loss,
            accuracy,
            confusion: self.confusion,
        }
    }
}

fn to_indices<B: Backend>(tensor: Tensor<B, 1, Int>) -> Result<Vec<i64>> {
    tensor
        .into_data()
        .convert::<i64>()
        .to_vec::<i64>()
        .map_err(|e| anyhow!("Cannot read class indices: {e:?}"))
}

/// Evaluate over every batch a loader yields.
pub fn evaluate<B: Backend, M: EmotionNet<B>>(
    model:  &M,
    loader: &dyn DataLoader<EmotionBatch<B>>,
) -> Result<EvaluationReport> {
    let mut acc = Accumulator::new();

    for batch in loader.iter() {
        let (loss, logits) = model.forward_loss(batch.features, batch.targets.clone());
        let loss: f64 = loss.into_scalar().elem::<f64>();

        // argmax(1) returns shape [batch, 1]; flatten to [batch]
        let predicted = logits.argmax(1).flatten::<1>(0, 1);

        acc.add_batch(loss, &to_indices(predicted)?, &to_indices(batch.targets)?);
    }

    Ok(acc.finish())
}

/// Evaluate a whole split in order, without shuffling.
pub fn evaluate_dataset<B: Backend, M: EmotionNet<B>>(
    model:      &M,
    dataset:    EmotionDataset,
    batch_size: usize,
    device:     &B::Device,
) -> Result<EvaluationReport> {
    let loader = DataLoaderBuilder::new(EmotionBatcher::<B>::new(device.clone()))
        .batch_size(batch_size.max(1))
        .build(dataset);
    evaluate(model, &*loader)
}
