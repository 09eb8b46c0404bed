// ============================================================
// Layer 4 — Emotion Batcher
// ============================================================
// Implements Burn's Batcher trait to stack EmotionSamples into
// tensors for one forward pass.
//
//   Input:  N samples, each a [rows, cols] feature matrix
//   Output: features [N, rows, cols]   (float)
//           targets  [N]               (class index)
//
// rows×cols is 48×48 for the pixel net and 68×2 for the
// landmark net; every sample in a split has the same shape.
//
// Targets are class indices rather than one-hot rows: Burn's
// cross-entropy takes indices, which is the same loss as
// categorical cross-entropy against the one-hot encoding.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::domain::sample::EmotionSample;

// ─── EmotionBatch ─────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct EmotionBatch<B: Backend> {
    /// Feature matrices — shape: [batch_size, rows, cols]
    pub features: Tensor<B, 3>,

    /// Ground truth class indices — shape: [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

// ─── EmotionBatcher ───────────────────────────────────────────────────────────
/// Holds the target device so tensors are created on the right GPU/CPU.
#[derive(Clone, Debug)]
pub struct EmotionBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> EmotionBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<EmotionSample, EmotionBatch<B>> for EmotionBatcher<B> {
    fn batch(&self, items: Vec<EmotionSample>) -> EmotionBatch<B> {
        let batch_size   = items.len();
        let [rows, cols] = items.first().map(|s| s.dims).unwrap_or([0, 0]);

        // ── Flatten features ──────────────────────────────────────────────────
        // Samples are already row-major, so concatenating them gives
        // the row-major layout of [batch, rows, cols]
        let features_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.features.iter().copied())
            .collect();

        let targets: Vec<i64> = items
            .iter()
            .map(|s| s.label.index() as i64)
            .collect();

        let features = Tensor::<B, 3>::from_data(
            TensorData::new(features_flat, [batch_size, rows, cols]),
            &self.device,
        );

        let targets = Tensor::<B, 1, Int>::from_data(
            TensorData::new(targets, [batch_size]),
            &self.device,
        );

        EmotionBatch { features, targets }
    }
}
