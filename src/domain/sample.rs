// ============================================================
// Layer 3 — Emotion Sample
// ============================================================
// One labelled example after feature extraction. The feature
// matrix is stored row-major in a flat Vec so both variants
// share one type:
//
//   pixel    — 48×48 intensities in [0, 1]
//   landmark — 68×2 raw (x, y) coordinates

use serde::{Deserialize, Serialize};

use crate::domain::emotion::{Emotion, NUM_CLASSES};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionSample {
    /// Row-major feature matrix, `dims[0] * dims[1]` values
    pub features: Vec<f32>,

    /// [rows, cols] of the feature matrix
    pub dims: [usize; 2],

    /// Ground-truth class
    pub label: Emotion,
}

impl EmotionSample {
    pub fn new(features: Vec<f32>, dims: [usize; 2], label: Emotion) -> Self {
        debug_assert_eq!(features.len(), dims[0] * dims[1]);
        Self { features, dims, label }
    }

    /// One row of the feature matrix.
    pub fn row(&self, index: usize) -> &[f32] {
        let cols = self.dims[1];
        &self.features[index * cols..(index + 1) * cols]
    }

    pub fn one_hot(&self) -> [f32; NUM_CLASSES] {
        self.label.one_hot()
    }
}
