// ============================================================
// Layer 3 — Network Variant
// ============================================================
// The two classifier families this project trains:
//
//   Pixel    ("NN1") — convolutional net over 48×48 grayscale faces
//   Landmark ("NN2") — per-region dense encoders over 68 landmarks
//
// Everything that differs between them at the configuration
// level (feature shape, default learning rate) is answered here.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::landmarks::{COORDS_PER_LANDMARK, NUM_LANDMARKS};

/// Side length of the square pixel grid.
pub const IMAGE_SIDE: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Pixel,
    Landmark,
}

impl Variant {
    /// Short model name used for artifacts and log lines.
    pub fn model_name(self) -> &'static str {
        match self {
            Variant::Pixel    => "NN1",
            Variant::Landmark => "NN2",
        }
    }

    /// Shape of one sample's feature matrix: [rows, cols].
    pub fn feature_dims(self) -> [usize; 2] {
        match self {
            Variant::Pixel    => [IMAGE_SIDE, IMAGE_SIDE],
            Variant::Landmark => [NUM_LANDMARKS, COORDS_PER_LANDMARK],
        }
    }

    /// Initial Adam learning rate when none is given.
    pub fn default_learning_rate(self) -> f64 {
        match self {
            Variant::Pixel    => 1e-4,
            Variant::Landmark => 1e-3,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Pixel    => f.write_str("pixel"),
            Variant::Landmark => f.write_str("landmark"),
        }
    }
}
