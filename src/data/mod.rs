// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from a CSV dataset file to
// tensor batches.
//
// The pipeline flows in this order:
//
//   dataset .csv
//       │
//       ▼
//   Table             → reads rows, trims whitespace, finds columns
//       │
//       ▼
//   PixelLoader /     → parses each row into an EmotionSample
//   LandmarkLoader      (48×48 pixels or 68×2 landmarks + label)
//       │
//       ▼
//   splitter          → seeded shuffle, 70/20/10 partition
//       │
//       ▼
//   EmotionDataset    → implements Burn's Dataset trait
//       │
//       ▼
//   EmotionBatcher    → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Typed loading errors (row index + field on parse failures)
pub mod error;

/// CSV table reading shared by both loaders
pub mod table;

/// Shuffles and splits data into train/validation/test sets
pub mod splitter;

/// Loads 48×48 pixel rows (NN1)
pub mod pixel_loader;

/// Loads 68-point landmark rows (NN2)
pub mod landmark_loader;

/// Implements Burn's Dataset trait for emotion samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

use crate::domain::traits::EmotionSource;
use crate::domain::variant::Variant;

/// The loader matching a network variant.
pub fn source_for(variant: Variant) -> Box<dyn EmotionSource> {
    match variant {
        Variant::Pixel    => Box::new(pixel_loader::PixelLoader::new()),
        Variant::Landmark => Box::new(landmark_loader::LandmarkLoader::new()),
    }
}
