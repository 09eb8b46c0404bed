// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer loads data through this trait so it
// never needs to know whether rows hold pixels or landmarks.
//
//   - PixelLoader    implements EmotionSource
//   - LandmarkLoader implements EmotionSource

use std::path::Path;

use crate::data::error::LoadError;
use crate::domain::sample::EmotionSample;
use crate::domain::split::DatasetSplits;

// ─── EmotionSource ────────────────────────────────────────────────────────────
/// Any component that turns a dataset file into train/val/test splits.
pub trait EmotionSource {
    /// Parse every row of `path`, shuffle with `seed`, and partition.
    /// The same file and seed always produce identical splits.
    fn load_splits(&self, path: &Path, seed: u64) -> Result<DatasetSplits<EmotionSample>, LoadError>;
}
