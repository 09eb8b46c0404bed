// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong in any specific
// business layer:
//
//   checkpoint.rs — Saving and loading model weights with
//                   Burn's CompactRecorder, plus the run's
//                   TrainConfig as JSON so evaluation can
//                   rebuild the same model and test split.
//
//   metrics.rs    — Training metrics logging
//                   Writes epoch-level metrics (lr, loss,
//                   accuracy) to a CSV file.

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;
