// ============================================================
// Layer 3 — Dataset Splits
// ============================================================
// The three partitions a loader produces. Each field is an
// ordered slice of the shuffled dataset:
//
//   training   — rows [0, b1)       ~70%
//   validation — rows [b1, b2)      ~20%
//   testing    — rows [b2, N)       ~10%
//
// The partitioning arithmetic lives in data::splitter; this
// type only names the result.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSplits<T> {
    /// Rows used to update model weights
    pub training: Vec<T>,

    /// Rows evaluated after each epoch
    pub validation: Vec<T>,

    /// Held-out rows, never seen during training
    pub testing: Vec<T>,
}

/// Row counts of each split, for logging and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSizes {
    pub training:   usize,
    pub validation: usize,
    pub testing:    usize,
}

impl SplitSizes {
    pub fn total(&self) -> usize {
        self.training + self.validation + self.testing
    }
}

impl<T> DatasetSplits<T> {
    pub fn sizes(&self) -> SplitSizes {
        SplitSizes {
            training:   self.training.len(),
            validation: self.validation.len(),
            testing:    self.testing.len(),
        }
    }

    pub fn total(&self) -> usize {
        self.sizes().total()
    }
}
