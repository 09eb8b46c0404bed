// ============================================================
// Layer 4 — Train/Validation/Test Splitter
// ============================================================
// Shuffles samples with a seeded RNG, then cuts them into three
// contiguous, order-preserving partitions:
//
//   val_amount  = round(N * 0.2)
//   test_amount = round(N * 0.1)
//   boundary1   = N - val_amount - test_amount
//   boundary2   = N - test_amount
//
//   training   = rows[0 .. boundary1]
//   validation = rows[boundary1 .. boundary2]
//   testing    = rows[boundary2 .. N]
//
// Only the validation and test sizes are rounded; training takes
// whatever remains, so no row is ever dropped or duplicated.
// Rounding is half-to-even (N = 5 → test = round(0.5) = 0).
//
// The shuffle uses ChaCha8 seeded from a u64, so a given seed
// yields the same permutation on every platform and release.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::split::{DatasetSplits, SplitSizes};

/// Fraction of rows held out for validation.
pub const VALIDATION_FRACTION: f64 = 0.2;

/// Fraction of rows held out for testing.
pub const TESTING_FRACTION: f64 = 0.1;

/// Deterministically shuffle `rows` in place.
pub fn shuffle_seeded<T>(rows: &mut [T], seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rows.shuffle(&mut rng);
}

/// Split sizes for a dataset of `total` rows.
pub fn split_sizes(total: usize) -> SplitSizes {
    let n          = total as f64;
    let validation = (n * VALIDATION_FRACTION).round_ties_even() as usize;
    let testing    = (n * TESTING_FRACTION).round_ties_even() as usize;

    // Never more held-out rows than exist (only matters for tiny N)
    let testing    = testing.min(total);
    let validation = validation.min(total - testing);

    SplitSizes {
        training: total - validation - testing,
        validation,
        testing,
    }
}

/// Cut already-shuffled rows into training / validation / testing.
pub fn partition<T>(mut rows: Vec<T>) -> DatasetSplits<T> {
    let total = rows.len();
    let sizes = split_sizes(total);

    let boundary1 = total - sizes.validation - sizes.testing;
    let boundary2 = total - sizes.testing;

    // split_off(n) keeps [0..n) and returns [n..)
    let testing    = rows.split_off(boundary2);
    let validation = rows.split_off(boundary1);
    let training   = rows;

    tracing::debug!(
        "Dataset split: {} training, {} validation, {} testing ({}% / {}% / {}%)",
        training.len(),
        validation.len(),
        testing.len(),
        (training.len()   * 100) / total.max(1),
        (validation.len() * 100) / total.max(1),
        (testing.len()    * 100) / total.max(1),
    );

    DatasetSplits { training, validation, testing }
}

/// Shuffle with `seed`, then partition.
pub fn shuffle_and_partition<T>(mut rows: Vec<T>, seed: u64) -> DatasetSplits<T> {
    shuffle_seeded(&mut rows, seed);
    partition(rows)
}
