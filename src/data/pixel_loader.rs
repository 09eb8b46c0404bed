// ============================================================
// Layer 4 — Pixel Dataset Loader (NN1)
// ============================================================
// Loads FER-style CSV files:
//
//   emotion,pixels,Usage
//   0,70 80 82 72 58 ... (2304 values),Training
//
// Each "pixels" field holds 48×48 = 2304 space-separated
// intensities in 0..=255. They are scaled to [0, 1] and stored
// row-major as a 48×48 grid (single channel implied).
//
// The "Usage" column is left in the table but never read:
// partitioning is done here, not by the file's own labels.
//
// A pixel field with any other token count is rejected; it is
// never truncated or padded.

use std::path::Path;

use csv::StringRecord;

use crate::data::error::LoadError;
use crate::data::table::{field, parse_emotion, split_samples, Table, EMOTION_COLUMN};
use crate::domain::sample::EmotionSample;
use crate::domain::split::DatasetSplits;
use crate::domain::traits::EmotionSource;
use crate::domain::variant::IMAGE_SIDE;

pub const PIXELS_COLUMN: &str = "pixels";

/// Upstream train/test labels; never read.
pub const USAGE_COLUMN: &str = "Usage";

/// Intensities per image.
pub const PIXEL_COUNT: usize = IMAGE_SIDE * IMAGE_SIDE;

const MAX_INTENSITY: f32 = 255.0;

#[derive(Debug, Default, Clone, Copy)]
pub struct PixelLoader;

impl PixelLoader {
    pub fn new() -> Self {
        Self
    }
}

/// Column positions resolved once per file.
struct PixelColumns {
    emotion: usize,
    pixels:  usize,
}

impl PixelColumns {
    fn locate(table: &Table) -> Result<Self, LoadError> {
        if table.has_column(USAGE_COLUMN) {
            tracing::debug!("'{}' column present; retained but unused", USAGE_COLUMN);
        }
        Ok(Self {
            emotion: table.column(EMOTION_COLUMN)?,
            pixels:  table.column(PIXELS_COLUMN)?,
        })
    }

    fn parse(&self, row: usize, record: &StringRecord) -> Result<EmotionSample, LoadError> {
        let label  = parse_emotion(field(record, row, self.emotion, EMOTION_COLUMN)?, row)?;
        let pixels = parse_pixels(field(record, row, self.pixels, PIXELS_COLUMN)?, row)?;

        Ok(EmotionSample::new(pixels, [IMAGE_SIDE, IMAGE_SIDE], label))
    }
}

impl EmotionSource for PixelLoader {
    fn load_splits(&self, path: &Path, seed: u64) -> Result<DatasetSplits<EmotionSample>, LoadError> {
        tracing::info!("Loading pixel data from '{}'", path.display());

        let table   = Table::open(path)?;
        let columns = PixelColumns::locate(&table)?;
        let samples = table.parse_rows(|row, record| columns.parse(row, record))?;

        Ok(split_samples(samples, seed))
    }
}

/// Parse a space-separated intensity string into 2304 values in [0, 1].
pub fn parse_pixels(raw: &str, row: usize) -> Result<Vec<f32>, LoadError> {
    let pixels = raw
        .split_whitespace()
        .enumerate()
        .map(|(i, token)| {
            token
                .parse::<f32>()
                .map(normalize_intensity)
                .map_err(|_| {
                    LoadError::parse(
                        row,
                        PIXELS_COLUMN,
                        format!("token {i} ('{token}') is not a number"),
                    )
                })
        })
        .collect::<Result<Vec<f32>, _>>()?;

    if pixels.len() != PIXEL_COUNT {
        return Err(LoadError::parse(
            row,
            PIXELS_COLUMN,
            format!("expected {PIXEL_COUNT} intensities, found {}", pixels.len()),
        ));
    }

    Ok(pixels)
}

/// Scale a 0..=255 intensity into [0, 1].
pub fn normalize_intensity(value: f32) -> f32 {
    value / MAX_INTENSITY
}
