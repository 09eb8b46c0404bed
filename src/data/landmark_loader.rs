// ============================================================
// Layer 4 — Landmark Dataset Loader (NN2)
// ============================================================
// Loads CSV files with one column per facial feature group:
//
//   emotion,jaw,right_brow,left_brow,nose,right_eye,left_eye,mouth,lips
//   3,"12.40 13.52 ...","...",...
//
// Every group cell holds space-separated "x.y" tokens, one per
// landmark, where the dot separates the x and y coordinates.
// Splitting on the dot only works for integer coordinates: a
// token such as "1.5.2.5" does not describe one point and is
// rejected rather than misread.
//
// Groups are concatenated in FeatureGroup::LOADER_ORDER
// (right_brow before left_brow) into a 68×2 matrix.

use std::path::Path;

use csv::StringRecord;

use crate::data::error::LoadError;
use crate::data::table::{field, parse_emotion, split_samples, Table, EMOTION_COLUMN};
use crate::domain::landmarks::{FeatureGroup, COORDS_PER_LANDMARK, NUM_LANDMARKS};
use crate::domain::sample::EmotionSample;
use crate::domain::split::DatasetSplits;
use crate::domain::traits::EmotionSource;

#[derive(Debug, Default, Clone, Copy)]
pub struct LandmarkLoader;

impl LandmarkLoader {
    pub fn new() -> Self {
        Self
    }
}

/// Column positions resolved once per file, in loader order.
struct LandmarkColumns {
    emotion: usize,
    groups:  Vec<(FeatureGroup, usize)>,
}

impl LandmarkColumns {
    fn locate(table: &Table) -> Result<Self, LoadError> {
        let groups = FeatureGroup::LOADER_ORDER
            .iter()
            .map(|&g| table.column(g.column()).map(|col| (g, col)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            emotion: table.column(EMOTION_COLUMN)?,
            groups,
        })
    }

    fn parse(&self, row: usize, record: &StringRecord) -> Result<EmotionSample, LoadError> {
        let label = parse_emotion(field(record, row, self.emotion, EMOTION_COLUMN)?, row)?;

        let mut coords = Vec::with_capacity(NUM_LANDMARKS * COORDS_PER_LANDMARK);
        for &(group, column) in &self.groups {
            let raw    = field(record, row, column, group.column())?;
            let points = parse_group(raw, group, row)?;
            coords.extend(points.into_iter().flatten());
        }

        Ok(EmotionSample::new(coords, [NUM_LANDMARKS, COORDS_PER_LANDMARK], label))
    }
}

impl EmotionSource for LandmarkLoader {
    fn load_splits(&self, path: &Path, seed: u64) -> Result<DatasetSplits<EmotionSample>, LoadError> {
        tracing::info!("Loading landmark data from '{}'", path.display());

        let table   = Table::open(path)?;
        let columns = LandmarkColumns::locate(&table)?;
        let samples = table.parse_rows(|row, record| columns.parse(row, record))?;

        Ok(split_samples(samples, seed))
    }
}

/// Parse one feature-group cell into its (x, y) points.
pub fn parse_group(raw: &str, group: FeatureGroup, row: usize) -> Result<Vec<[f32; 2]>, LoadError> {
    let points = raw
        .split_whitespace()
        .map(|token| parse_point(token).map_err(|reason| LoadError::parse(row, group.column(), reason)))
        .collect::<Result<Vec<_>, _>>()?;

    if points.len() != group.point_count() {
        return Err(LoadError::parse(
            row,
            group.column(),
            format!("expected {} points, found {}", group.point_count(), points.len()),
        ));
    }

    Ok(points)
}

/// Parse an "x.y" token. The dot is the coordinate separator,
/// so the token must split into exactly two numbers.
pub fn parse_point(token: &str) -> Result<[f32; 2], String> {
    let parts: Vec<&str> = token.split('.').collect();
    let [x, y] = parts.as_slice() else {
        return Err(format!(
            "point '{token}' splits into {} parts on '.', expected 2",
            parts.len()
        ));
    };

    let number = |s: &str| {
        s.parse::<f32>()
            .map_err(|_| format!("point '{token}' has non-numeric coordinate '{s}'"))
    };

    Ok([number(*x)?, number(*y)?])
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// A cell of `count` points where point i of group g is "g.i".
    fn group_cell(group_index: usize, count: usize) -> String {
        (0..count)
            .map(|i| format!("{group_index}.{i}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn write_dataset(rows: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        let header: Vec<&str> = std::iter::once("emotion")
            .chain(FeatureGroup::LOADER_ORDER.iter().map(|g| g.column()))
            .collect();
        writeln!(file, "{}", header.join(",")).unwrap();

        for r in 0..rows {
            let cells: Vec<String> = FeatureGroup::LOADER_ORDER
                .iter()
                .enumerate()
                .map(|(gi, g)| group_cell(gi, g.point_count()))
                .collect();
            writeln!(file, "{},{}", r % 7, cells.join(",")).unwrap();
        }
        file
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("12.40").unwrap(), [12.0, 40.0]);
    }

    #[test]
    fn test_decimal_coordinates_are_rejected() {
        let err = parse_point("1.5.2.5").unwrap_err();
        assert!(err.contains("4 parts"));
        assert!(parse_point("17").is_err());
        assert!(parse_point("a.3").is_err());
    }

    #[test]
    fn test_group_point_count_is_checked() {
        let err = parse_group("1.1 2.2", FeatureGroup::Nose, 9).unwrap_err();
        assert!(matches!(err, LoadError::Parse { row: 9, ref field, .. } if field == "nose"));
    }

    #[test]
    fn test_loader_order_concatenation() {
        let file   = write_dataset(1);
        let splits = LandmarkLoader::new().load_splits(file.path(), 0).unwrap();
        let sample = &splits.training[0];

        assert_eq!(sample.dims, [68, 2]);
        assert_eq!(sample.features.len(), 136);

        // Rows 0..17 come from the jaw column (group 0)
        assert_eq!(sample.row(0),  &[0.0, 0.0]);
        assert_eq!(sample.row(16), &[0.0, 16.0]);
        // Rows 17..22 come from right_brow (group 1), not left_brow
        assert_eq!(sample.row(17), &[1.0, 0.0]);
        assert_eq!(sample.row(22), &[2.0, 0.0]);
        // Lips fill the last 7 rows
        assert_eq!(sample.row(61), &[7.0, 0.0]);
        assert_eq!(sample.row(67), &[7.0, 6.0]);
    }

    #[test]
    fn test_splits_and_determinism() {
        let file = write_dataset(10);
        let a = LandmarkLoader::new().load_splits(file.path(), 3).unwrap();
        let b = LandmarkLoader::new().load_splits(file.path(), 3).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.training.len(),   7);
        assert_eq!(a.validation.len(), 2);
        assert_eq!(a.testing.len(),    1);
    }

    #[test]
    fn test_missing_group_column() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "emotion,jaw").unwrap();

        let err = LandmarkLoader::new().load_splits(file.path(), 0).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { .. }));
    }
}
