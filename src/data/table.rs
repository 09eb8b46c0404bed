// ============================================================
// Layer 4 — Dataset Table Reader
// ============================================================
// Reads a comma-separated dataset file with a header row.
// Whitespace around every field is trimmed, so "0 , 1 2 3"
// and "0,1 2 3" parse the same.
//
// Columns are looked up by header name. Any column nobody asks
// for (e.g. "Usage") is kept in the record and simply never read.
// Rows are parsed while the file is read, so only the parsed
// samples stay in memory.

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use csv::{Reader, ReaderBuilder, StringRecord, Trim};

use crate::data::error::LoadError;
use crate::data::splitter::shuffle_and_partition;
use crate::domain::emotion::Emotion;
use crate::domain::sample::EmotionSample;
use crate::domain::split::DatasetSplits;

/// Name of the integer label column shared by both dataset layouts.
pub const EMOTION_COLUMN: &str = "emotion";

/// An open dataset file whose header has been read. Rows are
/// streamed by `parse_rows`, one record at a time.
pub struct Table {
    path:    PathBuf,
    headers: StringRecord,
    reader:  Reader<File>,
}

impl Table {
    pub fn open(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        // Flexible: a short or long row is reported by the field
        // lookup with its data-row index, not by the reader.
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|source| LoadError::Csv { path: path.to_path_buf(), source })?
            .clone();

        tracing::debug!(
            "Opened '{}' with columns [{}]",
            path.display(),
            headers.iter().collect::<Vec<_>>().join(", ")
        );

        Ok(Self { path: path.to_path_buf(), headers, reader })
    }

    /// Position of a named column.
    pub fn column(&self, name: &str) -> Result<usize, LoadError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn {
                path:   self.path.clone(),
                column: name.to_string(),
            })
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Turn every row into a sample, stopping at the first bad row.
    /// Row indices are 0-based and exclude the header.
    pub fn parse_rows<F>(self, parse_row: F) -> Result<Vec<EmotionSample>, LoadError>
    where
        F: Fn(usize, &StringRecord) -> Result<EmotionSample, LoadError>,
    {
        let Table { path, reader, .. } = self;

        let mut samples = Vec::new();
        for (row, record) in reader.into_records().enumerate() {
            let record = record.map_err(|source| LoadError::Csv { path: path.clone(), source })?;
            samples.push(parse_row(row, &record)?);
        }

        tracing::debug!("Parsed {} rows from '{}'", samples.len(), path.display());
        Ok(samples)
    }
}

/// Fetch one field of a row, failing with the row index if absent.
pub fn field<'r>(
    record: &'r StringRecord,
    row:    usize,
    column: usize,
    name:   &str,
) -> Result<&'r str, LoadError> {
    record
        .get(column)
        .ok_or_else(|| LoadError::parse(row, name, "field is missing"))
}

/// Parse the emotion code of a row into a class.
pub fn parse_emotion(raw: &str, row: usize) -> Result<Emotion, LoadError> {
    let code: i64 = raw.parse().map_err(|_| {
        LoadError::parse(row, EMOTION_COLUMN, format!("'{raw}' is not an integer"))
    })?;

    Emotion::from_code(code).ok_or_else(|| {
        LoadError::parse(row, EMOTION_COLUMN, format!("code {code} is outside 0..=6"))
    })
}

/// Shuffle parsed samples with `seed`, partition 70/20/10 and log the sizes.
pub fn split_samples(samples: Vec<EmotionSample>, seed: u64) -> DatasetSplits<EmotionSample> {
    let splits = shuffle_and_partition(samples, seed);
    let sizes  = splits.sizes();

    tracing::info!("Extracted {} data entries for training", sizes.training);
    tracing::info!("Extracted {} data entries for validation", sizes.validation);
    tracing::info!("Extracted {} data entries for testing", sizes.testing);

    splits
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn label_only(row: usize, record: &StringRecord) -> Result<EmotionSample, LoadError> {
        let label = parse_emotion(field(record, row, 0, EMOTION_COLUMN)?, row)?;
        Ok(EmotionSample::new(Vec::new(), [0, 0], label))
    }

    #[test]
    fn test_whitespace_around_delimiters() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "emotion , pixels ,Usage").unwrap();
        writeln!(file, "3 ,  1 2 3 , Training").unwrap();

        let table = Table::open(file.path()).unwrap();
        assert_eq!(table.column("pixels").unwrap(), 1);
        assert!(table.has_column("Usage"));

        let samples = table
            .parse_rows(|row, record| {
                assert_eq!(field(record, row, 1, "pixels")?, "1 2 3");
                label_only(row, record)
            })
            .unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].label, Emotion::Happy);
    }

    #[test]
    fn test_short_row_is_a_field_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "emotion,pixels,Usage").unwrap();
        writeln!(file, "1,0 0,Training").unwrap();
        writeln!(file, "2").unwrap();

        let err = Table::open(file.path())
            .unwrap()
            .parse_rows(|row, record| {
                field(record, row, 1, "pixels")?;
                label_only(row, record)
            })
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::Parse { row: 1, ref field, ref reason } if field == "pixels" && reason == "field is missing"
        ));
    }

    #[test]
    fn test_missing_column() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "emotion").unwrap();
        writeln!(file, "1").unwrap();

        let table = Table::open(file.path()).unwrap();
        let err   = table.column("pixels").unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { ref column, .. } if column == "pixels"));
    }

    #[test]
    fn test_missing_file() {
        let err = Table::open(Path::new("/nonexistent/fer.csv")).err().unwrap();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_emotion_parse_errors_name_the_row() {
        let err = parse_emotion("9", 12).unwrap_err();
        assert!(matches!(err, LoadError::Parse { row: 12, ref field, .. } if field == "emotion"));

        let err = parse_emotion("happy", 4).unwrap_err();
        assert!(err.to_string().contains("row 4"));
    }
}
