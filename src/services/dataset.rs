//! Character dataset retrieval and parsing.
//!
//! The dataset is comma-separated text with quote-escaped fields. The first
//! [`HEADER_LINES`] lines are metadata, and every data row has at least
//! [`MIN_COLUMNS`] columns at fixed positions:
//!
//! | Columns  | Content                         |
//! |----------|---------------------------------|
//! | 0        | id                              |
//! | 1        | serial (unused)                 |
//! | 2        | main (Japanese) glyph           |
//! | 3..=6    | on-readings                     |
//! | 7..=16   | kun-readings                    |
//! | 17       | example usage                   |
//! | 18       | level                           |
//! | 19       | counterpart (Chinese) glyph     |
//! | 20..=22  | counterpart (pinyin) readings   |
//! | 23       | exceptional flag (`否` = standard) |
//!
//! # Examples
//!
//! ```ignore
//! use kanjicard::services::dataset::{FileDatasetSource, DatasetSource, decode_dataset, parse_dataset};
//!
//! let source = FileDatasetSource::new("data/data.csv");
//! let bytes = source.fetch().await?;
//! let records = parse_dataset(&decode_dataset(&source.describe(), bytes)?);
//! ```

use crate::models::character::{STANDARD_FLAG, is_placeholder};
use crate::models::CharacterRecord;
use camino::{Utf8Path, Utf8PathBuf};
use std::future::Future;
use std::ops::RangeInclusive;
use thiserror::Error;

/// Metadata lines at the top of the dataset.
pub const HEADER_LINES: usize = 4;

/// Rows with fewer columns are discarded.
pub const MIN_COLUMNS: usize = 24;

const COL_ID: usize = 0;
const COL_MAIN: usize = 2;
const COLS_ON: RangeInclusive<usize> = 3..=6;
const COLS_KUN: RangeInclusive<usize> = 7..=16;
const COL_EXAMPLE: usize = 17;
const COL_LEVEL: usize = 18;
const COL_COUNTERPART: usize = 19;
const COLS_COUNTERPART_READINGS: RangeInclusive<usize> = 20..=22;
const COL_FLAG: usize = 23;

/// Dataset retrieval failures (the "data unavailable" condition)
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Dataset {source_name} unavailable: {reason}")]
    Unavailable { source_name: String, reason: String },

    #[error("Dataset {source_name} is not valid UTF-8")]
    InvalidEncoding {
        source_name: String,
        #[source]
        error: std::string::FromUtf8Error,
    },
}

/// Provider of the raw dataset bytes.
pub trait DatasetSource {
    fn fetch(&self) -> impl Future<Output = Result<Vec<u8>, DatasetError>> + Send;

    /// Human-readable name used in logs and errors
    fn describe(&self) -> String;
}

/// Reads the dataset from a file on disk.
#[derive(Debug, Clone)]
pub struct FileDatasetSource {
    path: Utf8PathBuf,
}

impl FileDatasetSource {
    pub fn new<P: AsRef<Utf8Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl DatasetSource for FileDatasetSource {
    fn fetch(&self) -> impl Future<Output = Result<Vec<u8>, DatasetError>> + Send {
        let path = self.path.clone();
        async move {
            tokio::fs::read(&path)
                .await
                .map_err(|e| DatasetError::Unavailable {
                    source_name: path.to_string(),
                    reason: e.to_string(),
                })
        }
    }

    fn describe(&self) -> String {
        self.path.to_string()
    }
}

/// Serves dataset text held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticDatasetSource {
    text: String,
}

impl StaticDatasetSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl DatasetSource for StaticDatasetSource {
    fn fetch(&self) -> impl Future<Output = Result<Vec<u8>, DatasetError>> + Send {
        let bytes = self.text.clone().into_bytes();
        async move { Ok(bytes) }
    }

    fn describe(&self) -> String {
        "<static>".to_string()
    }
}

/// Decode the fetched payload as UTF-8, dropping a leading byte-order mark.
pub fn decode_dataset(source_name: &str, bytes: Vec<u8>) -> Result<String, DatasetError> {
    let text = String::from_utf8(bytes).map_err(|error| DatasetError::InvalidEncoding {
        source_name: source_name.to_string(),
        error,
    })?;

    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Fetch and parse a dataset in one step.
pub async fn load_dataset<D: DatasetSource>(source: &D) -> Result<Vec<CharacterRecord>, DatasetError> {
    let name = source.describe();
    let bytes = source.fetch().await?;
    let text = decode_dataset(&name, bytes)?;
    let records = parse_dataset(&text);

    tracing::info!("Parsed {} character records from {}", records.len(), name);
    Ok(records)
}

/// Split one row into trimmed fields.
///
/// Commas inside double quotes do not separate fields, and a doubled quote
/// inside a quoted field yields one literal quote. Tabs are removed.
pub fn split_row(row: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = row.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(finish_field(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(finish_field(&mut current));

    fields
}

fn finish_field(current: &mut String) -> String {
    let field = current.trim().replace('\t', "");
    current.clear();
    field
}

/// Parse dataset text into records.
///
/// Short rows and rows without an id or any glyph are skipped silently.
pub fn parse_dataset(text: &str) -> Vec<CharacterRecord> {
    text.split('\n')
        .skip(HEADER_LINES)
        .enumerate()
        .filter_map(|(offset, row)| {
            let record = parse_row(row)?;
            if !record.is_valid() {
                tracing::debug!("Skipping row {}: missing id or glyph", offset + HEADER_LINES + 1);
                return None;
            }
            Some(record)
        })
        .collect()
}

fn parse_row(row: &str) -> Option<CharacterRecord> {
    if row.trim().is_empty() {
        return None;
    }

    let cols = split_row(row);
    if cols.len() < MIN_COLUMNS {
        tracing::debug!("Skipping row with {} columns", cols.len());
        return None;
    }

    let flag = cols[COL_FLAG].trim();
    let flag = if flag.is_empty() { STANDARD_FLAG } else { flag };

    Some(CharacterRecord {
        id: cols[COL_ID].clone(),
        main_form: cols[COL_MAIN].clone(),
        on_readings: readings(&cols, COLS_ON),
        kun_readings: readings(&cols, COLS_KUN),
        example_usage: cols[COL_EXAMPLE].clone(),
        level: cols[COL_LEVEL].clone(),
        counterpart_char: cols[COL_COUNTERPART].clone(),
        counterpart_readings: readings(&cols, COLS_COUNTERPART_READINGS),
        is_exceptional: flag != STANDARD_FLAG,
    })
}

/// A single column may itself hold several comma-separated readings.
fn readings(cols: &[String], range: RangeInclusive<usize>) -> Vec<String> {
    cols[range]
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|value| !value.is_empty() && !is_placeholder(value))
        .map(str::to_string)
        .collect()
}
