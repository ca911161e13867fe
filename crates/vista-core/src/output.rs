//! Metadata and annotation sinks.
//!
//! Provides a writer that serializes batches as a JSON array, JSON Lines, or
//! CSV, plus the dataset-level files written after a collection run.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::MetadataRecord;

/// Columns every metadata sink starts with.
pub const METADATA_COLUMNS: [&str; 3] = ["filename", "source_url", "source"];

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
    /// Comma-separated table, one column per field
    Csv,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [Self::Json, Self::JsonLines, Self::Csv];

    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    /// Name of the metadata file written in this format.
    pub fn metadata_file_name(&self) -> &'static str {
        match self {
            Self::Json => "metadata.json",
            Self::JsonLines => "metadata.jsonl",
            Self::Csv => "dataset_metadata.csv",
        }
    }
}

/// A writer that serializes items to JSON, JSONL, or CSV.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    columns: Vec<String>,
    items_written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer.
    ///
    /// # Arguments
    ///
    /// * `writer` - The underlying writer (file, stdout, etc.)
    /// * `format` - Output format
    /// * `pretty` - Whether to pretty-print JSON (only affects JSON format)
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            columns: Vec::new(),
            items_written: 0,
        }
    }

    /// Fix the leading CSV columns. They are written even when no item
    /// carries them, so an empty batch still produces a header row.
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Write a single item.
    ///
    /// For CSV, this writes a one-row table with its own header.
    pub fn write<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, item)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
                self.items_written += 1;
            }
            OutputFormat::JsonLines => {
                // JSONL is never pretty-printed (one object per line)
                serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
                writeln!(self.writer)?;
                self.items_written += 1;
            }
            OutputFormat::Csv => self.write_csv(std::slice::from_ref(item))?,
        }
        Ok(())
    }

    /// Write multiple items.
    ///
    /// JSON writes an array, JSONL one object per line, and CSV a table whose
    /// columns are the union of all item fields in first-seen order.
    pub fn write_all<T: Serialize>(&mut self, items: &[T]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, items)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, items).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
                self.items_written += items.len();
            }
            OutputFormat::JsonLines => {
                for item in items {
                    self.write(item)?;
                }
            }
            OutputFormat::Csv => self.write_csv(items)?,
        }
        Ok(())
    }

    fn write_csv<T: Serialize>(&mut self, items: &[T]) -> io::Result<()> {
        let rows = items
            .iter()
            .map(|item| match serde_json::to_value(item) {
                Ok(Value::Object(fields)) => Ok(fields),
                Ok(other) => Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("CSV rows must be objects, got {other}"),
                )),
                Err(e) => Err(io::Error::other(e)),
            })
            .collect::<io::Result<Vec<Map<String, Value>>>>()?;

        let mut columns = self.columns.clone();
        for row in &rows {
            for key in row.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let mut csv = csv::Writer::from_writer(&mut self.writer);
        if !columns.is_empty() {
            csv.write_record(&columns).map_err(io::Error::other)?;
        }
        for row in &rows {
            csv.write_record(columns.iter().map(|c| csv_cell(row.get(c))))
                .map_err(io::Error::other)?;
        }
        csv.flush()?;

        self.items_written += rows.len();
        Ok(())
    }

    /// Get the number of items written.
    pub fn items_written(&self) -> usize {
        self.items_written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Missing and null cells are empty; strings are written without quotes.
fn csv_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Write the run's metadata to `metadata_dir` and return the file path.
///
/// An empty slice still produces a file: `[]` for JSON, a header row for CSV.
pub fn write_metadata(
    records: &[MetadataRecord],
    metadata_dir: &Path,
    format: OutputFormat,
    pretty: bool,
) -> Result<PathBuf> {
    std::fs::create_dir_all(metadata_dir)?;
    let path = metadata_dir.join(format.metadata_file_name());

    let file = BufWriter::new(File::create(&path)?);
    let mut writer = OutputWriter::new(file, format, pretty).with_columns(METADATA_COLUMNS);
    writer.write_all(records)?;
    writer.flush()?;

    tracing::info!("Wrote {} metadata records to {}", records.len(), path.display());
    Ok(path)
}

/// Read back metadata written by [`write_metadata`] in the same format.
///
/// A missing file yields no records. CSV cells come back as strings and
/// empty cells are dropped.
pub fn read_metadata(metadata_dir: &Path, format: OutputFormat) -> Result<Vec<MetadataRecord>> {
    let path = metadata_dir.join(format.metadata_file_name());
    if !path.exists() {
        return Ok(Vec::new());
    }

    match format {
        OutputFormat::Json => {
            let content = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&content)?)
        }
        OutputFormat::JsonLines => {
            let content = std::fs::read_to_string(&path)?;
            let mut records = Vec::new();
            for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
                records.push(serde_json::from_str(line)?);
            }
            Ok(records)
        }
        OutputFormat::Csv => {
            let mut reader = csv::Reader::from_path(&path)?;
            let headers = reader.headers()?.clone();
            let mut records = Vec::new();
            for row in reader.records() {
                let row = row?;
                let fields: Map<String, Value> = headers
                    .iter()
                    .zip(row.iter())
                    .filter(|(_, cell)| !cell.is_empty())
                    .map(|(column, cell)| (column.to_string(), Value::from(cell)))
                    .collect();
                records.push(serde_json::from_value(Value::Object(fields))?);
            }
            Ok(records)
        }
    }
}

/// Read every metadata file present in `metadata_dir`, `preferred` first.
///
/// Records from the other formats are appended when their filename is not
/// already known, so switching `--format` between runs loses nothing.
pub fn read_all_metadata(
    metadata_dir: &Path,
    preferred: OutputFormat,
) -> Result<Vec<MetadataRecord>> {
    let mut records = read_metadata(metadata_dir, preferred)?;
    let mut known: HashSet<String> = records.iter().map(|r| r.filename.clone()).collect();

    for format in OutputFormat::ALL.into_iter().filter(|f| *f != preferred) {
        let mut added = 0;
        for record in read_metadata(metadata_dir, format)? {
            if known.insert(record.filename.clone()) {
                records.push(record);
                added += 1;
            }
        }
        if added > 0 {
            tracing::info!(
                "Picked up {} earlier records from {}",
                added,
                format.metadata_file_name()
            );
        }
    }

    Ok(records)
}

/// File name of the annotation scaffold under `annotations/`.
pub const ANNOTATION_TEMPLATE_FILE: &str = "annotation_template.csv";

/// One row of the manual-labelling scaffold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, serde::Deserialize)]
pub struct AnnotationTemplate {
    pub filename: String,
    pub tv_present: bool,
    pub fireplace_present: bool,
    pub tv_bbox: String,
    pub fireplace_bbox: String,
    pub room_type: String,
    pub quality_score: u32,
}

/// Write a single blank annotation row to `annotations_dir`.
pub fn write_annotation_template(annotations_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(annotations_dir)?;
    let path = annotations_dir.join(ANNOTATION_TEMPLATE_FILE);

    let mut csv = csv::Writer::from_path(&path)?;
    csv.serialize(AnnotationTemplate::default())?;
    csv.flush()?;

    tracing::info!("Created annotation template: {}", path.display());
    Ok(path)
}

/// Convenience function to serialize an item to a JSON string.
pub fn to_json<T: Serialize>(item: &T, pretty: bool) -> std::result::Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(item)
    } else {
        serde_json::to_string(item)
    }
}
