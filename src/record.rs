use chrono::Local;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Timestamp format used both inside records and in their filenames.
/// Lexicographic order matches chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

const FILE_PREFIX: &str = "results-";
const FILE_SUFFIX: &str = ".json";

/// One model's outcome within a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelResult {
    pub model: String,
    /// Response text on success, error rendering on failure
    pub response: String,
    pub cost: f64,
    /// Wall-clock seconds spent on the model call
    pub total_time: f64,
    /// Same prompt key as the enclosing record
    pub prompt: String,
}

/// The persisted document capturing one CLI invocation.
///
/// Constructed once, serialized once, never mutated. `system_prompt`
/// serializes as null when absent so the key is always present on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunRecord {
    pub timestamp: String,
    pub user_prompt: String,
    pub system_prompt: Option<String>,
    /// Short display label for the prompt source
    pub prompt: String,
    pub results: Vec<ModelResult>,
}

impl RunRecord {
    /// Assemble a record from the resolved prompts and the per-model
    /// results, stamped with the current local time.
    pub fn new(
        user_prompt: String,
        system_prompt: Option<String>,
        prompt_key: String,
        results: Vec<ModelResult>,
    ) -> Self {
        Self {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            user_prompt,
            system_prompt,
            prompt: prompt_key,
            results,
        }
    }

    /// Filename this record is stored under.
    pub fn filename(&self) -> String {
        format!("{}{}{}", FILE_PREFIX, self.timestamp, FILE_SUFFIX)
    }
}

/// Listing entry for one stored record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub filename: String,
    pub timestamp: String,
    pub models_count: usize,
}

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("failed to read {0}: {1}")]
    Io(String, #[source] std::io::Error),

    #[error("failed to parse {0}: {1}")]
    Parse(String, #[source] serde_json::Error),
}

/// Write the record under `dir` as pretty-printed JSON (4-space indent),
/// creating the directory if needed. Returns the written path.
///
/// Filenames carry second-granularity timestamps; two runs inside the
/// same second collide. Accepted as documented behavior.
pub fn write_record(dir: &Path, record: &RunRecord) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let path = dir.join(record.filename());
    let file = fs::File::create(&path)?;
    let mut writer = BufWriter::new(file);

    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut writer, formatter);
    record.serialize(&mut ser)?;
    writer.flush()?;

    Ok(path)
}

/// Scan `dir` for `results-*.json` files and return their summaries,
/// most recent first. Files that fail to read or parse are skipped with
/// a warning. A missing directory yields an empty list.
pub fn list_records(dir: &Path) -> Vec<RunSummary> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut summaries = Vec::new();
    for entry in entries.flatten() {
        let filename = entry.file_name().to_string_lossy().into_owned();
        if !filename.starts_with(FILE_PREFIX) || !filename.ends_with(FILE_SUFFIX) {
            continue;
        }

        match read_record(dir, &filename) {
            Ok(record) => summaries.push(RunSummary {
                filename,
                timestamp: record.timestamp,
                models_count: record.results.len(),
            }),
            Err(e) => warn!("skipping {}: {}", filename, e),
        }
    }

    summaries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    summaries
}

/// Read and parse one stored record by filename.
pub fn read_record(dir: &Path, filename: &str) -> Result<RunRecord, ReadError> {
    // Names are plain basenames; reject anything that escapes the dir.
    if filename.contains('/') || filename.contains('\\') || filename == ".." {
        return Err(ReadError::NotFound(filename.to_string()));
    }

    let path = dir.join(filename);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ReadError::NotFound(filename.to_string()));
        }
        Err(e) => return Err(ReadError::Io(filename.to_string(), e)),
    };

    serde_json::from_str(&contents).map_err(|e| ReadError::Parse(filename.to_string(), e))
}
