//! Domain dataset partitions.
//!
//! Each domain is backed by `ds_<domain>.csv` in the data directory. A
//! partition has a header row; one column holds a comma-separated keyword
//! list and another the entry text. Partitions are read fresh on every call.

use crate::matcher::parse_keyword_cell;
use crate::types::{Domain, Record};
use helpdesk_core::{AppConfig, AppError, AppResult};
use std::path::PathBuf;

/// Headers accepted for the keyword column when none is configured.
pub const DEFAULT_KEYWORD_COLUMNS: [&str; 2] = ["keywords", "キーワード"];

/// Headers accepted for the content column when none is configured.
pub const DEFAULT_CONTENT_COLUMNS: [&str; 2] = ["content", "内容"];

/// Trait for anything that can produce the records of a partition.
pub trait RecordSource: Send + Sync {
    /// Load every record of the domain's partition, in storage order.
    fn load(&self, domain: Domain) -> AppResult<Vec<Record>>;
}

/// CSV-backed partitions in one directory.
#[derive(Debug, Clone)]
pub struct CsvDataset {
    dir: PathBuf,
    keyword_column: Option<String>,
    content_column: Option<String>,
}

impl CsvDataset {
    /// Partitions under `dir`, located by the default column headers.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            keyword_column: None,
            content_column: None,
        }
    }

    /// Partitions described by the application config.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            dir: config.data_dir(),
            keyword_column: config.data.keyword_column.clone(),
            content_column: config.data.content_column.clone(),
        }
    }

    /// Use explicit column headers instead of the defaults.
    pub fn with_columns(mut self, keyword: impl Into<String>, content: impl Into<String>) -> Self {
        self.keyword_column = Some(keyword.into());
        self.content_column = Some(content.into());
        self
    }

    pub fn partition_path(&self, domain: Domain) -> PathBuf {
        self.dir.join(domain.dataset_file())
    }
}

impl RecordSource for CsvDataset {
    fn load(&self, domain: Domain) -> AppResult<Vec<Record>> {
        let path = self.partition_path(domain);

        if !path.is_file() {
            return Err(AppError::Dataset(format!("Partition not found: {:?}", path)));
        }

        let label = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| domain.dataset_file());

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(&path)?;

        let headers = reader.headers()?.clone();
        let keyword_idx = find_column(
            &headers,
            self.keyword_column.as_deref(),
            &DEFAULT_KEYWORD_COLUMNS,
        )
        .ok_or_else(|| AppError::Dataset(format!("{:?} has no keyword column", path)))?;
        let content_idx = find_column(
            &headers,
            self.content_column.as_deref(),
            &DEFAULT_CONTENT_COLUMNS,
        )
        .ok_or_else(|| AppError::Dataset(format!("{:?} has no content column", path)))?;

        let mut records = Vec::new();

        for (line, row) in reader.records().enumerate() {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    tracing::debug!("Skipping malformed row {} in {}: {}", line + 1, label, e);
                    continue;
                }
            };

            records.push(Record {
                label: label.clone(),
                keywords: parse_keyword_cell(row.get(keyword_idx).unwrap_or("")),
                content: row.get(content_idx).unwrap_or("").to_string(),
            });
        }

        tracing::debug!("Loaded {} records from {:?}", records.len(), path);

        Ok(records)
    }
}

/// Index of the configured header, or of the first default header present.
fn find_column(
    headers: &csv::StringRecord,
    configured: Option<&str>,
    defaults: &[&str],
) -> Option<usize> {
    let position = |wanted: &str| {
        headers
            .iter()
            .position(|header| header.trim_start_matches('\u{feff}').trim() == wanted)
    };

    match configured {
        Some(name) => position(name),
        None => defaults.iter().find_map(|name| position(*name)),
    }
}
