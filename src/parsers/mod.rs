mod builder;
mod csv;
mod excel;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{ParsedRecord, RowErrors};

pub use builder::{build_records, EMPTY_FILE_MESSAGE};

/// Structural failure of an upload: the file cannot be used at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseFailure {
    pub message: String,
}

impl ParseFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The single synthetic error shown in place of per-row results.
    pub fn to_row_errors(&self) -> RowErrors {
        RowErrors {
            row: 0,
            errors: vec![self.message.clone()],
        }
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseFailure {}

/// Reads an import file and parses it according to its extension.
pub fn parse_import_file(path: impl AsRef<Path>) -> Result<Vec<ParsedRecord>, ParseFailure> {
    let path = PathBuf::from(path.as_ref());

    if !path.exists() {
        return Err(ParseFailure::new(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .ok_or_else(|| ParseFailure::new("Could not determine the file type."))?;

    debug!(path = %path.display(), ext = %ext, "reading import file");

    let rows = match ext.as_str() {
        "csv" => csv::read_csv_rows(&path)?,
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => excel::read_first_sheet(&path)?,
        other => {
            return Err(ParseFailure::new(format!(
                "Unsupported file type: {}",
                other
            )))
        }
    };

    let records = build_records(rows)?;
    info!(path = %path.display(), rows = records.len(), "parsed import file");
    Ok(records)
}
