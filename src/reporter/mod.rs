use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;

use crate::models::{ImportResult, ParsedRecord, RowErrors};
use crate::processors::partition::Partition;
use crate::wizard::{ImportOutcome, ImportWizard, WizardState};

/// Columns shown in the text preview, in order.
const PREVIEW_COLUMNS: [&str; 5] = ["name", "email", "phone", "block_name", "room_number"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Valid,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewRow {
    pub key: usize,
    /// Spreadsheet row number (header is row 1).
    pub row: usize,
    pub status: RowStatus,
    pub errors: Vec<String>,
    pub fields: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewView {
    pub rows: Vec<PreviewRow>,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub can_import: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureLine {
    pub identifier: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResultsView {
    Loading,
    Completed {
        successful: usize,
        failed: usize,
        summary: String,
        failures: Vec<FailureLine>,
    },
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum WizardView {
    Upload { error: Option<String> },
    Preview(PreviewView),
    Results(ResultsView),
    Closed,
}

/// Builds what the current wizard step displays.
pub fn render(wizard: &ImportWizard) -> WizardView {
    match wizard.state() {
        WizardState::Upload { error } => WizardView::Upload {
            error: error.as_ref().map(|e| e.errors.join(" ")),
        },
        WizardState::Preview {
            records,
            errors,
            partition,
        } => WizardView::Preview(preview_view(records, errors, partition)),
        WizardState::Results { outcome } => WizardView::Results(results_view(outcome)),
        WizardState::Closed => WizardView::Closed,
    }
}

pub fn preview_view(records: &[ParsedRecord], errors: &[RowErrors], partition: &Partition) -> PreviewView {
    let by_row: HashMap<usize, &RowErrors> = errors.iter().map(|e| (e.row, e)).collect();

    let rows = records
        .iter()
        .map(|record| {
            let messages = by_row
                .get(&record.key)
                .map(|e| e.errors.clone())
                .unwrap_or_default();
            PreviewRow {
                key: record.key,
                row: record.display_row(),
                status: if messages.is_empty() {
                    RowStatus::Valid
                } else {
                    RowStatus::Invalid
                },
                errors: messages,
                fields: record
                    .fields
                    .iter()
                    .map(|(name, value)| (name.clone(), value.as_text().into_owned()))
                    .collect(),
            }
        })
        .collect();

    PreviewView {
        rows,
        valid_count: partition.valid_count(),
        invalid_count: partition.invalid_count(),
        can_import: partition.has_valid(),
    }
}

pub fn results_view(outcome: &ImportOutcome) -> ResultsView {
    match outcome {
        ImportOutcome::Pending => ResultsView::Loading,
        ImportOutcome::Completed(result) => completed_view(result),
        ImportOutcome::Failed(reason) => ResultsView::Failed {
            message: format!("Import failed to run: {reason}"),
        },
    }
}

fn completed_view(result: &ImportResult) -> ResultsView {
    let successful = result.successful.len();
    let failed = result.failed.len();
    ResultsView::Completed {
        successful,
        failed,
        summary: format!("Successfully imported: {successful}. Failed: {failed}."),
        failures: result
            .failed
            .iter()
            .map(|f| FailureLine {
                identifier: f.identifier(),
                error: f.error.clone(),
            })
            .collect(),
    }
}

impl fmt::Display for PreviewView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>5}  {:<8}  {}", "Row", "Status", PREVIEW_COLUMNS.join(" | "))?;
        for row in &self.rows {
            let status = match row.status {
                RowStatus::Valid => "valid",
                RowStatus::Invalid => "invalid",
            };
            let cells: Vec<&str> = PREVIEW_COLUMNS
                .iter()
                .map(|c| row.fields.get(*c).map(String::as_str).unwrap_or(""))
                .collect();
            writeln!(f, "{:>5}  {:<8}  {}", row.row, status, cells.join(" | "))?;
            for error in &row.errors {
                writeln!(f, "{:>17}- {}", "", error)?;
            }
        }
        write!(
            f,
            "Valid rows: {}. Invalid rows: {}.",
            self.valid_count, self.invalid_count
        )
    }
}

impl fmt::Display for ResultsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultsView::Loading => write!(f, "Importing..."),
            ResultsView::Completed {
                summary, failures, ..
            } => {
                write!(f, "{summary}")?;
                for failure in failures {
                    write!(f, "\n  {}: {}", failure.identifier, failure.error)?;
                }
                Ok(())
            }
            ResultsView::Failed { message } => write!(f, "{message}"),
        }
    }
}

impl fmt::Display for WizardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardView::Upload { error: Some(error) } => write!(f, "Upload failed: {error}"),
            WizardView::Upload { error: None } => write!(f, "Waiting for a file."),
            WizardView::Preview(preview) => write!(f, "{preview}"),
            WizardView::Results(results) => write!(f, "{results}"),
            WizardView::Closed => Ok(()),
        }
    }
}
