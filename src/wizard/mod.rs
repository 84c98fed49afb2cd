use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::client::{submit_import, ImportError, ImportGateway};
use crate::models::{Block, ImportResult, ParsedRecord, RowErrors};
use crate::parsers::ParseFailure;
use crate::processors::partition::{partition_records, Partition};
use crate::validators::validate_records;

/// How the remote call of the results step ended up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ImportOutcome {
    Pending,
    Completed(ImportResult),
    /// The import did not run; distinct from "zero records imported".
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum WizardState {
    Upload {
        error: Option<RowErrors>,
    },
    Preview {
        records: Vec<ParsedRecord>,
        errors: Vec<RowErrors>,
        partition: Partition,
    },
    Results {
        outcome: ImportOutcome,
    },
    Closed,
}

impl WizardState {
    pub fn name(&self) -> &'static str {
        match self {
            WizardState::Upload { .. } => "upload",
            WizardState::Preview { .. } => "preview",
            WizardState::Results {
                outcome: ImportOutcome::Pending,
            } => "results (pending)",
            WizardState::Results { .. } => "results",
            WizardState::Closed => "closed",
        }
    }

    /// Step index shown by the wizard header: 0 upload, 1 preview, 2 results.
    pub fn step_index(&self) -> Option<usize> {
        match self {
            WizardState::Upload { .. } => Some(0),
            WizardState::Preview { .. } => Some(1),
            WizardState::Results { .. } => Some(2),
            WizardState::Closed => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum WizardError {
    /// The operation is not allowed in the current state.
    InvalidTransition { op: &'static str, state: &'static str },
    /// Nothing in the preview passed validation.
    NoValidRecords,
}

impl fmt::Display for WizardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardError::InvalidTransition { op, state } => {
                write!(f, "cannot {op} while the import is in the {state} step")
            }
            WizardError::NoValidRecords => write!(f, "there are no valid records to import"),
        }
    }
}

impl std::error::Error for WizardError {}

/// Upload → Preview → Results → (import another) Upload, or Closed from any
/// step that is not waiting on the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportWizard {
    state: WizardState,
}

impl Default for ImportWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportWizard {
    pub fn new() -> Self {
        Self {
            state: WizardState::Upload { error: None },
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    fn reject(&self, op: &'static str) -> WizardError {
        WizardError::InvalidTransition {
            op,
            state: self.state.name(),
        }
    }

    /// Takes the parser's output. A structural failure stays on the upload
    /// step with the synthetic error; records are validated and previewed.
    pub fn accept_upload(
        &mut self,
        parsed: Result<Vec<ParsedRecord>, ParseFailure>,
        blocks: &[Block],
    ) -> Result<(), WizardError> {
        if !matches!(self.state, WizardState::Upload { .. }) {
            return Err(self.reject("upload a file"));
        }

        self.state = match parsed {
            Err(failure) => {
                warn!(error = %failure, "upload rejected");
                WizardState::Upload {
                    error: Some(failure.to_row_errors()),
                }
            }
            Ok(records) => {
                let errors = validate_records(&records, blocks);
                let partition = partition_records(&records, &errors);
                WizardState::Preview {
                    records,
                    errors,
                    partition,
                }
            }
        };
        Ok(())
    }

    /// Re-runs validation against a new block snapshot, replacing all errors.
    pub fn revalidate(&mut self, blocks: &[Block]) -> Result<(), WizardError> {
        if let WizardState::Preview {
            records,
            errors,
            partition,
        } = &mut self.state
        {
            *errors = validate_records(records, blocks);
            *partition = partition_records(records, errors);
            return Ok(());
        }
        Err(self.reject("revalidate"))
    }

    /// Moves to the results step before the call resolves and hands back the
    /// records to submit.
    pub fn begin_import(&mut self) -> Result<Vec<ParsedRecord>, WizardError> {
        let valid = match &self.state {
            WizardState::Preview { partition, .. } => {
                if !partition.has_valid() {
                    return Err(WizardError::NoValidRecords);
                }
                partition.valid.clone()
            }
            _ => return Err(self.reject("start the import")),
        };

        self.state = WizardState::Results {
            outcome: ImportOutcome::Pending,
        };
        Ok(valid)
    }

    pub fn finish_import(
        &mut self,
        result: Result<ImportResult, ImportError>,
    ) -> Result<(), WizardError> {
        if !matches!(
            self.state,
            WizardState::Results {
                outcome: ImportOutcome::Pending
            }
        ) {
            return Err(self.reject("finish the import"));
        }

        let outcome = match result {
            Ok(result) => ImportOutcome::Completed(result),
            Err(err) => {
                warn!(error = %err, "import failed to run");
                ImportOutcome::Failed(err.to_string())
            }
        };
        self.state = WizardState::Results { outcome };
        Ok(())
    }

    /// "Import another": discards everything and returns to the upload step.
    pub fn reset(&mut self) -> Result<(), WizardError> {
        match &self.state {
            WizardState::Preview { .. } | WizardState::Upload { .. } => {}
            WizardState::Results { outcome } if *outcome != ImportOutcome::Pending => {}
            _ => return Err(self.reject("start over")),
        }
        self.state = WizardState::Upload { error: None };
        Ok(())
    }

    /// Terminal. Not allowed while the import request is in flight.
    pub fn close(&mut self) -> Result<(), WizardError> {
        if let WizardState::Results {
            outcome: ImportOutcome::Pending,
        } = self.state
        {
            return Err(self.reject("close"));
        }
        self.state = WizardState::Closed;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, WizardState::Closed)
    }
}

/// Runs the results step end to end: begin, submit, record the outcome.
pub async fn run_import<G>(wizard: &mut ImportWizard, gateway: &G) -> Result<(), WizardError>
where
    G: ImportGateway + ?Sized,
{
    let valid = wizard.begin_import()?;
    info!(records = valid.len(), "import started");
    let result = submit_import(gateway, &valid).await;
    wizard.finish_import(result)
}
