mod http;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::{Block, ImportRecord, ImportRequest, ImportResult, ParsedRecord};
use crate::processors::cleaner::to_import_records;

pub use http::HttpGateway;

/// Who the calls are made for, passed in explicitly instead of read from ambient storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiContext {
    pub base_url: String,
    pub tenant_id: String,
    pub admin_id: String,
    pub token: Option<String>,
}

/// Failure of a remote call as a whole, as opposed to per-record failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportError {
    /// The request never produced a response (connection, timeout).
    Transport(String),
    /// The backend answered with a non-success status.
    Status { status: u16, body: String },
    /// The response body did not have the expected shape.
    Decode(String),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Transport(msg) => write!(f, "request failed: {msg}"),
            ImportError::Status { status, body } if body.is_empty() => {
                write!(f, "server responded with status {status}")
            }
            ImportError::Status { status, body } => {
                write!(f, "server responded with status {status}: {body}")
            }
            ImportError::Decode(msg) => write!(f, "unexpected response: {msg}"),
        }
    }
}

impl std::error::Error for ImportError {}

/// Remote operations the import pipeline depends on.
#[async_trait]
pub trait ImportGateway: Send + Sync {
    /// Sends the whole batch in one request.
    async fn import_customers(&self, request: &ImportRequest) -> Result<ImportResult, ImportError>;

    /// Current block snapshot used for cross-validation.
    async fn fetch_blocks(&self) -> Result<Vec<Block>, ImportError>;

    /// Reloads the authoritative customer list; returns how many customers it holds.
    async fn refresh_customers(&self) -> Result<usize, ImportError>;
}

/// Cleans the valid records, sends them, and refreshes the customer list
/// when anything was imported.
pub async fn submit_import<G>(gateway: &G, valid: &[ParsedRecord]) -> Result<ImportResult, ImportError>
where
    G: ImportGateway + ?Sized,
{
    let users: Vec<ImportRecord> = to_import_records(valid);
    info!(records = users.len(), "submitting import");

    let result = gateway.import_customers(&ImportRequest { users }).await?;
    info!(
        successful = result.successful.len(),
        failed = result.failed.len(),
        "import finished"
    );

    if !result.successful.is_empty() {
        match gateway.refresh_customers().await {
            Ok(count) => info!(customers = count, "customer list refreshed"),
            Err(err) => warn!(error = %err, "customer list refresh failed"),
        }
    }

    Ok(result)
}
