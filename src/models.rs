use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// A spreadsheet cell as read, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    /// Days since 1899-12-30 (spreadsheet date system)
    DateSerial(f64),
}

/// Header-keyed cells of one data row, in column order.
pub type RawRow = Vec<(String, CellValue)>;

/// Canonical value of a parsed field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(s) => Cow::Borrowed(s.as_str()),
            FieldValue::Number(n) => Cow::Owned(format_number(*n)),
        }
    }

    pub fn is_empty_text(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.is_empty())
    }
}

/// Renders integral floats without a trailing ".0" (phone numbers arrive as floats).
pub fn format_number(n: f64) -> String {
    if n.fract().abs() < f64::EPSILON && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedRecord {
    /// Zero-based offset within the data rows (header excluded).
    pub key: usize,
    pub fields: BTreeMap<String, FieldValue>,
}

impl ParsedRecord {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn text(&self, field: &str) -> Option<Cow<'_, str>> {
        self.fields.get(field).map(FieldValue::as_text)
    }

    /// The field is present and not blank after trimming.
    pub fn is_supplied(&self, field: &str) -> bool {
        self.text(field)
            .map(|value| !value.trim().is_empty())
            .unwrap_or(false)
    }

    /// Row number as a spreadsheet user sees it (1-based, after the header).
    pub fn display_row(&self) -> usize {
        self.key + 2
    }
}

/// One row's validation messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowErrors {
    pub row: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub block_id: Value,
    pub block_name: String,
}

/// Backend-ready projection of a valid record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportRecord(pub Map<String, Value>);

impl ImportRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    pub users: Vec<ImportRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    #[serde(default)]
    pub successful: Vec<ImportRecord>,
    #[serde(default)]
    pub failed: Vec<FailedImport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedImport {
    pub user: Value,
    pub error: String,
}

impl FailedImport {
    /// Value identifying a failed record, usually its email.
    pub fn identifier(&self) -> String {
        for field in ["email", "name", "phone"] {
            match self.user.get(field) {
                Some(Value::String(s)) if !s.trim().is_empty() => return s.clone(),
                Some(Value::Number(n)) => return n.to_string(),
                _ => {}
            }
        }
        self.user.to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppError {
    pub message: String,
}

impl AppError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}
