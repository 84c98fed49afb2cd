use serde_json::{Map, Number, Value};

use crate::models::{FieldValue, ImportRecord, ParsedRecord};

/// Fields forwarded even when empty; the backend decides room assignment from them.
const ALWAYS_FORWARDED: [&str; 2] = ["block_name", "room_number"];

/// Projects valid records onto the payload sent to the backend.
pub fn to_import_records(valid: &[ParsedRecord]) -> Vec<ImportRecord> {
    valid.iter().map(to_import_record).collect()
}

/// Drops the row key and empty optional fields.
pub fn to_import_record(record: &ParsedRecord) -> ImportRecord {
    let mut fields = Map::new();

    for (name, value) in &record.fields {
        if name == "key" {
            continue;
        }
        if value.is_empty_text() && !ALWAYS_FORWARDED.contains(&name.as_str()) {
            continue;
        }
        fields.insert(name.clone(), to_json(value));
    }

    ImportRecord(fields)
}

fn to_json(value: &FieldValue) -> Value {
    match value {
        FieldValue::Text(s) => Value::String(s.clone()),
        FieldValue::Number(n) => {
            if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                Value::Number(Number::from(*n as i64))
            } else {
                Number::from_f64(*n)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
    }
}
