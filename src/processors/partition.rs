use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{ParsedRecord, RowErrors};

/// Records split by validation outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    pub valid: Vec<ParsedRecord>,
    pub invalid_keys: Vec<usize>,
}

impl Partition {
    pub fn valid_count(&self) -> usize {
        self.valid.len()
    }

    pub fn invalid_count(&self) -> usize {
        self.invalid_keys.len()
    }

    pub fn has_valid(&self) -> bool {
        !self.valid.is_empty()
    }
}

/// Splits `records` into those without errors and the keys of those with errors.
///
/// Pure function of its inputs; record order is preserved and error entries
/// for unknown keys or with no messages are ignored.
pub fn partition_records(records: &[ParsedRecord], errors: &[RowErrors]) -> Partition {
    let invalid: HashSet<usize> = errors
        .iter()
        .filter(|row| !row.errors.is_empty())
        .map(|row| row.row)
        .collect();

    let mut partition = Partition::default();
    for record in records {
        if invalid.contains(&record.key) {
            partition.invalid_keys.push(record.key);
        } else {
            partition.valid.push(record.clone());
        }
    }

    partition
}
