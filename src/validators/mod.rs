mod blocks;
mod fields;

use tracing::info;

use crate::models::{Block, ParsedRecord, RowErrors};

pub use blocks::check_block;
pub use fields::{check_block_room_pair, check_fields};

/// Validates every record against the field rules and the loaded blocks.
///
/// Rows without violations are omitted; the result is ordered by row key
/// and fully replaces any earlier validation.
pub fn validate_records(records: &[ParsedRecord], blocks: &[Block]) -> Vec<RowErrors> {
    let row_errors: Vec<RowErrors> = records
        .iter()
        .filter_map(|record| {
            let errors = validate_record(record, blocks);
            (!errors.is_empty()).then(|| RowErrors {
                row: record.key,
                errors,
            })
        })
        .collect();

    info!(
        rows = records.len(),
        invalid = row_errors.len(),
        blocks = blocks.len(),
        "validated import rows"
    );

    row_errors
}

/// All messages for one record, in rule order.
pub fn validate_record(record: &ParsedRecord, blocks: &[Block]) -> Vec<String> {
    let mut errors = check_fields(record);
    errors.extend(check_block_room_pair(record));
    errors.extend(check_block(record, blocks));
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldValue;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn record(key: usize, pairs: &[(&str, &str)]) -> ParsedRecord {
        let fields: BTreeMap<String, FieldValue> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), FieldValue::Text(v.to_string())))
            .collect();
        ParsedRecord { key, fields }
    }

    fn base() -> Vec<(&'static str, &'static str)> {
        vec![
            ("name", "Jay"),
            ("email", "jay@x.com"),
            ("phone", "9876543210"),
            ("password", "secret1"),
        ]
    }

    fn tower_a() -> Vec<Block> {
        vec![Block {
            block_id: json!(1),
            block_name: "Tower A".to_string(),
        }]
    }

    #[test]
    fn test_clean_row_has_no_errors() {
        let records = vec![record(0, &base())];
        assert!(validate_records(&records, &[]).is_empty());
        assert!(validate_records(&records, &tower_a()).is_empty());
    }

    #[test]
    fn test_block_without_room() {
        let mut pairs = base();
        pairs.push(("block_name", "Tower A"));
        pairs.push(("room_number", ""));
        let errors = validate_records(&[record(0, &pairs)], &tower_a());
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].errors,
            vec!["room_number is required when block_name is provided.".to_string()]
        );
    }

    #[test]
    fn test_short_phone() {
        let mut pairs = base();
        pairs[2] = ("phone", "12345");
        let errors = validate_records(&[record(0, &pairs)], &[]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].errors, vec!["phone must be exactly 10 digits.".to_string()]);
    }

    #[test]
    fn test_block_name_case_insensitive() {
        let mut pairs = base();
        pairs.push(("block_name", "tower a"));
        pairs.push(("room_number", "101"));
        assert!(validate_records(&[record(0, &pairs)], &tower_a()).is_empty());
    }

    #[test]
    fn test_errors_accumulate_in_rule_order() {
        let pairs = vec![
            ("name", "  "),
            ("email", "nope"),
            ("phone", ""),
            ("password", "abc"),
            ("dob", "31/02/2000"),
            ("room_number", "12"),
        ];
        let errors = validate_records(&[record(4, &pairs)], &tower_a());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, 4);
        assert_eq!(
            errors[0].errors,
            vec![
                "name is required.".to_string(),
                "email is not a valid email address.".to_string(),
                "phone is required.".to_string(),
                "password must be at least 6 characters.".to_string(),
                "dob is not a valid date.".to_string(),
                "block_name is required when room_number is provided.".to_string(),
            ]
        );
    }

    #[test]
    fn test_unknown_block_lists_valid_names() {
        let mut pairs = base();
        pairs.push(("block_name", "Tower Z"));
        pairs.push(("room_number", "7"));
        let blocks = vec![
            Block { block_id: json!(1), block_name: "Tower A".to_string() },
            Block { block_id: json!("b2"), block_name: "Annex".to_string() },
        ];
        let errors = validate_records(&[record(0, &pairs)], &blocks);
        assert_eq!(
            errors[0].errors,
            vec!["Block \"Tower Z\" does not exist. Valid blocks: Tower A, Annex.".to_string()]
        );

        // no blocks loaded: cross-check skipped
        assert!(validate_records(&[record(0, &pairs)], &[]).is_empty());
    }

    #[test]
    fn test_validation_is_idempotent() {
        let mut bad = base();
        bad[1] = ("email", "");
        let records = vec![record(0, &base()), record(1, &bad), record(2, &[])];
        let first = validate_records(&records, &tower_a());
        let second = validate_records(&records, &tower_a());
        assert_eq!(first, second);
        assert_eq!(first.iter().map(|e| e.row).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(first[1].errors.len(), 4);
    }
}
