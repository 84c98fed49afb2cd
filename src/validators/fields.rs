use crate::models::ParsedRecord;
use crate::utils::text::{
    is_valid_email, is_valid_password, is_valid_phone, parse_calendar_date, MIN_PASSWORD_LEN,
};

/// Per-field rules: required columns and their formats, plus `dob`.
pub fn check_fields(record: &ParsedRecord) -> Vec<String> {
    let mut errors = Vec::new();

    if !record.is_supplied("name") {
        errors.push("name is required.".to_string());
    }

    match record.text("email") {
        Some(email) if !email.trim().is_empty() => {
            if !is_valid_email(&email) {
                errors.push("email is not a valid email address.".to_string());
            }
        }
        _ => errors.push("email is required.".to_string()),
    }

    match record.text("phone") {
        Some(phone) if !phone.trim().is_empty() => {
            if !is_valid_phone(&phone) {
                errors.push("phone must be exactly 10 digits.".to_string());
            }
        }
        _ => errors.push("phone is required.".to_string()),
    }

    match record.text("password") {
        Some(password) if !password.is_empty() => {
            if !is_valid_password(&password) {
                errors.push(format!(
                    "password must be at least {} characters.",
                    MIN_PASSWORD_LEN
                ));
            }
        }
        _ => errors.push("password is required.".to_string()),
    }

    if let Some(dob) = record.text("dob") {
        if !dob.trim().is_empty() && parse_calendar_date(&dob).is_none() {
            errors.push("dob is not a valid date.".to_string());
        }
    }

    errors
}

/// `block_name` and `room_number` come together or not at all.
pub fn check_block_room_pair(record: &ParsedRecord) -> Option<String> {
    match (record.is_supplied("block_name"), record.is_supplied("room_number")) {
        (true, false) => Some("room_number is required when block_name is provided.".to_string()),
        (false, true) => Some("block_name is required when room_number is provided.".to_string()),
        _ => None,
    }
}
