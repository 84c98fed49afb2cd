/// Columns every import file must carry.
pub const MANDATORY_HEADERS: [&str; 4] = ["name", "email", "password", "phone"];

/// Columns the backend understands beyond the mandatory ones.
pub const OPTIONAL_HEADERS: [&str; 8] = [
    "block_name",
    "room_number",
    "dob",
    "gender",
    "emergency_number_one",
    "emergency_number_two",
    "tariff_id",
    "advance",
];

/// Columns whose cells are coerced to trimmed strings while parsing.
pub const PHONE_LIKE_HEADERS: [&str; 5] = [
    "phone",
    "emergency_number_one",
    "emergency_number_two",
    "block_name",
    "room_number",
];

/// Normalizes a header: trims, lowercases, joins whitespace runs with `_`.
pub fn normalize_header(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// Mandatory columns absent from `headers`, in mandatory order.
pub fn missing_mandatory_headers(headers: &[String]) -> Vec<&'static str> {
    MANDATORY_HEADERS
        .iter()
        .copied()
        .filter(|required| !headers.iter().any(|h| h == required))
        .collect()
}

/// Full template header row: mandatory columns first, then optional ones.
pub fn template_headers() -> Vec<&'static str> {
    MANDATORY_HEADERS
        .iter()
        .chain(OPTIONAL_HEADERS.iter())
        .copied()
        .collect()
}

pub fn is_phone_like(header: &str) -> bool {
    PHONE_LIKE_HEADERS.contains(&header)
}
