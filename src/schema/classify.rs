//! Semantic type tags for single JSON values

use regex::Regex;
use serde_json::{Number, Value};
use std::sync::LazyLock;

/// Tag for ISO-8601 date-time strings
pub const DATE_TIME: &str = "date-time";
/// Tag for ISO-8601 date-only strings
pub const DATE: &str = "date";
/// Tag for absolute URLs
pub const URL: &str = "url";
/// Tag for 24-hex-digit object ids
pub const OBJECT_ID: &str = "objectId";
/// Tag for UUIDs
pub const UUID: &str = "uuid";
/// Tag for email addresses
pub const EMAIL: &str = "email";

/// 2024-01-15T10:30:00Z, 2024-01-15T10:30:00.123+02:00, 2024-01-15 10:30
static DATETIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:?\d{2})?$")
        .unwrap()
});

static DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*://[^\s/?#]+[^\s]*$").unwrap()
});

static OBJECT_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{24}$").unwrap());

static UUID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Ordered string format checks. The first match wins, so the order here
/// decides the tag for strings that satisfy several checks.
static STRING_FORMATS: [(&str, &LazyLock<Regex>); 6] = [
    (DATE_TIME, &DATETIME_REGEX),
    (DATE, &DATE_REGEX),
    (URL, &URL_REGEX),
    (OBJECT_ID, &OBJECT_ID_REGEX),
    (UUID, &UUID_REGEX),
    (EMAIL, &EMAIL_REGEX),
];

/// Classify a JSON value into a type tag
pub fn classify(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if is_integral(n) {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(s) => classify_string(s),
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Classify a string by its format
pub fn classify_string(s: &str) -> &'static str {
    STRING_FORMATS
        .iter()
        .find(|(_, re)| re.is_match(s))
        .map_or("string", |(tag, _)| *tag)
}

/// Whether the text is a UUID
pub fn is_uuid(s: &str) -> bool {
    UUID_REGEX.is_match(s)
}

/// Whether the text is a 24-hex-digit object id
pub fn is_object_id(s: &str) -> bool {
    OBJECT_ID_REGEX.is_match(s)
}

fn is_integral(n: &Number) -> bool {
    if n.is_i64() || n.is_u64() {
        return true;
    }
    n.as_f64()
        .is_some_and(|f| f.is_finite() && f.fract() == 0.0)
}
