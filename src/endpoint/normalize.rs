//! URL → endpoint template normalization

use crate::exchange::{file_category, origin_of, raw_path};
use crate::schema::{is_object_id, is_uuid};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Placeholder for UUID segments
pub const UUID_PLACEHOLDER: &str = "{uuid}";
/// Placeholder for 24-hex object id segments
pub const OBJECT_ID_PLACEHOLDER: &str = "{objectId}";
/// Placeholder for numeric id segments
pub const ID_PLACEHOLDER: &str = "{id}";
/// Placeholder for long opaque tokens
pub const TOKEN_PLACEHOLDER: &str = "{token}";

/// Opaque tokens: more than 32 URL-safe characters
static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{33,}$").unwrap());

/// Replace an identifier-like path segment with its placeholder.
///
/// Checks run in a fixed order: UUID, object id, digits, file extension,
/// opaque token. Anything else is kept verbatim.
pub fn normalize_segment(segment: &str) -> &str {
    if segment.is_empty() {
        return segment;
    }
    if is_uuid(segment) {
        return UUID_PLACEHOLDER;
    }
    if is_object_id(segment) {
        return OBJECT_ID_PLACEHOLDER;
    }
    if segment.bytes().all(|b| b.is_ascii_digit()) {
        return ID_PLACEHOLDER;
    }
    if let Some(category) = file_category(segment) {
        return category.placeholder();
    }
    if TOKEN_REGEX.is_match(segment) {
        return TOKEN_PLACEHOLDER;
    }
    segment
}

/// Normalize a URL into its endpoint template (origin + generalized path).
///
/// Query and fragment are dropped. The path is read from the raw text, so
/// placeholders in an already-normalized URL survive unchanged. A URL that
/// cannot be parsed is returned as-is.
pub fn normalize_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.to_string();
    };
    let Some(origin) = origin_of(&parsed) else {
        return url.to_string();
    };
    let path = raw_path(url).unwrap_or_default();
    let segments: Vec<&str> = path.split('/').map(normalize_segment).collect();
    format!("{origin}{}", segments.join("/"))
}

/// Path part of a template (everything after the origin)
pub fn template_path(template: &str) -> &str {
    match raw_path(template) {
        Some("") => "/",
        Some(path) => path,
        None => template,
    }
}
