//! HAR document parser
//!
//! Converts a HAR 1.2 document into [`CapturedExchange`]s.

use crate::error::{Error, Result};
use crate::exchange::{
    CapturedExchange, Initiator, NameValue, RequestBody, ResponseBody, Timings,
};
use crate::har::types::{
    HarDocument, HarEntry, HarNameValue, HarPostData, HarResponse, HarTimings,
};
use crate::types::OptionStringExt;
use base64::Engine as _;
use chrono::DateTime;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use url::Url;

/// Load exchanges from a HAR file
pub fn load_har(path: impl AsRef<Path>) -> Result<Vec<CapturedExchange>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::file_not_found(path.display().to_string())
        } else {
            Error::Io(e)
        }
    })?;
    let exchanges = parse_har(&content)?;
    debug!(
        "Loaded {} exchanges from '{}'",
        exchanges.len(),
        path.display()
    );
    Ok(exchanges)
}

/// Parse a HAR document from a string
pub fn parse_har(json: &str) -> Result<Vec<CapturedExchange>> {
    let document = parse_har_document(json)?;
    Ok(exchanges_from_document(&document))
}

/// Parse a HAR document from raw bytes
pub fn parse_har_bytes(bytes: &[u8]) -> Result<Vec<CapturedExchange>> {
    let document: HarDocument = serde_json::from_slice(bytes)
        .map_err(|e| Error::har(format!("Failed to parse HAR JSON: {e}")))?;
    Ok(exchanges_from_document(&document))
}

/// Parse the raw HAR document without converting entries
pub fn parse_har_document(json: &str) -> Result<HarDocument> {
    serde_json::from_str(json).map_err(|e| Error::har(format!("Failed to parse HAR JSON: {e}")))
}

/// Convert every entry of a document, in document order
pub fn exchanges_from_document(document: &HarDocument) -> Vec<CapturedExchange> {
    if let Some(creator) = &document.log.creator {
        debug!(
            "HAR {} created by {} {}",
            document.log.version, creator.name, creator.version
        );
    }
    document.log.entries.iter().map(convert_entry).collect()
}

fn convert_entry(entry: &HarEntry) -> CapturedExchange {
    let request = &entry.request;
    let response = &entry.response;

    let query_params = match &request.query_string {
        Some(params) => convert_pairs(params),
        None => query_from_url(&request.url),
    };

    CapturedExchange {
        method: request.method.clone(),
        url: request.url.clone(),
        http_version: request.http_version.clone(),
        request_headers: convert_pairs(&request.headers),
        query_params,
        cookies: convert_pairs(&request.cookies),
        request_body: request.post_data.as_ref().map(convert_post_data),
        status: u16::try_from(response.status).unwrap_or(0),
        status_text: response.status_text.clone(),
        response_headers: response_headers(response),
        response_body: convert_content(entry),
        timings: convert_timings(&entry.timings),
        time: entry.time.filter(|t| t.is_finite() && *t >= 0.0).unwrap_or(0.0),
        started_ms: parse_started(&entry.started_date_time),
        server_ip: entry.server_ip_address.clone().none_if_empty(),
        connection: entry.connection.clone().none_if_empty(),
        priority: entry.priority.clone().none_if_empty(),
        resource_type: entry.resource_type.clone().none_if_empty(),
        initiator: entry.initiator.as_ref().map(|i| Initiator {
            kind: i.kind.clone(),
            url: i.url.clone().none_if_empty(),
            line_number: i.line_number,
        }),
    }
}

fn convert_pairs(pairs: &[HarNameValue]) -> Vec<NameValue> {
    pairs
        .iter()
        .map(|p| NameValue::new(p.name.clone(), p.value.clone()))
        .collect()
}

/// Response headers, with `redirectURL` surfaced as `Location` when the
/// exporter left the header out
fn response_headers(response: &HarResponse) -> Vec<NameValue> {
    let mut headers = convert_pairs(&response.headers);
    let has_location = headers
        .iter()
        .any(|h| h.name.eq_ignore_ascii_case("location"));
    if !has_location && !response.redirect_url.is_empty() {
        headers.push(NameValue::new("Location", response.redirect_url.clone()));
    }
    headers
}

fn query_from_url(url: &str) -> Vec<NameValue> {
    Url::parse(url)
        .map(|u| {
            u.query_pairs()
                .map(|(k, v)| NameValue::new(k.into_owned(), v.into_owned()))
                .collect()
        })
        .unwrap_or_default()
}

fn convert_post_data(post: &HarPostData) -> RequestBody {
    let text = post.text.clone().or_else(|| {
        if post.params.is_empty() {
            None
        } else {
            Some(
                post.params
                    .iter()
                    .map(|p| format!("{}={}", p.name, p.value))
                    .collect::<Vec<_>>()
                    .join("&"),
            )
        }
    });
    RequestBody {
        mime_type: post.mime_type.clone(),
        text,
    }
}

fn convert_content(entry: &HarEntry) -> ResponseBody {
    let content = &entry.response.content;
    let text = match (&content.text, content.encoding.as_deref()) {
        (Some(raw), Some(enc)) if enc.eq_ignore_ascii_case("base64") => decode_base64_text(raw),
        (text, _) => text.clone(),
    };
    let size = u64::try_from(content.size)
        .ok()
        .filter(|s| *s > 0)
        .or_else(|| text.as_ref().map(|t| t.len() as u64))
        .unwrap_or(0);
    ResponseBody {
        mime_type: content.mime_type.clone(),
        size,
        text,
        compression: content.compression,
    }
}

/// Decode a base64 body, keeping it only when it is UTF-8 text
fn decode_base64_text(raw: &str) -> Option<String> {
    match base64::engine::general_purpose::STANDARD.decode(raw.trim()) {
        Ok(bytes) => String::from_utf8(bytes).ok(),
        Err(e) => {
            debug!("Ignoring undecodable base64 body: {}", e);
            None
        }
    }
}

fn convert_timings(t: &HarTimings) -> Timings {
    // Negative values (HAR uses -1) mean "not measured"
    let measured = |v: Option<f64>| v.filter(|x| x.is_finite() && *x >= 0.0);
    Timings {
        blocked: measured(t.blocked),
        dns: measured(t.dns),
        connect: measured(t.connect),
        ssl: measured(t.ssl),
        send: measured(t.send),
        wait: measured(t.wait),
        receive: measured(t.receive),
    }
}

fn parse_started(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    match DateTime::parse_from_rfc3339(text) {
        Ok(dt) => dt.timestamp_micros() as f64 / 1000.0,
        Err(e) => {
            warn!("Unparsable startedDateTime '{}': {}", text, e);
            0.0
        }
    }
}
