//! Read-only accessors over a captured exchange

use super::resource::{Priority, ResourceKind};
use super::types::{CapturedExchange, NameValue};
use url::Url;

/// Domain used when a URL cannot be parsed
pub const UNKNOWN_DOMAIN: &str = "unknown";

fn find_header<'a>(headers: &'a [NameValue], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}

/// Path portion of a URL taken from the raw text (no re-encoding), without
/// query or fragment. Returns `None` when the text has no `scheme://`.
pub fn raw_path(url: &str) -> Option<&str> {
    let after_scheme = &url[url.find("://")? + 3..];
    let path_start = after_scheme.find(['/', '?', '#']);
    let rest = match path_start {
        Some(i) => &after_scheme[i..],
        None => return Some(""),
    };
    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    Some(&rest[..end])
}

/// `scheme://host[:port]` for a parsed URL
pub fn origin_of(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    })
}

impl CapturedExchange {
    /// Parsed request URL
    pub fn parsed_url(&self) -> Option<Url> {
        Url::parse(&self.url).ok()
    }

    /// Host of the request URL
    pub fn domain(&self) -> Option<String> {
        self.parsed_url()
            .and_then(|u| u.host_str().map(str::to_string))
    }

    /// Host of the request URL, or [`UNKNOWN_DOMAIN`]
    pub fn domain_or_unknown(&self) -> String {
        self.domain().unwrap_or_else(|| UNKNOWN_DOMAIN.to_string())
    }

    /// Request path, or the raw URL when unparsable
    pub fn path(&self) -> String {
        match self.parsed_url() {
            Some(u) => u.path().to_string(),
            None => self.url.clone(),
        }
    }

    /// URL scheme, lower-cased
    pub fn scheme(&self) -> Option<String> {
        self.parsed_url().map(|u| u.scheme().to_ascii_lowercase())
    }

    /// Whether the request used an encrypted scheme
    pub fn is_secure(&self) -> bool {
        matches!(self.scheme().as_deref(), Some("https" | "wss"))
    }

    /// First request header with the given name (case-insensitive)
    pub fn request_header(&self, name: &str) -> Option<&str> {
        find_header(&self.request_headers, name)
    }

    /// First response header with the given name (case-insensitive)
    pub fn response_header(&self, name: &str) -> Option<&str> {
        find_header(&self.response_headers, name)
    }

    /// End time in epoch milliseconds
    pub fn end_ms(&self) -> f64 {
        self.started_ms + self.time.max(0.0)
    }

    /// Total bytes of request cookie names and values
    pub fn cookie_bytes(&self) -> usize {
        self.cookies
            .iter()
            .map(|c| c.name.len() + c.value.len())
            .sum()
    }

    /// Resource kind from the type hint, then the media type, then the path
    pub fn resource_kind(&self) -> ResourceKind {
        if let Some(hint) = &self.resource_type {
            let kind = ResourceKind::from_hint(hint);
            if kind != ResourceKind::Other {
                return kind;
            }
        }
        let kind = ResourceKind::from_mime(&self.response_body.mime_type);
        if kind != ResourceKind::Other {
            return kind;
        }
        ResourceKind::from_path(&self.path())
    }

    /// Parsed priority hint
    pub fn priority_level(&self) -> Option<Priority> {
        self.priority.as_deref().and_then(Priority::parse)
    }

    /// Whether the response declares a JSON media type
    pub fn has_json_response(&self) -> bool {
        self.response_body
            .mime_type
            .to_ascii_lowercase()
            .contains("json")
    }
}
