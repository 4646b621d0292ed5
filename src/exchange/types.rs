//! Captured exchange types
//!
//! One recorded request/response pair, as produced by the HAR loader.

use serde::{Deserialize, Serialize};

/// A name/value pair (header, query parameter or cookie)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameValue {
    pub name: String,
    pub value: String,
}

impl NameValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Request payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    /// Declared media type
    pub mime_type: String,
    /// Raw body text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Response payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseBody {
    /// Declared media type
    pub mime_type: String,
    /// Decoded body size in bytes
    pub size: u64,
    /// Raw body text, when captured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Bytes saved by content encoding, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<i64>,
}

/// Per-phase timing breakdown in milliseconds.
///
/// `None` means the phase was not measured (HAR uses `-1` for this).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Timings {
    pub blocked: Option<f64>,
    pub dns: Option<f64>,
    pub connect: Option<f64>,
    pub ssl: Option<f64>,
    pub send: Option<f64>,
    pub wait: Option<f64>,
    pub receive: Option<f64>,
}

/// What triggered the request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Initiator {
    /// Initiator type (`parser`, `script`, `other`, ...)
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u64>,
}

/// One recorded HTTP request/response pair.
///
/// Treated as immutable input by every analysis function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapturedExchange {
    /// Request method as recorded
    pub method: String,
    /// Absolute request URL
    pub url: String,
    /// Protocol version (`HTTP/1.1`, `h2`, ...)
    pub http_version: String,
    /// Request headers in capture order
    pub request_headers: Vec<NameValue>,
    /// Query string parameters
    pub query_params: Vec<NameValue>,
    /// Request cookies
    pub cookies: Vec<NameValue>,
    /// Request payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,

    /// Response status code (0 when the request never completed)
    pub status: u16,
    pub status_text: String,
    /// Response headers in capture order
    pub response_headers: Vec<NameValue>,
    pub response_body: ResponseBody,

    pub timings: Timings,
    /// Total elapsed time in milliseconds
    pub time: f64,
    /// Start time as milliseconds since the Unix epoch
    pub started_ms: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
    /// Delivery priority hint (`VeryHigh`, `High`, `Medium`, `Low`, `VeryLow`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// Resource type hint (`script`, `stylesheet`, `image`, `xhr`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiator: Option<Initiator>,
}

impl CapturedExchange {
    /// Create an exchange with a method and URL, everything else empty
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            http_version: "HTTP/1.1".to_string(),
            status: 200,
            status_text: "OK".to_string(),
            ..Default::default()
        }
    }

    /// Set the response status
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Set start time and total duration (ms)
    #[must_use]
    pub fn with_timing(mut self, started_ms: f64, time: f64) -> Self {
        self.started_ms = started_ms;
        self.time = time;
        self
    }

    /// Set the per-phase timings
    #[must_use]
    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    /// Add a request header
    #[must_use]
    pub fn with_request_header(mut self, name: &str, value: &str) -> Self {
        self.request_headers.push(NameValue::new(name, value));
        self
    }

    /// Add a response header
    #[must_use]
    pub fn with_response_header(mut self, name: &str, value: &str) -> Self {
        self.response_headers.push(NameValue::new(name, value));
        self
    }

    /// Add a query parameter
    #[must_use]
    pub fn with_query_param(mut self, name: &str, value: &str) -> Self {
        self.query_params.push(NameValue::new(name, value));
        self
    }

    /// Add a request cookie
    #[must_use]
    pub fn with_cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.push(NameValue::new(name, value));
        self
    }

    /// Set the request payload
    #[must_use]
    pub fn with_request_body(mut self, mime_type: &str, text: &str) -> Self {
        self.request_body = Some(RequestBody {
            mime_type: mime_type.to_string(),
            text: Some(text.to_string()),
        });
        self
    }

    /// Set the response payload; size is taken from the text length
    #[must_use]
    pub fn with_response_body(mut self, mime_type: &str, text: &str) -> Self {
        self.response_body = ResponseBody {
            mime_type: mime_type.to_string(),
            size: text.len() as u64,
            text: Some(text.to_string()),
            compression: None,
        };
        self
    }

    /// Set the response media type and size without a body
    #[must_use]
    pub fn with_response_size(mut self, mime_type: &str, size: u64) -> Self {
        self.response_body.mime_type = mime_type.to_string();
        self.response_body.size = size;
        self
    }

    /// Set the resource type hint
    #[must_use]
    pub fn with_resource_type(mut self, resource_type: &str) -> Self {
        self.resource_type = Some(resource_type.to_string());
        self
    }

    /// Set the priority hint
    #[must_use]
    pub fn with_priority(mut self, priority: &str) -> Self {
        self.priority = Some(priority.to_string());
        self
    }
}
