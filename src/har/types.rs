//! HAR 1.2 document types
//!
//! Only the fields the analyzers read are modelled; everything is lenient
//! so exports from different browsers and proxies load without fuss.

use serde::{Deserialize, Serialize};

/// Top-level HAR document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarDocument {
    pub log: HarLog,
}

/// The `log` object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarLog {
    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub creator: Option<HarCreator>,

    pub entries: Vec<HarEntry>,
}

/// Tool that produced the archive
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarCreator {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// One request/response entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarEntry {
    #[serde(default)]
    pub started_date_time: String,

    /// Total elapsed time in ms
    #[serde(default)]
    pub time: Option<f64>,

    pub request: HarRequest,

    pub response: HarResponse,

    #[serde(default)]
    pub timings: HarTimings,

    #[serde(rename = "serverIPAddress", default)]
    pub server_ip_address: Option<String>,

    #[serde(default)]
    pub connection: Option<String>,

    /// Chrome extension: fetch priority
    #[serde(rename = "_priority", default)]
    pub priority: Option<String>,

    /// Chrome extension: resource type
    #[serde(rename = "_resourceType", default)]
    pub resource_type: Option<String>,

    /// Chrome extension: initiator
    #[serde(rename = "_initiator", default)]
    pub initiator: Option<HarInitiator>,
}

/// Name/value pair used for headers, cookies and query strings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarNameValue {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// Request part of an entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarRequest {
    pub method: String,

    pub url: String,

    #[serde(default)]
    pub http_version: String,

    #[serde(default)]
    pub headers: Vec<HarNameValue>,

    /// `None` when the exporter omitted it; parameters are then read from the URL
    #[serde(default)]
    pub query_string: Option<Vec<HarNameValue>>,

    #[serde(default)]
    pub cookies: Vec<HarNameValue>,

    #[serde(default)]
    pub post_data: Option<HarPostData>,
}

/// Request payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarPostData {
    #[serde(default)]
    pub mime_type: String,

    #[serde(default)]
    pub text: Option<String>,

    /// Form parameters, used when `text` is missing
    #[serde(default)]
    pub params: Vec<HarNameValue>,
}

/// Response part of an entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarResponse {
    #[serde(default)]
    pub status: i64,

    #[serde(default)]
    pub status_text: String,

    #[serde(default)]
    pub headers: Vec<HarNameValue>,

    #[serde(default)]
    pub content: HarContent,

    #[serde(rename = "redirectURL", default)]
    pub redirect_url: String,
}

/// Response body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarContent {
    #[serde(default)]
    pub size: i64,

    #[serde(default)]
    pub compression: Option<i64>,

    #[serde(default)]
    pub mime_type: String,

    #[serde(default)]
    pub text: Option<String>,

    /// `base64` for binary or encoded bodies
    #[serde(default)]
    pub encoding: Option<String>,
}

/// Timing phases; `-1` marks a phase that does not apply
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HarTimings {
    #[serde(default)]
    pub blocked: Option<f64>,
    #[serde(default)]
    pub dns: Option<f64>,
    #[serde(default)]
    pub connect: Option<f64>,
    #[serde(default)]
    pub ssl: Option<f64>,
    #[serde(default)]
    pub send: Option<f64>,
    #[serde(default)]
    pub wait: Option<f64>,
    #[serde(default)]
    pub receive: Option<f64>,
}

/// Request initiator (Chrome extension)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarInitiator {
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub line_number: Option<u64>,
}
