//! HAR loader module
//!
//! Reads HTTP Archive (HAR 1.2) documents, as exported by browsers and
//! proxies, into the [`CapturedExchange`](crate::exchange::CapturedExchange)
//! list the analyzers consume.

mod parser;
mod types;

pub use parser::{
    exchanges_from_document, load_har, parse_har, parse_har_bytes, parse_har_document,
};
pub use types::{
    HarContent, HarCreator, HarDocument, HarEntry, HarInitiator, HarLog, HarNameValue,
    HarPostData, HarRequest, HarResponse, HarTimings,
};
