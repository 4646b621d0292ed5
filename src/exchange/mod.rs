//! Captured exchange model
//!
//! The immutable input to every analysis: one recorded HTTP
//! request/response pair with timings and capture metadata.

mod inspect;
mod resource;
mod types;

pub use inspect::{origin_of, raw_path, UNKNOWN_DOMAIN};
pub use resource::{extension, file_category, FileCategory, Priority, ResourceKind};
pub use types::{CapturedExchange, Initiator, NameValue, RequestBody, ResponseBody, Timings};
