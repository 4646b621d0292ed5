//! Resource classification helpers
//!
//! File-extension categories, resource kinds and priority hints shared by
//! the normalizer and the detectors.

use serde::{Deserialize, Serialize};

const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "svg", "ico", "bmp", "avif", "tif", "tiff",
];
const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "csv", "rtf", "odt",
];
const MEDIA_EXTENSIONS: &[&str] = &[
    "mp4", "mp3", "webm", "ogg", "wav", "mov", "avi", "m4a", "flac", "mkv", "m3u8",
];
const ASSET_EXTENSIONS: &[&str] = &[
    "js", "mjs", "css", "map", "woff", "woff2", "ttf", "otf", "eot",
];
const FONT_EXTENSIONS: &[&str] = &["woff", "woff2", "ttf", "otf", "eot"];

/// Category of a file-like path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Image,
    Document,
    Media,
    Asset,
}

impl FileCategory {
    /// Placeholder token used in endpoint templates
    pub fn placeholder(self) -> &'static str {
        match self {
            FileCategory::Image => "{image}",
            FileCategory::Document => "{document}",
            FileCategory::Media => "{media}",
            FileCategory::Asset => "{asset}",
        }
    }
}

/// Lower-cased extension of the last path segment, if any
pub fn extension(segment: &str) -> Option<String> {
    let name = segment.rsplit('/').next().unwrap_or(segment);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Classify a path segment by its file extension
pub fn file_category(segment: &str) -> Option<FileCategory> {
    let ext = extension(segment)?;
    let ext = ext.as_str();
    if IMAGE_EXTENSIONS.contains(&ext) {
        Some(FileCategory::Image)
    } else if DOCUMENT_EXTENSIONS.contains(&ext) {
        Some(FileCategory::Document)
    } else if MEDIA_EXTENSIONS.contains(&ext) {
        Some(FileCategory::Media)
    } else if ASSET_EXTENSIONS.contains(&ext) {
        Some(FileCategory::Asset)
    } else {
        None
    }
}

/// Kind of resource an exchange fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Document,
    Script,
    Stylesheet,
    Image,
    Font,
    Media,
    Xhr,
    Fetch,
    Other,
}

impl ResourceKind {
    /// Parse a resource type hint (`_resourceType` in Chrome HAR exports)
    pub fn from_hint(hint: &str) -> Self {
        match hint.to_ascii_lowercase().as_str() {
            "document" => ResourceKind::Document,
            "script" => ResourceKind::Script,
            "stylesheet" => ResourceKind::Stylesheet,
            "image" | "img" => ResourceKind::Image,
            "font" => ResourceKind::Font,
            "media" => ResourceKind::Media,
            "xhr" => ResourceKind::Xhr,
            "fetch" => ResourceKind::Fetch,
            _ => ResourceKind::Other,
        }
    }

    /// Infer the kind from a response media type
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.to_ascii_lowercase();
        if mime.contains("javascript") || mime.contains("ecmascript") {
            ResourceKind::Script
        } else if mime.contains("text/css") {
            ResourceKind::Stylesheet
        } else if mime.starts_with("image/") {
            ResourceKind::Image
        } else if mime.starts_with("font/") || mime.contains("font-woff") {
            ResourceKind::Font
        } else if mime.starts_with("video/") || mime.starts_with("audio/") {
            ResourceKind::Media
        } else if mime.contains("text/html") {
            ResourceKind::Document
        } else {
            ResourceKind::Other
        }
    }

    /// Infer the kind from a URL path's extension
    pub fn from_path(path: &str) -> Self {
        match extension(path).as_deref() {
            Some("js" | "mjs") => ResourceKind::Script,
            Some("css") => ResourceKind::Stylesheet,
            Some(ext) if FONT_EXTENSIONS.contains(&ext) => ResourceKind::Font,
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => ResourceKind::Image,
            Some(ext) if MEDIA_EXTENSIONS.contains(&ext) => ResourceKind::Media,
            Some("html" | "htm") => ResourceKind::Document,
            _ => ResourceKind::Other,
        }
    }

    /// Stylesheets, scripts and fonts block rendering
    pub fn is_render_critical(self) -> bool {
        matches!(
            self,
            ResourceKind::Stylesheet | ResourceKind::Script | ResourceKind::Font
        )
    }

    /// Resources that are expected to carry caching headers
    pub fn is_static(self) -> bool {
        matches!(
            self,
            ResourceKind::Stylesheet | ResourceKind::Script | ResourceKind::Font | ResourceKind::Image
        )
    }
}

/// Delivery priority hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Priority {
    /// Parse a priority hint, ignoring case; unknown hints yield `None`
    pub fn parse(hint: &str) -> Option<Self> {
        match hint.to_ascii_lowercase().as_str() {
            "verylow" | "very_low" | "lowest" => Some(Priority::VeryLow),
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            "veryhigh" | "very_high" | "highest" => Some(Priority::VeryHigh),
            _ => None,
        }
    }

    pub fn is_low(self) -> bool {
        self <= Priority::Low
    }

    pub fn is_high(self) -> bool {
        self >= Priority::High
    }
}
