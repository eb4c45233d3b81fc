//! HAR 1.2 document types.
//!
//! These structs serialize to the HTTP Archive format consumed by browser
//! devtools and HAR viewers. Only the fields this recorder can actually
//! observe are modeled; fields the CDP Network domain does not surface
//! (cookie parsing, header byte sizes) carry the conventional HAR
//! "unknown" values (`-1` or an empty list).

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single name/value pair, used for both request and response headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Request body descriptor, present only for requests that carried one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    pub mime_type: String,
    pub text: String,
}

/// The request half of an entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub method: String,
    pub url: String,
    pub http_version: String,
    pub headers: Vec<Header>,
    /// Not reconstructed from the URL; always empty.
    pub query_string: Vec<Header>,
    /// Cookie parsing is not performed; always empty.
    pub cookies: Vec<Header>,
    pub headers_size: i64,
    pub body_size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_data: Option<PostData>,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            url: String::new(),
            http_version: "HTTP/1.1".to_string(),
            headers: Vec::new(),
            query_string: Vec::new(),
            cookies: Vec::new(),
            headers_size: -1,
            body_size: -1,
            post_data: None,
        }
    }
}

/// Response body descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub size: i64,
    pub mime_type: String,
    /// Body capture is not guaranteed; left out unless explicitly filled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Default for Content {
    fn default() -> Self {
        Self {
            size: 0,
            mime_type: String::new(),
            text: None,
        }
    }
}

/// The response half of an entry.
///
/// `status == 0` means the request never received a response: either it
/// failed (`status_text` carries the error) or it was still in flight when
/// the capture stopped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status: i64,
    pub status_text: String,
    pub http_version: String,
    pub headers: Vec<Header>,
    pub cookies: Vec<Header>,
    pub content: Content,
    #[serde(rename = "redirectURL")]
    pub redirect_url: String,
    pub headers_size: i64,
    pub body_size: i64,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: 0,
            status_text: String::new(),
            http_version: "HTTP/1.1".to_string(),
            headers: Vec::new(),
            cookies: Vec::new(),
            content: Content::default(),
            redirect_url: String::new(),
            headers_size: -1,
            body_size: -1,
        }
    }
}

/// Phase durations in milliseconds. Only `wait` is derived from protocol
/// timing data; `send` and `receive` stay at zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Timings {
    pub send: f64,
    pub wait: f64,
    pub receive: f64,
}

/// HAR requires a `cache` object per entry; we record nothing in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Cache {}

/// One logical network exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub started_date_time: DateTime<Utc>,
    pub time: f64,
    pub request: Request,
    pub response: Response,
    pub cache: Cache,
    pub timings: Timings,
    /// Custom extension: the CDP request identifier this entry was
    /// correlated under, kept for cross-referencing against protocol logs.
    #[serde(rename = "_requestId")]
    pub request_id: String,
}

impl Entry {
    /// Create a freshly-started entry with every field at its default.
    pub fn started(request_id: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            started_date_time: started_at,
            time: 0.0,
            request: Request::default(),
            response: Response::default(),
            cache: Cache::default(),
            timings: Timings::default(),
            request_id: request_id.into(),
        }
    }
}

/// Tool identification written into `log.creator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Creator {
    pub name: String,
    pub version: String,
}

impl Default for Creator {
    fn default() -> Self {
        Self {
            name: "harcap".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Log {
    pub version: String,
    pub creator: Creator,
    pub entries: Vec<Entry>,
}

/// The top-level HAR document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Har {
    pub log: Log,
}

impl Har {
    /// Build a HAR 1.2 document around `entries`, preserving their order.
    pub fn new(creator: Creator, entries: Vec<Entry>) -> Self {
        Self {
            log: Log {
                version: "1.2".to_string(),
                creator,
                entries,
            },
        }
    }
}
