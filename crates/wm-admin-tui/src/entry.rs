//! Canonical form of a request-journal entry
//!
//! Journal entries come back in several shapes depending on the mock server
//! version and on whether a proxy sits in front of it: identifiers and
//! timestamps can live on the entry or on the nested request, under different
//! names. [`LogEntry::from_value`] is the only place that knows about those
//! aliases; everything downstream works on the canonical record.

use serde_json::{Number, Value};

/// A timestamp exactly as the journal reported it, before formatting
#[derive(Debug, Clone, PartialEq)]
pub enum RawTimestamp {
    Number(Number),
    Text(String),
    /// Anything else the server put there (bool, object, ...)
    Other(Value),
}

impl RawTimestamp {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::String(s) => Some(Self::Text(s.clone())),
            other => Some(Self::Other(other.clone())),
        }
    }

    /// Unformatted string form, numbers rendered the way JSON renders them
    pub fn raw(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
            Self::Other(v) => v.to_string(),
        }
    }
}

/// The request half of a journal entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestInfo {
    pub id: Option<String>,
    pub method: Option<String>,
    /// Path plus query string, as received
    pub url: Option<String>,
    pub absolute_url: Option<String>,
}

/// A captured request/response pair
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub id: Option<String>,
    pub request: RequestInfo,
    /// Status of the response that was served, if reported
    pub response_status: Option<u16>,
    /// First timestamp found along the alias chain
    pub timestamp: Option<RawTimestamp>,
    /// Identifier of the mapping that served this request, if any
    pub stub_mapping_id: Option<String>,
    raw: Value,
    search_text: String,
}

impl LogEntry {
    /// Normalize a raw journal entry. Never fails: unknown shapes just
    /// produce a record with empty fields.
    pub fn from_value(raw: Value) -> Self {
        let request_value = raw.get("request");
        let field = |name: &str| request_value.and_then(|r| r.get(name)).and_then(as_text);

        let request = RequestInfo {
            id: field("id"),
            method: field("method"),
            url: field("url"),
            absolute_url: field("absoluteUrl"),
        };

        let response_status = ["response", "responseDefinition"]
            .iter()
            .filter_map(|key| raw.get(*key))
            .find_map(|r| r.get("status").and_then(Value::as_u64))
            .and_then(|s| u16::try_from(s).ok());

        let stub_mapping_id = raw
            .get("stubMapping")
            .and_then(|m| m.get("id"))
            .and_then(as_text);

        let search_text = serde_json::to_string(&raw)
            .unwrap_or_default()
            .to_lowercase();

        Self {
            id: raw.get("id").and_then(as_text),
            request,
            response_status,
            timestamp: locate_timestamp(&raw),
            stub_mapping_id,
            search_text,
            raw,
        }
    }

    /// The entry as the server sent it
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Lowercased compact JSON of the raw entry, used by the free-text filter
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Pretty-printed raw entry for the detail pane
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.raw).unwrap_or_default()
    }

    /// Method and URL as shown in lists, `?` for whatever is missing
    pub fn summary(&self) -> (&str, &str) {
        let method = self.request.method.as_deref().unwrap_or("?");
        let url = self
            .request
            .url
            .as_deref()
            .or(self.request.absolute_url.as_deref())
            .unwrap_or("?");
        (method, url)
    }
}

/// Timestamp alias chain, highest priority first. A field that is present
/// but `null` does not stop the search.
fn locate_timestamp(raw: &Value) -> Option<RawTimestamp> {
    let request = raw.get("request");
    [
        raw.get("loggedDate"),
        raw.get("timestamp"),
        request.and_then(|r| r.get("loggedDate")),
        request.and_then(|r| r.get("timestamp")),
        raw.get("loggedDateString"),
    ]
    .into_iter()
    .flatten()
    .find_map(RawTimestamp::from_value)
}

/// Identifier-like values: strings as-is, numbers in their JSON form
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
