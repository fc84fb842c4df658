//! Draft mapping synthesis from captured traffic.
//!
//! A draft matches the method, exact path and query parameters of the
//! captured request. The response is always a placeholder: status 200 with
//! an empty JSON body, never copied from what was observed.

use crate::entry::LogEntry;
use serde::Serialize;
use serde_json::{Map, Value};

const DEFAULT_METHOD: &str = "GET";
const DRAFT_PRIORITY: u32 = 10;
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// A synthesized, not yet saved mapping document
#[derive(Debug, Clone, PartialEq)]
pub struct MappingDraft {
    /// Pretty-printed mapping JSON
    pub json: String,
    /// Where the draft came from, e.g. `POST /items?sort=asc`
    pub source_label: Option<String>,
}

#[derive(Serialize)]
struct DraftDocument<'a> {
    name: String,
    priority: u32,
    request: DraftRequest<'a>,
    response: DraftResponse,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DraftRequest<'a> {
    method: &'a str,
    url_path: &'a str,
    #[serde(skip_serializing_if = "Map::is_empty")]
    query_parameters: Map<String, Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DraftResponse {
    status: u16,
    headers: Map<String, Value>,
    json_body: Value,
}

/// Build a draft mapping for the request captured in `entry`
pub fn synthesize(entry: &LogEntry) -> MappingDraft {
    let method = entry.request.method.as_deref().unwrap_or(DEFAULT_METHOD);
    let full_url = entry.request.url.as_deref().unwrap_or_default();

    let (path, query) = match full_url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (full_url, None),
    };
    let url_path = if path.is_empty() { "/" } else { path };

    let query_parameters = query
        .map(parse_query)
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| {
            let mut matcher = Map::new();
            matcher.insert("equalTo".to_string(), Value::String(value));
            (name, Value::Object(matcher))
        })
        .collect();

    let mut headers = Map::new();
    headers.insert(
        "Content-Type".to_string(),
        Value::String(JSON_CONTENT_TYPE.to_string()),
    );

    let document = DraftDocument {
        name: format!("AUTO {} {}", method, url_path),
        priority: DRAFT_PRIORITY,
        request: DraftRequest {
            method,
            url_path,
            query_parameters,
        },
        response: DraftResponse {
            status: 200,
            headers,
            json_body: Value::Object(Map::new()),
        },
    };

    MappingDraft {
        json: serde_json::to_string_pretty(&document).unwrap_or_default(),
        source_label: Some(format!("{} {}", method, full_url)),
    }
}

/// Decode a query component as form data. Repeated names keep their first
/// value; order of first appearance is preserved.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = Vec::new();

    for piece in query.split('&').filter(|s| !s.is_empty()) {
        let (name, value) = piece.split_once('=').unwrap_or((piece, ""));
        let name = decode_component(name);
        if params.iter().any(|(existing, _)| *existing == name) {
            continue;
        }
        params.push((name, decode_component(value)));
    }

    params
}

/// `+` is a space, then percent-decoding; invalid UTF-8 is replaced
fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => {
            String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
        }
    }
}
