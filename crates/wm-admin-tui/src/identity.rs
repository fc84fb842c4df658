//! Stable keys for journal entries
//!
//! Selection in the log list is tracked by key rather than by index so it
//! survives a refresh that reorders or extends the list.

use crate::entry::{LogEntry, RawTimestamp};

/// Separator for composite keys
const KEY_DELIMITER: &str = "|";

/// Stand-in for a missing method or URL
const PLACEHOLDER: &str = "?";

/// Key for an entry: its own id, else the request id, else
/// `method|url|timestamp`.
///
/// Entries without identifiers that share method, URL and timestamp get the
/// same key. The key is best-effort, not a uniqueness guarantee.
pub fn event_key(entry: &LogEntry) -> String {
    if let Some(id) = entry.id.as_ref().or(entry.request.id.as_ref()) {
        return id.clone();
    }

    let request = &entry.request;
    let method = request.method.as_deref().unwrap_or(PLACEHOLDER);
    let url = request
        .url
        .as_deref()
        .or(request.absolute_url.as_deref())
        .unwrap_or(PLACEHOLDER);
    let timestamp = entry
        .timestamp
        .as_ref()
        .map(RawTimestamp::raw)
        .unwrap_or_default();

    [method, url, timestamp.as_str()].join(KEY_DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(value: serde_json::Value) -> String {
        event_key(&LogEntry::from_value(value))
    }

    #[test]
    fn test_entry_id_wins() {
        assert_eq!(
            key(json!({ "id": "outer", "request": { "id": "inner", "method": "GET" } })),
            "outer"
        );
    }

    #[test]
    fn test_request_id_is_second_choice() {
        assert_eq!(key(json!({ "request": { "id": "inner", "url": "/x" } })), "inner");
    }

    #[test]
    fn test_composite_key() {
        assert_eq!(
            key(json!({ "request": { "method": "POST", "url": "/items", "loggedDate": 1700000000000u64 } })),
            "POST|/items|1700000000000"
        );
    }

    #[test]
    fn test_composite_key_placeholders() {
        assert_eq!(key(json!({})), "?|?|");
        assert_eq!(
            key(json!({ "request": { "absoluteUrl": "http://h/a" }, "loggedDateString": "today" })),
            "?|http://h/a|today"
        );
    }

    #[test]
    fn test_key_is_stable_across_refetches() {
        let entry = json!({ "request": { "method": "GET", "url": "/a", "timestamp": "t1" } });
        assert_eq!(key(entry.clone()), key(entry));
    }

    #[test]
    fn test_response_differences_do_not_change_key() {
        let a = json!({
            "request": { "method": "GET", "url": "/a", "timestamp": "t1" },
            "response": { "status": 200, "body": "first" }
        });
        let b = json!({
            "request": { "method": "GET", "url": "/a", "timestamp": "t1" },
            "response": { "status": 200, "body": "second" }
        });
        assert_eq!(key(a), key(b));
    }
}
