//! Stub mappings as held by the client

use serde_json::Value;

/// Request matcher keys, in the order they are tried for list labels
const URL_KEYS: [&str; 4] = ["url", "urlPattern", "urlPath", "urlPathPattern"];

/// `key` of an object as text: strings as-is, other scalars in their JSON
/// form, null or absent as `None`
pub(crate) fn text_field(document: &Value, key: &str) -> Option<String> {
    match document.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    }
}

/// A mapping from the remote collection: the document as the server
/// returned it, plus the fields the UI keys on.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    document: Value,
}

impl MappingRecord {
    pub fn from_value(document: Value) -> Self {
        Self {
            id: text_field(&document, "id"),
            name: text_field(&document, "name"),
            document,
        }
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.document).unwrap_or_default()
    }

    /// `<method> <url>` from the request matcher, `?` for missing parts
    pub fn title(&self) -> String {
        let request = self.document.get("request");
        let method = request
            .and_then(|r| r.get("method"))
            .and_then(Value::as_str)
            .unwrap_or("?");
        let url = request
            .and_then(|r| URL_KEYS.iter().find_map(|key| r.get(*key).and_then(Value::as_str)))
            .unwrap_or("?");
        format!("{} {}", method, url)
    }

    /// List label: the title, prefixed by the name when there is one
    pub fn label(&self) -> String {
        match self.name.as_deref().filter(|n| !n.is_empty()) {
            Some(name) => format!("{}  |  {}", name, self.title()),
            None => self.title(),
        }
    }
}
