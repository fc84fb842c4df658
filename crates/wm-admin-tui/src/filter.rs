//! Free-text filtering of the request journal

use crate::entry::LogEntry;

/// Entries whose JSON contains `query`, ignoring case. A blank query keeps
/// everything. Order is preserved.
pub fn filter_entries<'a>(entries: &'a [LogEntry], query: &str) -> Vec<&'a LogEntry> {
    if query.trim().is_empty() {
        return entries.iter().collect();
    }

    let needle = query.to_lowercase();
    entries
        .iter()
        .filter(|entry| entry.search_text().contains(&needle))
        .collect()
}
