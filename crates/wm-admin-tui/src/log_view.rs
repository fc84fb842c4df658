//! Request journal as shown in the Logs tab

use crate::api::AdminApi;
use crate::entry::LogEntry;
use crate::filter::filter_entries;
use crate::identity::event_key;
use crate::workflow::{DispatchOp, WorkflowError};
use tracing::{debug, info, warn};

/// Loaded journal, filter query and selection.
///
/// Selection is held as an event key, so it follows the entry across
/// refreshes instead of sticking to a row index.
#[derive(Debug, Default)]
pub struct LogView {
    entries: Vec<LogEntry>,
    pub query: String,
    selected_key: Option<String>,
}

impl LogView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries matching the current query
    pub fn visible(&self) -> Vec<&LogEntry> {
        filter_entries(&self.entries, &self.query)
    }

    pub fn selected_key(&self) -> Option<&str> {
        self.selected_key.as_deref()
    }

    pub fn select(&mut self, key: Option<String>) {
        self.selected_key = key;
    }

    /// The selected entry, whether or not the filter currently shows it
    pub fn selected(&self) -> Option<&LogEntry> {
        let key = self.selected_key.as_deref()?;
        self.entries.iter().find(|e| event_key(e) == key)
    }

    /// Position of the selection within [`LogView::visible`]
    pub fn selected_visible_index(&self) -> Option<usize> {
        let key = self.selected_key.as_deref()?;
        self.visible().iter().position(|e| event_key(e) == key)
    }

    /// Swap in a new journal, dropping the selection if its entry is gone
    pub fn replace_entries(&mut self, entries: Vec<LogEntry>) {
        self.entries = entries;
        if let Some(key) = &self.selected_key {
            if !self.entries.iter().any(|e| event_key(e) == *key) {
                debug!("Selected entry {} no longer in journal", key);
                self.selected_key = None;
            }
        }
    }

    /// Reload the journal. On failure the previous entries stay.
    pub async fn load<A>(&mut self, api: &A) -> Result<usize, WorkflowError>
    where
        A: AdminApi + ?Sized,
    {
        let raw = api.list_requests().await.map_err(|e| {
            warn!("Loading request journal failed: {}", e);
            WorkflowError::Transport(e)
        })?;

        let entries: Vec<LogEntry> = raw.into_iter().map(LogEntry::from_value).collect();
        let count = entries.len();
        debug!("Loaded {} journal entries", count);
        self.replace_entries(entries);
        Ok(count)
    }

    /// Empty the remote journal, then reload
    pub async fn clear_journal<A>(&mut self, api: &A) -> Result<(), WorkflowError>
    where
        A: AdminApi + ?Sized,
    {
        info!("Clearing request journal");
        api.reset_requests().await.map_err(|source| {
            warn!("Clearing journal rejected: {}", source);
            WorkflowError::Dispatch {
                op: DispatchOp::ClearJournal,
                source,
            }
        })?;
        self.load(api).await?;
        Ok(())
    }
}
