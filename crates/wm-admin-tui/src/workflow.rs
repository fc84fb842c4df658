//! Mapping editor state and the save sequence
//!
//! [`MappingWorkflow`] owns what the mapping editor shows: which mapping is
//! being edited (if any), its free-text JSON, and its name. Transitions are
//! explicit methods; the UI mirrors `editor().text` into its text widget
//! after each one.
//!
//! Saving is parse, merge name, create or update, persist to disk, reload.
//! Each step either succeeds or ends the sequence with a [`WorkflowError`];
//! nothing already sent is rolled back and the editor text is never lost.
//! Once the server accepts a create, the editor is bound to the new id even
//! if a later step fails.

use crate::api::{AdminApi, ApiError};
use crate::mapping::{text_field, MappingRecord};
use crate::synth::MappingDraft;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Remote mutations that can be rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOp {
    Create,
    Update,
    Delete,
    ClearJournal,
}

impl fmt::Display for DispatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::ClearJournal => "Clear journal",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Editor text is not a JSON object; nothing was sent
    #[error("Invalid mapping JSON: {0}")]
    Parse(String),
    /// The server rejected a create, update or delete
    #[error("{op} failed: {source}")]
    Dispatch { op: DispatchOp, source: ApiError },
    /// The change reached the server but was not written to disk
    #[error("Save-to-disk failed: {0}")]
    Persist(ApiError),
    /// Loading a collection failed
    #[error(transparent)]
    Transport(ApiError),
    /// The save went through but the collection could not be reloaded
    #[error("Saved, but reloading mappings failed: {source}")]
    Reload {
        outcome: SaveOutcome,
        source: ApiError,
    },
}

/// Whether the editor is bound to an existing mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode<'a> {
    Editing(&'a str),
    New,
}

/// What the mapping editor holds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorState {
    editing_id: Option<String>,
    pub text: String,
    pub name: String,
}

impl EditorState {
    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn mode(&self) -> EditorMode<'_> {
        match self.editing_id.as_deref() {
            Some(id) => EditorMode::Editing(id),
            None => EditorMode::New,
        }
    }

    pub fn is_new(&self) -> bool {
        self.editing_id.is_none()
    }
}

/// Result of a successful save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// `id` is the server-assigned id, when the response carried one
    Created { id: Option<String> },
    Updated { id: String },
}

impl SaveOutcome {
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Created { id } => id.as_deref(),
            Self::Updated { id } => Some(id),
        }
    }
}

#[derive(Debug, Default)]
pub struct MappingWorkflow {
    editor: EditorState,
    mappings: Vec<MappingRecord>,
    draft_source: Option<String>,
    pending_open: Option<String>,
}

impl MappingWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditorState {
        &mut self.editor
    }

    pub fn mappings(&self) -> &[MappingRecord] {
        &self.mappings
    }

    /// Provenance of the draft currently in the editor
    pub fn draft_source(&self) -> Option<&str> {
        self.draft_source.as_deref()
    }

    /// Id of an open request still waiting for its mapping to show up
    pub fn pending_open(&self) -> Option<&str> {
        self.pending_open.as_deref()
    }

    pub fn find(&self, id: &str) -> Option<&MappingRecord> {
        self.mappings.iter().find(|m| m.id.as_deref() == Some(id))
    }

    /// Load `mapping` into the editor
    pub fn select(&mut self, mapping: &MappingRecord) {
        debug!("Selecting mapping {:?}", mapping.id);
        self.editor = EditorState {
            editing_id: mapping.id.clone(),
            text: mapping.pretty(),
            name: mapping.name.clone().unwrap_or_default(),
        };
        self.draft_source = None;
    }

    /// Select the mapping with `id`; false when it is not loaded
    pub fn select_id(&mut self, id: &str) -> bool {
        match self.find(id).cloned() {
            Some(mapping) => {
                self.select(&mapping);
                true
            }
            None => false,
        }
    }

    pub fn select_index(&mut self, index: usize) -> bool {
        match self.mappings.get(index).cloned() {
            Some(mapping) => {
                self.select(&mapping);
                true
            }
            None => false,
        }
    }

    /// Empty editor in new-mapping mode
    pub fn compose_new(&mut self) {
        self.editor = EditorState::default();
        self.draft_source = None;
    }

    /// Take over a synthesized draft as a new, unsaved mapping
    pub fn adopt_draft(&mut self, draft: MappingDraft) {
        let name = serde_json::from_str::<Value>(&draft.json)
            .ok()
            .and_then(|doc| doc.get("name").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_default();

        info!("Adopting draft {:?}", draft.source_label);
        self.editor = EditorState {
            editing_id: None,
            text: draft.json,
            name,
        };
        self.draft_source = draft.source_label;
        self.pending_open = None;
    }

    /// Ask for the mapping with `id` to be opened. Returns true when it was
    /// found right away; otherwise the request waits for the next load.
    pub fn request_open(&mut self, id: impl Into<String>) -> bool {
        self.pending_open = Some(id.into());
        self.resolve_pending_open()
    }

    /// Try the pending open request against the loaded mappings
    pub fn resolve_pending_open(&mut self) -> bool {
        let Some(id) = self.pending_open.clone() else {
            return false;
        };
        if !self.select_id(&id) {
            debug!("Mapping {} not loaded yet, keeping open request", id);
            return false;
        }
        self.pending_open = None;
        true
    }

    /// Swap in a freshly loaded collection
    pub fn replace_mappings(&mut self, mappings: Vec<MappingRecord>) {
        self.mappings = mappings;
        self.resolve_pending_open();
    }

    /// Reload the collection. On failure the previous one stays.
    pub async fn load<A>(&mut self, api: &A) -> Result<usize, WorkflowError>
    where
        A: AdminApi + ?Sized,
    {
        let raw = api.list_mappings().await.map_err(|e| {
            warn!("Loading mappings failed: {}", e);
            WorkflowError::Transport(e)
        })?;

        let mappings: Vec<MappingRecord> =
            raw.into_iter().map(MappingRecord::from_value).collect();
        let count = mappings.len();
        debug!("Loaded {} mappings", count);
        self.replace_mappings(mappings);
        Ok(count)
    }

    /// Editor text parsed and merged with the name field, ready to send
    pub fn prepare_document(&self) -> Result<Value, WorkflowError> {
        let text = self.editor.text.trim();
        let parsed: Value = if text.is_empty() {
            Value::Object(Map::new())
        } else {
            serde_json::from_str(text).map_err(|e| WorkflowError::Parse(e.to_string()))?
        };

        let Value::Object(mut document) = parsed else {
            return Err(WorkflowError::Parse(
                "mapping must be a JSON object".to_string(),
            ));
        };

        let name = self.editor.name.trim();
        if name.is_empty() {
            document.retain(|key, _| key != "name");
        } else {
            document.insert("name".to_string(), Value::String(name.to_string()));
        }

        Ok(Value::Object(document))
    }

    /// Create or update, persist, reload
    pub async fn save<A>(&mut self, api: &A) -> Result<SaveOutcome, WorkflowError>
    where
        A: AdminApi + ?Sized,
    {
        let document = self.prepare_document()?;

        let outcome = match self.editor.editing_id.clone() {
            Some(id) => {
                info!("Updating mapping {}", id);
                api.update_mapping(&id, &document)
                    .await
                    .map_err(|source| dispatch_error(DispatchOp::Update, source))?;
                SaveOutcome::Updated { id }
            }
            None => {
                info!("Creating mapping");
                let created = api
                    .create_mapping(&document)
                    .await
                    .map_err(|source| dispatch_error(DispatchOp::Create, source))?;
                SaveOutcome::Created {
                    id: text_field(&created, "id"),
                }
            }
        };

        // The server has the mapping now; a resave must update it
        if let Some(id) = outcome.id() {
            self.editor.editing_id = Some(id.to_string());
            self.draft_source = None;
        }

        self.persist(api).await?;
        if let Err(WorkflowError::Transport(source)) = self.load(api).await {
            return Err(WorkflowError::Reload { outcome, source });
        }

        if let Some(id) = outcome.id() {
            if !self.select_id(id) {
                warn!("Saved mapping {} missing after reload", id);
            }
        }

        info!("Mapping saved: {:?}", outcome);
        Ok(outcome)
    }

    /// Delete, persist, reload. Deleting the mapping being edited keeps its
    /// text in the editor as a new, unsaved mapping.
    pub async fn delete<A>(&mut self, api: &A, id: &str) -> Result<(), WorkflowError>
    where
        A: AdminApi + ?Sized,
    {
        info!("Deleting mapping {}", id);
        api.delete_mapping(id)
            .await
            .map_err(|source| dispatch_error(DispatchOp::Delete, source))?;

        if self.editor.editing_id.as_deref() == Some(id) {
            self.editor.editing_id = None;
        }
        if self.pending_open.as_deref() == Some(id) {
            self.pending_open = None;
        }

        self.persist(api).await?;
        self.load(api).await?;
        Ok(())
    }

    async fn persist<A: AdminApi + ?Sized>(&self, api: &A) -> Result<(), WorkflowError> {
        api.persist_mappings().await.map_err(|e| {
            warn!("Persisting mappings failed: {}", e);
            WorkflowError::Persist(e)
        })
    }
}

fn dispatch_error(op: DispatchOp, source: ApiError) -> WorkflowError {
    warn!("{} rejected: {}", op, source);
    WorkflowError::Dispatch { op, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> MappingRecord {
        MappingRecord::from_value(value)
    }

    fn workflow_with(mappings: Vec<Value>) -> MappingWorkflow {
        let mut workflow = MappingWorkflow::new();
        workflow.replace_mappings(mappings.into_iter().map(record).collect());
        workflow
    }

    #[test]
    fn test_select_adopts_id_text_and_name() {
        let mut workflow = workflow_with(vec![json!({ "id": "m-1", "name": "orders" })]);
        assert!(workflow.select_index(0));

        let editor = workflow.editor();
        assert_eq!(editor.mode(), EditorMode::Editing("m-1"));
        assert_eq!(editor.name, "orders");
        assert!(editor.text.contains("\"orders\""));
    }

    #[test]
    fn test_select_clears_draft_label() {
        let mut workflow = workflow_with(vec![json!({ "id": "m-1" })]);
        workflow.adopt_draft(MappingDraft {
            json: "{}".to_string(),
            source_label: Some("GET /x".to_string()),
        });
        assert_eq!(workflow.draft_source(), Some("GET /x"));

        workflow.select_id("m-1");
        assert_eq!(workflow.draft_source(), None);
        assert_eq!(workflow.editor().name, "");
    }

    #[test]
    fn test_adopt_draft_enters_new_mode() {
        let mut workflow = workflow_with(vec![json!({ "id": "m-1" })]);
        workflow.select_id("m-1");

        workflow.adopt_draft(MappingDraft {
            json: r#"{"name":"AUTO GET /x"}"#.to_string(),
            source_label: Some("GET /x".to_string()),
        });

        assert!(workflow.editor().is_new());
        assert_eq!(workflow.editor().name, "AUTO GET /x");
        assert_eq!(workflow.editor().text, r#"{"name":"AUTO GET /x"}"#);
    }

    #[test]
    fn test_adopt_draft_with_broken_json_keeps_text() {
        let mut workflow = MappingWorkflow::new();
        workflow.adopt_draft(MappingDraft {
            json: "{ nope".to_string(),
            source_label: None,
        });
        assert_eq!(workflow.editor().name, "");
        assert_eq!(workflow.editor().text, "{ nope");
    }

    #[test]
    fn test_adopt_draft_cancels_pending_open() {
        let mut workflow = MappingWorkflow::new();
        assert!(!workflow.request_open("m-9"));
        assert_eq!(workflow.pending_open(), Some("m-9"));

        workflow.adopt_draft(MappingDraft {
            json: "{}".to_string(),
            source_label: None,
        });
        assert_eq!(workflow.pending_open(), None);

        workflow.replace_mappings(vec![record(json!({ "id": "m-9" }))]);
        assert!(workflow.editor().is_new());
    }

    #[test]
    fn test_open_request_waits_for_collection() {
        let mut workflow = MappingWorkflow::new();
        assert!(!workflow.request_open("m-2"));
        assert!(workflow.editor().is_new());

        workflow.replace_mappings(vec![record(json!({ "id": "m-1" }))]);
        assert_eq!(workflow.pending_open(), Some("m-2"));

        workflow.replace_mappings(vec![
            record(json!({ "id": "m-1" })),
            record(json!({ "id": "m-2", "name": "late" })),
        ]);
        assert_eq!(workflow.pending_open(), None);
        assert_eq!(workflow.editor().editing_id(), Some("m-2"));
        assert_eq!(workflow.editor().name, "late");

        // resolved exactly once
        workflow.compose_new();
        workflow.replace_mappings(vec![record(json!({ "id": "m-2" }))]);
        assert!(workflow.editor().is_new());
    }

    #[test]
    fn test_resolve_without_request_is_noop() {
        let mut workflow = workflow_with(vec![json!({ "id": "m-1" })]);
        assert!(!workflow.resolve_pending_open());
        assert!(workflow.editor().is_new());
    }

    #[test]
    fn test_compose_new_clears_everything() {
        let mut workflow = workflow_with(vec![json!({ "id": "m-1", "name": "n" })]);
        workflow.select_id("m-1");
        workflow.compose_new();
        assert_eq!(workflow.editor(), &EditorState::default());
        assert_eq!(workflow.draft_source(), None);
    }

    #[test]
    fn test_prepare_document_merges_name() {
        let mut workflow = MappingWorkflow::new();
        workflow.editor_mut().text = r#"{"name":"old","priority":1}"#.to_string();
        workflow.editor_mut().name = "  new  ".to_string();
        assert_eq!(
            workflow.prepare_document().unwrap(),
            json!({ "name": "new", "priority": 1 })
        );

        workflow.editor_mut().name = "   ".to_string();
        assert_eq!(workflow.prepare_document().unwrap(), json!({ "priority": 1 }));
    }

    #[test]
    fn test_prepare_document_empty_text_is_empty_object() {
        let mut workflow = MappingWorkflow::new();
        workflow.editor_mut().text = "  \n ".to_string();
        assert_eq!(workflow.prepare_document().unwrap(), json!({}));
    }

    #[test]
    fn test_prepare_document_rejects_non_objects() {
        let mut workflow = MappingWorkflow::new();
        workflow.editor_mut().text = "[1, 2]".to_string();
        assert!(matches!(workflow.prepare_document(), Err(WorkflowError::Parse(_))));

        workflow.editor_mut().text = "{ broken".to_string();
        assert!(matches!(workflow.prepare_document(), Err(WorkflowError::Parse(_))));
    }

    #[test]
    fn test_error_messages() {
        let err = WorkflowError::Dispatch {
            op: DispatchOp::Create,
            source: ApiError::Status(500),
        };
        assert_eq!(err.to_string(), "Create failed: HTTP 500");
        assert_eq!(
            WorkflowError::Persist(ApiError::Status(500)).to_string(),
            "Save-to-disk failed: HTTP 500"
        );
        assert_eq!(
            WorkflowError::Transport(ApiError::Status(502)).to_string(),
            "HTTP 502"
        );
        let err = WorkflowError::Reload {
            outcome: SaveOutcome::Created {
                id: Some("m-1".to_string()),
            },
            source: ApiError::Status(502),
        };
        assert_eq!(
            err.to_string(),
            "Saved, but reloading mappings failed: HTTP 502"
        );
    }
}
