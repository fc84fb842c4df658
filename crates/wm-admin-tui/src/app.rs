//! Application state and logic for the TUI

use crate::api::{AdminApi, ApiClient, ApiError};
use crate::components::{EditorAction, JsonEditor, LineInput};
use crate::config::Config;
use crate::entry::LogEntry;
use crate::event::ctrl_key;
use crate::identity::event_key;
use crate::log_view::LogView;
use crate::synth::synthesize;
use crate::theme::Theme;
use crate::workflow::{MappingWorkflow, SaveOutcome, WorkflowError};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// How long a status message stays visible
const STATUS_TTL: Duration = Duration::from_secs(5);

/// Top-level tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Logs,
    Mappings,
}

/// Which part of the Mappings tab receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Name,
    Editor,
}

/// Overlay (modal) state
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    None,
    Help,
    Confirm {
        message: String,
        action: PendingAction,
    },
    Error {
        message: String,
    },
}

/// Actions that need confirmation
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    DeleteMapping { id: String },
    ClearJournal,
}

/// Status message level
#[derive(Debug, Clone, PartialEq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Main application state
pub struct App {
    // Navigation
    pub tab: Tab,
    pub overlay: Overlay,
    pub focus: Focus,

    // Data
    pub logs: LogView,
    pub workflow: MappingWorkflow,

    // UI State
    pub log_list_state: ListState,
    pub mapping_list_state: ListState,
    pub editor: JsonEditor,
    pub name_input: LineInput,
    pub search_active: bool,
    pub status_message: Option<(String, StatusLevel, Instant)>,
    pub help_scroll: u16,

    // Connection
    api: Box<dyn AdminApi>,
    pub endpoint: String,
    pub theme: Theme,

    // Runtime
    pub should_quit: bool,
    pub is_loading: bool,
    pub is_connected: bool,
    pub last_refresh: Instant,
    pub refresh_interval: Option<Duration>,
}

impl App {
    /// Create an App talking HTTP to the configured admin server
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = ApiClient::new(&config.admin_url, &config.api_prefix, config.timeout)?;
        let endpoint = client.base_url().to_string();
        Ok(Self::with_api(
            Box::new(client),
            endpoint,
            config.refresh_interval,
        ))
    }

    /// Create an App over any admin API implementation
    pub fn with_api(
        api: Box<dyn AdminApi>,
        endpoint: impl Into<String>,
        refresh_interval: Option<Duration>,
    ) -> Self {
        let theme = Theme::default();
        let mut editor = JsonEditor::default();
        editor.set_theme(theme.clone());

        Self {
            tab: Tab::Logs,
            overlay: Overlay::None,
            focus: Focus::List,

            logs: LogView::new(),
            workflow: MappingWorkflow::new(),

            log_list_state: ListState::default(),
            mapping_list_state: ListState::default(),
            editor,
            name_input: LineInput::default(),
            search_active: false,
            status_message: None,
            help_scroll: 0,

            api,
            endpoint: endpoint.into(),
            theme,

            should_quit: false,
            is_loading: false,
            is_connected: false,
            last_refresh: Instant::now(),
            refresh_interval,
        }
    }

    /// Load both collections
    pub async fn refresh_all(&mut self) {
        self.load_logs().await;
        self.load_mappings().await;
        self.last_refresh = Instant::now();
    }

    /// Reload the collection behind the active tab
    pub async fn refresh(&mut self) {
        match self.tab {
            Tab::Logs => self.load_logs().await,
            Tab::Mappings => self.load_mappings().await,
        }
        self.last_refresh = Instant::now();
    }

    /// Whether the periodic refresh should run now
    pub fn auto_refresh_due(&self) -> bool {
        match self.refresh_interval {
            Some(interval) => !self.is_editing() && self.last_refresh.elapsed() >= interval,
            None => false,
        }
    }

    /// Periodic housekeeping
    pub async fn on_tick(&mut self) {
        self.clear_expired_status();
        if self.auto_refresh_due() {
            self.refresh().await;
        }
    }

    /// True while keys go to the mapping name or the editor
    pub fn is_editing(&self) -> bool {
        self.tab == Tab::Mappings && self.focus != Focus::List
    }

    async fn load_logs(&mut self) {
        self.is_loading = true;
        match self.logs.load(self.api.as_ref()).await {
            Ok(_) => {
                self.is_connected = true;
                self.sync_log_selection();
            }
            Err(e) => {
                self.is_connected = false;
                self.set_status(format!("Failed to load requests: {}", e), StatusLevel::Error);
            }
        }
        self.is_loading = false;
    }

    async fn load_mappings(&mut self) {
        self.is_loading = true;
        let was_pending = self.workflow.pending_open().is_some();
        match self.workflow.load(self.api.as_ref()).await {
            Ok(_) => {
                self.is_connected = true;
                if was_pending && self.workflow.pending_open().is_none() {
                    self.opened_mapping();
                }
                self.sync_mapping_selection();
            }
            Err(e) => {
                self.is_connected = false;
                self.set_status(format!("Failed to load mappings: {}", e), StatusLevel::Error);
            }
        }
        self.is_loading = false;
    }

    /// Set a status message
    pub fn set_status(&mut self, message: String, level: StatusLevel) {
        self.status_message = Some((message, level, Instant::now()));
    }

    /// Clear status if expired
    pub fn clear_expired_status(&mut self) {
        if let Some((_, _, time)) = &self.status_message {
            if time.elapsed() > STATUS_TTL {
                self.status_message = None;
            }
        }
    }

    pub async fn switch_tab(&mut self, tab: Tab) {
        if self.tab == tab {
            return;
        }
        self.tab = tab;
        self.search_active = false;
        self.set_focus(Focus::List);
        self.refresh().await;
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.editor.set_focused(focus == Focus::Editor);
        if focus == Focus::Name {
            self.name_input.move_to_end(&self.workflow.editor().name);
        }
    }

    // ----- Logs -----

    /// Entries after the filter, in display order
    pub fn visible_logs(&self) -> Vec<&LogEntry> {
        self.logs.visible()
    }

    /// Keep the list cursor on the selected entry, falling back to the first
    /// visible one
    fn sync_log_selection(&mut self) {
        let (index, key) = {
            let visible = self.logs.visible();
            let index = self
                .logs
                .selected_visible_index()
                .or_else(|| (!visible.is_empty()).then_some(0));
            let key = index.and_then(|i| visible.get(i)).map(|e| event_key(e));
            (index, key)
        };
        self.logs.select(key);
        self.log_list_state.select(index);
    }

    fn move_log_selection(&mut self, delta: isize) {
        let key = {
            let visible = self.logs.visible();
            if visible.is_empty() {
                return;
            }
            let current = self.logs.selected_visible_index().unwrap_or(0);
            let next = current.saturating_add_signed(delta).min(visible.len() - 1);
            event_key(visible[next])
        };
        self.logs.select(Some(key));
        self.sync_log_selection();
    }

    /// Turn the selected entry into a draft and open it in the editor
    pub fn synthesize_selected(&mut self) {
        let Some(entry) = self.logs.selected() else {
            self.set_status("No request selected".to_string(), StatusLevel::Warning);
            return;
        };

        let draft = synthesize(entry);
        let label = draft.source_label.clone().unwrap_or_default();
        info!("Synthesized draft from {}", label);
        self.workflow.adopt_draft(draft);
        self.sync_editor();

        self.tab = Tab::Mappings;
        self.search_active = false;
        self.set_focus(Focus::Editor);
        self.set_status(format!("Draft created from {}", label), StatusLevel::Success);
    }

    /// Jump to the mapping that served the selected entry
    pub async fn open_matched_mapping(&mut self) {
        let Some(id) = self.logs.selected().and_then(|e| e.stub_mapping_id.clone()) else {
            self.set_status(
                "Selected request did not match a mapping".to_string(),
                StatusLevel::Warning,
            );
            return;
        };

        self.tab = Tab::Mappings;
        self.search_active = false;
        self.set_focus(Focus::List);

        if self.workflow.request_open(id.clone()) {
            self.opened_mapping();
            return;
        }

        debug!("Mapping {} not loaded, reloading", id);
        self.load_mappings().await;
        self.last_refresh = Instant::now();
        if self.workflow.pending_open().is_some() {
            self.set_status(
                format!("Mapping {} not found yet; it will open once loaded", id),
                StatusLevel::Warning,
            );
        }
    }

    pub fn confirm_clear_journal(&mut self) {
        self.overlay = Overlay::Confirm {
            message: "Clear all captured requests?".to_string(),
            action: PendingAction::ClearJournal,
        };
    }

    pub async fn clear_journal(&mut self) {
        self.is_loading = true;
        match self.logs.clear_journal(self.api.as_ref()).await {
            Ok(()) => {
                self.sync_log_selection();
                self.set_status("Request journal cleared".to_string(), StatusLevel::Success);
            }
            Err(e) => self.set_status(e.to_string(), StatusLevel::Error),
        }
        self.is_loading = false;
    }

    // ----- Mappings -----

    /// Mirror the workflow's editor text into the editor widget
    fn sync_editor(&mut self) {
        let text = self.workflow.editor().text.clone();
        self.editor.set_content(&text);
        self.name_input.move_to_end(&self.workflow.editor().name);
    }

    /// Mirror the editor widget's text back into the workflow
    fn push_editor_text(&mut self) {
        self.workflow.editor_mut().text = self.editor.content();
    }

    /// Called once an open request has been resolved
    fn opened_mapping(&mut self) {
        self.sync_editor();
        self.sync_mapping_selection();
        let id = self.workflow.editor().editing_id().unwrap_or_default();
        self.set_status(format!("Opened mapping {}", id), StatusLevel::Info);
    }

    /// Point the list cursor at the mapping being edited, else keep it in range
    fn sync_mapping_selection(&mut self) {
        let count = self.workflow.mappings().len();
        let editing = self
            .workflow
            .editor()
            .editing_id()
            .and_then(|id| self.workflow.mappings().iter().position(|m| m.id.as_deref() == Some(id)));

        let index = match (editing, self.mapping_list_state.selected()) {
            (Some(i), _) => Some(i),
            _ if count == 0 => None,
            (None, Some(i)) => Some(i.min(count - 1)),
            (None, None) => Some(0),
        };
        self.mapping_list_state.select(index);
    }

    fn move_mapping_selection(&mut self, delta: isize) {
        let count = self.workflow.mappings().len();
        if count == 0 {
            return;
        }
        let current = self.mapping_list_state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(count - 1);
        self.mapping_list_state.select(Some(next));
    }

    /// Load the highlighted mapping into the editor
    pub fn select_highlighted_mapping(&mut self) {
        if let Some(index) = self.mapping_list_state.selected() {
            if self.workflow.select_index(index) {
                self.sync_editor();
            }
        }
    }

    pub fn compose_new(&mut self) {
        self.workflow.compose_new();
        self.sync_editor();
        self.set_focus(Focus::Editor);
        self.set_status("New mapping".to_string(), StatusLevel::Info);
    }

    pub fn confirm_delete_mapping(&mut self) {
        let Some(mapping) = self
            .mapping_list_state
            .selected()
            .and_then(|i| self.workflow.mappings().get(i))
        else {
            return;
        };
        let Some(id) = mapping.id.clone() else {
            self.set_status("Mapping has no id".to_string(), StatusLevel::Warning);
            return;
        };

        self.overlay = Overlay::Confirm {
            message: format!("Delete mapping {}?", mapping.label()),
            action: PendingAction::DeleteMapping { id },
        };
    }

    pub async fn delete_mapping(&mut self, id: &str) {
        self.is_loading = true;
        let result = self.workflow.delete(self.api.as_ref(), id).await;
        self.is_loading = false;

        match result {
            Ok(()) => {
                self.sync_mapping_selection();
                self.set_status(format!("Deleted mapping {}", id), StatusLevel::Success);
            }
            Err(e) => self.report_workflow_error(e),
        }
    }

    /// Send the editor content: create or update, persist, reload
    pub async fn save_mapping(&mut self) {
        self.push_editor_text();
        self.is_loading = true;
        let result = self.workflow.save(self.api.as_ref()).await;
        self.is_loading = false;

        match result {
            Ok(outcome) => {
                self.sync_editor();
                self.sync_mapping_selection();
                let message = match &outcome {
                    SaveOutcome::Created { id: Some(id) } => format!("Created mapping {}", id),
                    SaveOutcome::Created { id: None } => "Mapping created".to_string(),
                    SaveOutcome::Updated { id } => format!("Updated mapping {}", id),
                };
                self.set_status(message, StatusLevel::Success);
            }
            Err(e) => self.report_workflow_error(e),
        }
    }

    /// Persist failures get a popup: the server now differs from disk
    fn report_workflow_error(&mut self, err: WorkflowError) {
        let message = err.to_string();
        match err {
            WorkflowError::Persist(_) => {
                self.overlay = Overlay::Error {
                    message: message.clone(),
                };
            }
            WorkflowError::Reload { .. } => {
                self.is_connected = false;
                self.set_status(message, StatusLevel::Warning);
                return;
            }
            _ => {}
        }
        self.set_status(message, StatusLevel::Error);
    }

    pub fn format_editor(&mut self) {
        match self.editor.format() {
            Ok(()) => {
                self.push_editor_text();
                self.set_status("Formatted".to_string(), StatusLevel::Info);
            }
            Err(e) => self.set_status(format!("Cannot format: {}", e), StatusLevel::Warning),
        }
    }

    // ----- Clipboard -----

    pub fn copy_to_clipboard(&mut self, content: &str) {
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(content.to_string()) {
                    self.set_status(format!("Failed to copy: {}", e), StatusLevel::Error);
                } else {
                    self.set_status("Copied to clipboard".to_string(), StatusLevel::Success);
                }
            }
            Err(e) => {
                self.set_status(
                    format!("Clipboard not available: {}", e),
                    StatusLevel::Error,
                );
            }
        }
    }

    fn paste_from_clipboard(&self) -> Option<String> {
        arboard::Clipboard::new()
            .ok()
            .and_then(|mut cb| cb.get_text().ok())
    }

    // ----- Input -----

    /// Execute a pending action
    pub async fn execute_pending_action(&mut self) {
        let overlay = std::mem::replace(&mut self.overlay, Overlay::None);
        if let Overlay::Confirm { action, .. } = overlay {
            match action {
                PendingAction::DeleteMapping { id } => self.delete_mapping(&id).await,
                PendingAction::ClearJournal => self.clear_journal().await,
            }
        }
    }

    pub async fn handle_key_event(&mut self, key: KeyEvent) {
        // Handle overlays first
        match self.overlay {
            Overlay::Help => {
                let max = crate::ui::help::line_count();
                match key.code {
                    KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                        self.overlay = Overlay::None;
                        self.help_scroll = 0;
                    }
                    KeyCode::Up | KeyCode::Char('k') => {
                        self.help_scroll = self.help_scroll.saturating_sub(1);
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        self.help_scroll = (self.help_scroll + 1).min(max);
                    }
                    KeyCode::PageUp => self.help_scroll = self.help_scroll.saturating_sub(10),
                    KeyCode::PageDown => self.help_scroll = (self.help_scroll + 10).min(max),
                    _ => {}
                }
                return;
            }
            Overlay::Confirm { .. } => {
                match key.code {
                    KeyCode::Enter | KeyCode::Char('y') => self.execute_pending_action().await,
                    KeyCode::Esc | KeyCode::Char('n') => self.overlay = Overlay::None,
                    _ => {}
                }
                return;
            }
            Overlay::Error { .. } => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                    self.overlay = Overlay::None;
                }
                return;
            }
            Overlay::None => {}
        }

        if self.search_active {
            self.handle_search_input(key);
            return;
        }

        if self.is_editing() {
            self.handle_form_event(key).await;
            return;
        }

        // Global keys
        if ctrl_key(&key, 'c') {
            self.should_quit = true;
            return;
        }
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('?') => {
                self.overlay = Overlay::Help;
                self.help_scroll = 0;
                return;
            }
            KeyCode::Char('1') => {
                self.switch_tab(Tab::Logs).await;
                return;
            }
            KeyCode::Char('2') => {
                self.switch_tab(Tab::Mappings).await;
                return;
            }
            KeyCode::Char('r') => {
                self.refresh().await;
                return;
            }
            _ => {}
        }

        match self.tab {
            Tab::Logs => self.handle_logs_event(key).await,
            Tab::Mappings => self.handle_mapping_list_event(key).await,
        }
    }

    async fn handle_logs_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_log_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_log_selection(-1),
            KeyCode::PageDown => self.move_log_selection(10),
            KeyCode::PageUp => self.move_log_selection(-10),
            KeyCode::Char('/') => self.search_active = true,
            KeyCode::Esc => {
                self.logs.query.clear();
                self.sync_log_selection();
            }
            KeyCode::Char('m') => self.synthesize_selected(),
            KeyCode::Char('o') => self.open_matched_mapping().await,
            KeyCode::Char('c') => self.confirm_clear_journal(),
            KeyCode::Char('y') => {
                if let Some(text) = self.logs.selected().map(LogEntry::pretty) {
                    self.copy_to_clipboard(&text);
                }
            }
            KeyCode::Tab => self.switch_tab(Tab::Mappings).await,
            _ => {}
        }
    }

    async fn handle_mapping_list_event(&mut self, key: KeyEvent) {
        if ctrl_key(&key, 's') {
            self.save_mapping().await;
            return;
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_mapping_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_mapping_selection(-1),
            KeyCode::Enter => self.select_highlighted_mapping(),
            KeyCode::Char('n') => self.compose_new(),
            KeyCode::Char('d') => self.confirm_delete_mapping(),
            KeyCode::Char('e') | KeyCode::Tab => self.set_focus(Focus::Editor),
            KeyCode::Char('N') => self.set_focus(Focus::Name),
            KeyCode::BackTab => self.switch_tab(Tab::Logs).await,
            _ => {}
        }
    }

    /// Keys while the name field or the editor has focus
    async fn handle_form_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') => {
                    self.save_mapping().await;
                    return;
                }
                KeyCode::Char('f') => {
                    self.format_editor();
                    return;
                }
                _ => {}
            }
        }

        match (self.focus, key.code) {
            (_, KeyCode::Esc) => self.set_focus(Focus::List),
            (Focus::Name, KeyCode::Tab | KeyCode::Enter) => self.set_focus(Focus::Editor),
            (Focus::Name, KeyCode::BackTab) => self.set_focus(Focus::List),
            (Focus::Editor, KeyCode::BackTab) => self.set_focus(Focus::Name),
            (Focus::Name, _) => {
                if ctrl_key(&key, 'v') {
                    if let Some(text) = self.paste_from_clipboard() {
                        self.name_input
                            .insert_str(&mut self.workflow.editor_mut().name, &text);
                    }
                    return;
                }
                self.name_input
                    .handle_key(&mut self.workflow.editor_mut().name, key);
            }
            (Focus::Editor, _) => {
                match self.editor.handle_key(key) {
                    Some(EditorAction::Copy(text)) => self.copy_to_clipboard(&text),
                    Some(EditorAction::PasteRequest) => {
                        if let Some(text) = self.paste_from_clipboard() {
                            self.editor.paste(&text);
                        }
                    }
                    None => {}
                }
                self.push_editor_text();
            }
            (Focus::List, _) => {}
        }
    }

    fn handle_search_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.search_active = false;
                self.logs.query.clear();
            }
            KeyCode::Enter => self.search_active = false,
            KeyCode::Backspace => {
                self.logs.query.pop();
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.logs.query.clear();
            }
            KeyCode::Char('v') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(text) = self.paste_from_clipboard() {
                    self.logs.query.push_str(text.trim());
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.logs.query.push(c);
            }
            _ => {}
        }
        self.sync_log_selection();
    }

    /// Bracketed paste goes to whatever has focus
    pub fn handle_paste(&mut self, text: &str) {
        if self.overlay != Overlay::None {
            return;
        }
        if self.search_active {
            self.logs.query.push_str(text.trim());
            self.sync_log_selection();
            return;
        }
        match (self.tab, self.focus) {
            (Tab::Mappings, Focus::Name) => {
                self.name_input
                    .insert_str(&mut self.workflow.editor_mut().name, text);
            }
            (Tab::Mappings, Focus::Editor) => {
                self.editor.paste(text);
                self.push_editor_text();
            }
            _ => {}
        }
    }
}
