//! In-memory admin API shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use wm_admin_tui::{AdminApi, ApiError};

/// Admin operations, used to inject failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ListRequests,
    ResetRequests,
    ListMappings,
    Create,
    Update,
    Delete,
    Persist,
}

/// A recorded call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListRequests,
    ResetRequests,
    ListMappings,
    Create(Value),
    Update(String, Value),
    Delete(String),
    Persist,
}

#[derive(Default)]
struct State {
    requests: Vec<Value>,
    mappings: Vec<Value>,
    calls: Vec<Call>,
    failures: HashMap<Op, u16>,
    next_id: u32,
    silent_create: bool,
    numeric_ids: bool,
}

/// Cloneable handle: the test keeps one, the code under test gets another
#[derive(Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<State>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn with_requests(self, requests: Vec<Value>) -> Self {
        self.state().requests = requests;
        self
    }

    pub fn with_mappings(self, mappings: Vec<Value>) -> Self {
        self.state().mappings = mappings;
        self
    }

    pub fn add_mapping(&self, mapping: Value) {
        self.state().mappings.push(mapping);
    }

    /// Make `op` answer with `status` from now on
    pub fn fail(&self, op: Op, status: u16) {
        self.state().failures.insert(op, status);
    }

    /// Answer creates with an empty body
    pub fn silent_create(&self) {
        self.state().silent_create = true;
    }

    /// Assign ids as JSON numbers instead of strings
    pub fn numeric_ids(&self) {
        self.state().numeric_ids = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    pub fn mappings(&self) -> Vec<Value> {
        self.state().mappings.clone()
    }

    fn record(&self, call: Call, op: Op) -> Result<MutexGuard<'_, State>, ApiError> {
        let mut state = self.state();
        state.calls.push(call);
        match state.failures.get(&op) {
            Some(status) => Err(ApiError::Status(*status)),
            None => Ok(state),
        }
    }
}

#[async_trait]
impl AdminApi for FakeApi {
    async fn list_requests(&self) -> Result<Vec<Value>, ApiError> {
        let state = self.record(Call::ListRequests, Op::ListRequests)?;
        Ok(state.requests.clone())
    }

    async fn reset_requests(&self) -> Result<(), ApiError> {
        let mut state = self.record(Call::ResetRequests, Op::ResetRequests)?;
        state.requests.clear();
        Ok(())
    }

    async fn list_mappings(&self) -> Result<Vec<Value>, ApiError> {
        let state = self.record(Call::ListMappings, Op::ListMappings)?;
        Ok(state.mappings.clone())
    }

    async fn create_mapping(&self, mapping: &Value) -> Result<Value, ApiError> {
        let mut state = self.record(Call::Create(mapping.clone()), Op::Create)?;
        state.next_id += 1;
        let mut stored = mapping.clone();
        stored["id"] = if state.numeric_ids {
            json!(state.next_id)
        } else {
            json!(format!("m-{}", state.next_id))
        };
        state.mappings.push(stored.clone());
        if state.silent_create {
            Ok(Value::Null)
        } else {
            Ok(stored)
        }
    }

    async fn update_mapping(&self, id: &str, mapping: &Value) -> Result<Value, ApiError> {
        let mut state = self.record(Call::Update(id.to_string(), mapping.clone()), Op::Update)?;
        let mut stored = mapping.clone();
        stored["id"] = json!(id);
        match state.mappings.iter_mut().find(|m| m["id"] == json!(id)) {
            Some(slot) => *slot = stored.clone(),
            None => return Err(ApiError::Status(404)),
        }
        Ok(stored)
    }

    async fn delete_mapping(&self, id: &str) -> Result<(), ApiError> {
        let mut state = self.record(Call::Delete(id.to_string()), Op::Delete)?;
        let before = state.mappings.len();
        state.mappings.retain(|m| m["id"] != json!(id));
        if state.mappings.len() == before {
            return Err(ApiError::Status(404));
        }
        Ok(())
    }

    async fn persist_mappings(&self) -> Result<(), ApiError> {
        self.record(Call::Persist, Op::Persist)?;
        Ok(())
    }
}

/// A journal entry as the mock server reports it
pub fn journal_entry(id: &str, method: &str, url: &str, mapping_id: Option<&str>) -> Value {
    let mut entry = json!({
        "id": id,
        "request": {
            "method": method,
            "url": url,
            "loggedDate": 1_700_000_000_000_u64
        },
        "responseDefinition": {
            "status": 200,
            "jsonBody": {"ok": true}
        }
    });
    if let Some(mapping_id) = mapping_id {
        entry["stubMapping"] = json!({"id": mapping_id});
    }
    entry
}

/// A stored mapping
pub fn mapping(id: &str, name: &str, method: &str, url: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "request": {"method": method, "url": url},
        "response": {"status": 200}
    })
}
