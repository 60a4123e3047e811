//! In-memory stand-ins for the records server and the operator.

use crate::api::RecordsApi;
use crate::prompt::Prompter;
use crate::{AdminError, AdminResult};
use async_trait::async_trait;
use bolnica_types::RecordId;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

/// Relation key a record of each collection is referenced by.
const REFERENCE_KEYS: &[(&str, &str)] = &[
    ("bolnice", "bolnica"),
    ("odeljenja", "odeljenje"),
    ("dijagnoze", "dijagnoza"),
];

#[derive(Default)]
struct FakeState {
    collections: HashMap<String, Vec<Value>>,
    next_id: i64,
    calls: Vec<String>,
    fail_next: Option<u16>,
}

/// Behaves like the records server: assigns ids, expands `{id}` references and refuses to
/// delete records that are still referenced.
pub(crate) struct FakeApi {
    state: Mutex<FakeState>,
    held_list: Mutex<Option<oneshot::Receiver<()>>>,
}

impl FakeApi {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(FakeState {
                next_id: 100,
                ..FakeState::default()
            }),
            held_list: Mutex::new(None),
        })
    }

    pub(crate) fn seed(&self, path: &str, records: Vec<Value>) {
        let mut state = self.state.lock().unwrap();
        state.collections.insert(path.to_string(), records);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Make the next request of any kind fail with `status`.
    pub(crate) fn fail_next(&self, status: u16) {
        self.state.lock().unwrap().fail_next = Some(status);
    }

    /// Keep the next list request pending until the returned sender fires or is dropped.
    pub(crate) fn hold_next_list(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.held_list.lock().unwrap() = Some(rx);
        tx
    }

    /// Wait until at least `n` requests have been made.
    pub(crate) async fn wait_for_calls(&self, n: usize) {
        for _ in 0..500 {
            if self.state.lock().unwrap().calls.len() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("expected at least {n} requests");
    }

    fn begin(&self, call: String) -> AdminResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.clone());
        match state.fail_next.take() {
            Some(status) => Err(AdminError::Status {
                method: call.split(' ').next().unwrap_or_default().to_string(),
                url: call,
                status,
                body: String::new(),
            }),
            None => Ok(()),
        }
    }

    /// Replace `{id}` references with the referenced record, as the server does on read.
    fn expand(state: &FakeState, body: &mut Map<String, Value>) {
        for (path, key) in REFERENCE_KEYS {
            let Some(id) = body.get(*key).and_then(|r| r.get("id")).cloned() else {
                continue;
            };
            let found = state
                .collections
                .get(*path)
                .and_then(|records| records.iter().find(|r| r["id"] == id))
                .cloned();
            if let Some(record) = found {
                body.insert(key.to_string(), record);
            }
        }
    }

    fn into_object(body: Value) -> Map<String, Value> {
        match body {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

#[async_trait]
impl RecordsApi for FakeApi {
    async fn list(&self, path: &str) -> AdminResult<Value> {
        self.begin(format!("GET {path}"))?;

        let held = self.held_list.lock().unwrap().take();
        if let Some(rx) = held {
            let _ = rx.await;
        }

        let state = self.state.lock().unwrap();
        let records = state.collections.get(path).cloned().unwrap_or_default();
        Ok(Value::Array(records))
    }

    async fn create(&self, path: &str, body: Value) -> AdminResult<Value> {
        self.begin(format!("POST {path}"))?;

        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;

        let mut record = Self::into_object(body);
        record.insert("id".into(), Value::from(id));
        Self::expand(&state, &mut record);

        let record = Value::Object(record);
        state
            .collections
            .entry(path.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(&self, path: &str, id: RecordId, body: Value) -> AdminResult<Value> {
        self.begin(format!("PUT {path}/{id}"))?;

        let mut state = self.state.lock().unwrap();
        let mut record = Self::into_object(body);
        record.insert("id".into(), Value::from(id.get()));
        Self::expand(&state, &mut record);
        let record = Value::Object(record);

        let slot = state
            .collections
            .get_mut(path)
            .and_then(|records| records.iter_mut().find(|r| r["id"] == id.get()));
        match slot {
            Some(slot) => {
                *slot = record.clone();
                Ok(record)
            }
            None => Err(AdminError::Status {
                method: "PUT".into(),
                url: format!("{path}/{id}"),
                status: 404,
                body: String::new(),
            }),
        }
    }

    async fn delete(&self, path: &str, id: RecordId) -> AdminResult<()> {
        self.begin(format!("DELETE {path}/{id}"))?;

        let mut state = self.state.lock().unwrap();
        let key = REFERENCE_KEYS
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(_, key)| *key);
        if let Some(key) = key {
            let referenced = state
                .collections
                .values()
                .flatten()
                .any(|record| record.get(key).and_then(|r| r.get("id")) == Some(&Value::from(id.get())));
            if referenced {
                return Err(AdminError::Status {
                    method: "DELETE".into(),
                    url: format!("{path}/{id}"),
                    status: 409,
                    body: "record is referenced".into(),
                });
            }
        }

        if let Some(records) = state.collections.get_mut(path) {
            records.retain(|r| r["id"] != id.get());
        }
        Ok(())
    }
}

/// Answers every confirmation the same way and records what was asked and shown.
pub(crate) struct RecordingPrompter {
    answer: bool,
    confirmations: Mutex<Vec<String>>,
    alerts: Mutex<Vec<String>>,
}

impl RecordingPrompter {
    pub(crate) fn answering(answer: bool) -> Arc<Self> {
        Arc::new(Self {
            answer,
            confirmations: Mutex::new(Vec::new()),
            alerts: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn confirmations(&self) -> Vec<String> {
        self.confirmations.lock().unwrap().clone()
    }

    pub(crate) fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prompter for RecordingPrompter {
    async fn confirm(&self, message: &str) -> bool {
        self.confirmations.lock().unwrap().push(message.to_string());
        self.answer
    }

    async fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}
