//! `Run`: ejecución de un flow dentro de la pila de la sesión.
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::{RunStatus, Step};
use crate::event::Event;
use crate::model::FlowReference;
use crate::utils::snakify;

/// Índice de un run dentro de `Session::runs`. Es la única forma de
/// referenciar al padre: la sesión es dueña de todos los runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunIndex(pub(crate) usize);

impl RunIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

/// Resultado guardado por un router (o por `set_run_result`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category_localized: String,
    pub node_uuid: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    pub created_on: DateTime<Utc>,
}

impl RunResult {
    fn context(&self) -> Value {
        json!({
            "name": self.name,
            "value": self.value,
            "category": self.category,
            "category_localized": if self.category_localized.is_empty() { &self.category } else { &self.category_localized },
            "input": self.input,
            "node_uuid": self.node_uuid,
            "created_on": self.created_on,
        })
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub uuid: Uuid,
    pub flow: FlowReference,
    pub status: RunStatus,
    #[serde(default)]
    pub path: Vec<Step>,
    #[serde(default)]
    pub results: BTreeMap<String, RunResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<Event>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_uuid: Option<Uuid>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub terminal: bool,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exited_on: Option<DateTime<Utc>>,
    /// Se reconstruye desde `parent_uuid` al leer la sesión.
    #[serde(skip)]
    pub(crate) parent: Option<RunIndex>,
}

impl Run {
    pub(crate) fn new(uuid: Uuid,
                      flow: FlowReference,
                      parent: Option<(RunIndex, Uuid)>,
                      terminal: bool,
                      now: DateTime<Utc>)
                      -> Self {
        Self { uuid,
               flow,
               status: RunStatus::Active,
               path: Vec::new(),
               results: BTreeMap::new(),
               events: Vec::new(),
               parent_uuid: parent.map(|(_, u)| u),
               terminal,
               created_on: now,
               modified_on: now,
               expires_on: None,
               exited_on: None,
               parent: parent.map(|(i, _)| i) }
    }

    pub fn parent(&self) -> Option<RunIndex> {
        self.parent
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.path.last()
    }

    pub fn current_node_uuid(&self) -> Option<Uuid> {
        self.path.last().map(|s| s.node_uuid)
    }

    pub fn result(&self, name: &str) -> Option<&RunResult> {
        self.results.get(&snakify(name))
    }

    pub(crate) fn create_step(&mut self, uuid: Uuid, node_uuid: Uuid, now: DateTime<Utc>) -> Uuid {
        self.path.push(Step::new(uuid, node_uuid, now));
        self.modified_on = now;
        uuid
    }

    /// Marca la salida del paso actual. No hace nada si ya se abandonó.
    pub(crate) fn leave_step(&mut self, exit_uuid: Uuid, now: DateTime<Utc>) {
        if let Some(step) = self.path.last_mut() {
            if step.exit_uuid.is_none() {
                step.exit_uuid = Some(exit_uuid);
                self.modified_on = now;
            }
        }
    }

    pub(crate) fn save_result(&mut self, result: RunResult) {
        self.modified_on = result.created_on;
        self.results.insert(snakify(&result.name), result);
    }

    pub(crate) fn set_status(&mut self, status: RunStatus, now: DateTime<Utc>) {
        self.status = status;
        self.modified_on = now;
    }

    pub(crate) fn exit(&mut self, status: RunStatus, now: DateTime<Utc>) {
        self.set_status(status, now);
        self.exited_on = Some(now);
    }

    pub(crate) fn log_event(&mut self, event: Event) {
        self.modified_on = event.created_on;
        self.events.push(event);
    }

    pub fn results_context(&self) -> Value {
        let map: Map<String, Value> = self.results
                                          .iter()
                                          .map(|(k, r)| (k.clone(), r.context()))
                                          .collect();
        Value::Object(map)
    }

    /// Representación expuesta a templates (`@run`, `@parent`, `@child`).
    pub fn context(&self) -> Value {
        json!({
            "uuid": self.uuid,
            "flow": self.flow,
            "status": self.status.as_str(),
            "results": self.results_context(),
            "created_on": self.created_on,
            "exited_on": self.exited_on,
        })
    }
}
