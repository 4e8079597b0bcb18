//! Triggers: el evento externo que origina una sesión.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::model::{Contact, Environment, FlowReference, MsgIn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerKind {
    Manual,
    /// Mensaje entrante; pasa a ser el input inicial de la sesión.
    Msg { msg: MsgIn },
    /// Disparado desde otro flow; `run_summary` se expone como `@parent`.
    FlowAction { run_summary: Value },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(flatten)]
    pub kind: TriggerKind,
    pub flow: FlowReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    pub triggered_on: DateTime<Utc>,
}

impl Trigger {
    fn with_kind(kind: TriggerKind, flow: FlowReference, contact: Option<Contact>, triggered_on: DateTime<Utc>) -> Self {
        Self { kind,
               flow,
               contact,
               environment: None,
               params: None,
               triggered_on }
    }

    pub fn manual(flow: FlowReference, contact: Option<Contact>, triggered_on: DateTime<Utc>) -> Self {
        Self::with_kind(TriggerKind::Manual, flow, contact, triggered_on)
    }

    pub fn msg(flow: FlowReference, contact: Option<Contact>, msg: MsgIn, triggered_on: DateTime<Utc>) -> Self {
        Self::with_kind(TriggerKind::Msg { msg }, flow, contact, triggered_on)
    }

    pub fn flow_action(flow: FlowReference,
                       contact: Option<Contact>,
                       run_summary: Value,
                       triggered_on: DateTime<Utc>)
                       -> Self {
        Self::with_kind(TriggerKind::FlowAction { run_summary }, flow, contact, triggered_on)
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind {
            TriggerKind::Manual => "manual",
            TriggerKind::Msg { .. } => "msg",
            TriggerKind::FlowAction { .. } => "flow_action",
        }
    }

    /// Resumen del run que disparó la sesión, si lo hay.
    pub fn run_summary(&self) -> Option<&Value> {
        match &self.kind {
            TriggerKind::FlowAction { run_summary } => Some(run_summary),
            _ => None,
        }
    }

    pub fn context(&self) -> Value {
        json!({
            "type": self.type_name(),
            "flow": self.flow,
            "params": self.params.clone().unwrap_or(Value::Null),
            "triggered_on": self.triggered_on,
        })
    }
}
