//! Tipos de evento y estructura `Event`.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::definition::Hint;
use crate::model::{Contact, Dial, Environment, FieldReference, FlowReference, GroupReference, MsgIn, MsgOut};

/// Tipos de evento soportados por el motor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// Se empujó un nuevo run a la pila de la sesión.
    FlowEntered {
        flow: FlowReference,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_run_uuid: Option<Uuid>,
        #[serde(default)]
        terminal: bool,
    },
    MsgCreated { msg: MsgOut },
    IvrCreated { msg: MsgOut },
    MsgReceived { msg: MsgIn },
    /// El run quedó suspendido esperando un mensaje.
    MsgWait {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout_seconds: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hint: Option<Hint>,
    },
    DialWait {
        phone: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dial_limit_seconds: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        call_limit_seconds: Option<u32>,
    },
    DialEnded { dial: Dial },
    WaitTimedOut,
    RunExpired { run_uuid: Uuid },
    RunResultChanged {
        name: String,
        value: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        category: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        category_localized: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        input: Option<String>,
    },
    ContactNameChanged { name: String },
    ContactLanguageChanged { language: String },
    ContactFieldChanged {
        field: FieldReference,
        #[serde(default)]
        value: Option<String>,
    },
    ContactGroupsChanged {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        groups_added: Vec<GroupReference>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        groups_removed: Vec<GroupReference>,
    },
    ContactRefreshed { contact: Contact },
    EnvironmentRefreshed { environment: Environment },
    /// Error recuperable: la ejecución continúa.
    Error { text: String },
    /// Fallo que termina el run en el que ocurre.
    Failure { text: String },
}

impl EventKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            EventKind::FlowEntered { .. } => "flow_entered",
            EventKind::MsgCreated { .. } => "msg_created",
            EventKind::IvrCreated { .. } => "ivr_created",
            EventKind::MsgReceived { .. } => "msg_received",
            EventKind::MsgWait { .. } => "msg_wait",
            EventKind::DialWait { .. } => "dial_wait",
            EventKind::DialEnded { .. } => "dial_ended",
            EventKind::WaitTimedOut => "wait_timed_out",
            EventKind::RunExpired { .. } => "run_expired",
            EventKind::RunResultChanged { .. } => "run_result_changed",
            EventKind::ContactNameChanged { .. } => "contact_name_changed",
            EventKind::ContactLanguageChanged { .. } => "contact_language_changed",
            EventKind::ContactFieldChanged { .. } => "contact_field_changed",
            EventKind::ContactGroupsChanged { .. } => "contact_groups_changed",
            EventKind::ContactRefreshed { .. } => "contact_refreshed",
            EventKind::EnvironmentRefreshed { .. } => "environment_refreshed",
            EventKind::Error { .. } => "error",
            EventKind::Failure { .. } => "failure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub created_on: DateTime<Utc>,
    /// Paso en el que se generó; `None` para eventos fuera de un nodo
    /// (p.ej. refrescos de contacto aplicados por un resume).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_uuid: Option<Uuid>,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl Event {
    pub fn new(kind: EventKind, created_on: DateTime<Utc>, step_uuid: Option<Uuid>) -> Self {
        Self { created_on, step_uuid, kind }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn created_on(&self) -> DateTime<Utc> {
        self.created_on
    }
}
