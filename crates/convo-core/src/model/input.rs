use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

/// Mensaje entrante (trigger `msg` o resume `msg`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgIn {
    pub uuid: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urn: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
}

impl MsgIn {
    pub fn new(uuid: Uuid, text: impl Into<String>) -> Self {
        Self { uuid,
               urn: None,
               text: text.into(),
               attachments: Vec::new() }
    }
}

/// Último input recibido por la sesión (`@input`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Input {
    Msg { created_on: DateTime<Utc>, msg: MsgIn },
}

impl Input {
    pub fn from_msg(msg: MsgIn, created_on: DateTime<Utc>) -> Self {
        Input::Msg { created_on, msg }
    }

    pub fn text(&self) -> &str {
        match self {
            Input::Msg { msg, .. } => &msg.text,
        }
    }

    pub fn context(&self) -> Value {
        match self {
            Input::Msg { created_on, msg } => json!({
                "type": "msg",
                "uuid": msg.uuid,
                "created_on": created_on,
                "text": msg.text,
                "attachments": msg.attachments,
                "urn": msg.urn,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialStatus {
    Answered,
    NoAnswer,
    Busy,
    Failed,
}

/// Resultado de una llamada saliente (resume `dial`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dial {
    pub status: DialStatus,
    #[serde(default)]
    pub duration: u32,
}

/// Mensaje saliente producido por una acción (`msg_created`, `ivr_created`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgOut {
    pub uuid: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urn: Option<String>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quick_replies: Vec<String>,
}
