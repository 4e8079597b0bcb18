//! Waits declarados en un router y los hints que los acompañan.
use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::FlowType;
use crate::event::EventKind;
use crate::runtime::{ActivatedWait, ExecutionContext, TriggerKind};

/// Pista para el canal sobre el tipo de respuesta esperada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Hint {
    Image,
    Video,
    Audio,
    Location,
    Digits {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        count: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        terminated_by: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeout {
    pub seconds: u32,
    pub category_uuid: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgWait {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Timeout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<Hint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialWait {
    /// Template del número a marcar.
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dial_limit_seconds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_limit_seconds: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Wait {
    Msg(MsgWait),
    Dial(DialWait),
}

impl Wait {
    pub fn type_name(&self) -> &'static str {
        match self {
            Wait::Msg(_) => "msg",
            Wait::Dial(_) => "dial",
        }
    }

    pub fn allowed_flow_types(&self) -> &'static [FlowType] {
        match self {
            Wait::Msg(_) => FlowType::ALL,
            Wait::Dial(_) => &[FlowType::Voice],
        }
    }

    pub fn timeout_category(&self) -> Option<Uuid> {
        match self {
            Wait::Msg(w) => w.timeout.as_ref().map(|t| t.category_uuid),
            Wait::Dial(_) => None,
        }
    }

    /// Instancia el wait para esta visita. `None` significa que no hay que
    /// suspender: el router se evalúa de inmediato.
    pub fn begin(&self, ctx: &mut ExecutionContext<'_>) -> Option<ActivatedWait> {
        match self {
            Wait::Msg(wait) => {
                // un trigger msg ya trae la respuesta para el primer wait del flow
                let started_by_msg = matches!(ctx.session().trigger.kind, TriggerKind::Msg { .. });
                if started_by_msg && ctx.session().runs.len() == 1 && ctx.run().path.len() == 1 {
                    return None;
                }

                let timeout_seconds = wait.timeout.as_ref().map(|t| t.seconds);
                let timeout_on = timeout_seconds.map(|s| ctx.now() + Duration::seconds(i64::from(s)));
                ctx.log_event(EventKind::MsgWait { timeout_seconds,
                                                   hint: wait.hint.clone() });
                Some(ActivatedWait::Msg { timeout_seconds,
                                          timeout_on,
                                          hint: wait.hint.clone() })
            }
            Wait::Dial(wait) => {
                let phone = ctx.evaluate_template(&wait.phone);
                ctx.log_event(EventKind::DialWait { phone: phone.clone(),
                                                    dial_limit_seconds: wait.dial_limit_seconds,
                                                    call_limit_seconds: wait.call_limit_seconds });
                Some(ActivatedWait::Dial { phone,
                                           dial_limit_seconds: wait.dial_limit_seconds,
                                           call_limit_seconds: wait.call_limit_seconds })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_msg_wait_with_timeout_and_hint() {
        let wait: Wait = serde_json::from_value(json!({
            "type": "msg",
            "timeout": {"seconds": 300, "category_uuid": "4f2b8a3e-3a3b-4a0e-9d4c-5b6c7d8e9f00"},
            "hint": {"type": "digits", "count": 4}
        })).unwrap();
        assert_eq!(wait.type_name(), "msg");
        assert_eq!(wait.timeout_category().unwrap().to_string(), "4f2b8a3e-3a3b-4a0e-9d4c-5b6c7d8e9f00");
        match wait {
            Wait::Msg(MsgWait { hint: Some(Hint::Digits { count, .. }), .. }) => assert_eq!(count, Some(4)),
            other => panic!("unexpected wait {other:?}"),
        }
    }

    #[test]
    fn dial_waits_are_voice_only() {
        let wait = Wait::Dial(DialWait { phone: "+12065551212".into(),
                                         dial_limit_seconds: None,
                                         call_limit_seconds: None });
        assert_eq!(wait.allowed_flow_types(), &[FlowType::Voice]);
        assert!(wait.timeout_category().is_none());
    }
}
