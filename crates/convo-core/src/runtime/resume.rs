//! Resumes: input externo que continúa una sesión en espera.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{ActivatedWait, ExecutionContext};
use crate::errors::FlowError;
use crate::event::EventKind;
use crate::model::{Contact, Dial, Environment, Input, MsgIn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResumeKind {
    Msg { msg: MsgIn },
    WaitTimeout,
    RunExpiration,
    Dial { dial: Dial },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    #[serde(flatten)]
    pub kind: ResumeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    pub resumed_on: DateTime<Utc>,
}

impl Resume {
    fn with_kind(kind: ResumeKind, resumed_on: DateTime<Utc>) -> Self {
        Self { kind,
               contact: None,
               environment: None,
               resumed_on }
    }

    pub fn msg(msg: MsgIn, resumed_on: DateTime<Utc>) -> Self {
        Self::with_kind(ResumeKind::Msg { msg }, resumed_on)
    }

    pub fn wait_timeout(resumed_on: DateTime<Utc>) -> Self {
        Self::with_kind(ResumeKind::WaitTimeout, resumed_on)
    }

    pub fn run_expiration(resumed_on: DateTime<Utc>) -> Self {
        Self::with_kind(ResumeKind::RunExpiration, resumed_on)
    }

    pub fn dial(dial: Dial, resumed_on: DateTime<Utc>) -> Self {
        Self::with_kind(ResumeKind::Dial { dial }, resumed_on)
    }

    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contact = Some(contact);
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind {
            ResumeKind::Msg { .. } => "msg",
            ResumeKind::WaitTimeout => "wait_timeout",
            ResumeKind::RunExpiration => "run_expiration",
            ResumeKind::Dial { .. } => "dial",
        }
    }

    /// Un timeout rutea a la categoría del timeout sin evaluar casos.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ResumeKind::WaitTimeout)
    }

    pub fn is_expiration(&self) -> bool {
        matches!(self.kind, ResumeKind::RunExpiration)
    }

    /// Comprueba que el wait activo acepte este tipo de resume.
    pub fn check_accepted_by(&self, wait: &ActivatedWait) -> Result<(), FlowError> {
        let accepted = match (&self.kind, wait) {
            (ResumeKind::RunExpiration, _) => true,
            (ResumeKind::Msg { .. }, ActivatedWait::Msg { .. }) => true,
            (ResumeKind::WaitTimeout, w @ ActivatedWait::Msg { .. }) => w.has_timeout(),
            (ResumeKind::Dial { .. }, ActivatedWait::Dial { .. }) => true,
            _ => false,
        };
        if accepted {
            Ok(())
        } else {
            Err(FlowError::ResumeNotAccepted { resume: self.type_name().to_string(),
                                               wait: wait.type_name().to_string() })
        }
    }

    /// Aplica el resume sobre la sesión antes de continuar en el router del
    /// nodo en espera.
    pub fn apply(&self, ctx: &mut ExecutionContext<'_>) {
        if let Some(contact) = &self.contact {
            ctx.session_mut().contact = Some(contact.clone());
            ctx.log_event(EventKind::ContactRefreshed { contact: contact.clone() });
        }
        if let Some(environment) = &self.environment {
            ctx.session_mut().environment = environment.clone();
            ctx.log_event(EventKind::EnvironmentRefreshed { environment: environment.clone() });
        }

        match &self.kind {
            ResumeKind::Msg { msg } => {
                ctx.session_mut().input = Some(Input::from_msg(msg.clone(), self.resumed_on));
                ctx.log_event(EventKind::MsgReceived { msg: msg.clone() });
            }
            ResumeKind::WaitTimeout => ctx.log_event(EventKind::WaitTimedOut),
            ResumeKind::Dial { dial } => ctx.log_event(EventKind::DialEnded { dial: dial.clone() }),
            ResumeKind::RunExpiration => {}
        }
    }

    pub fn context(&self) -> Value {
        let mut ctx = json!({
            "type": self.type_name(),
            "resumed_on": self.resumed_on,
        });
        if let ResumeKind::Dial { dial } = &self.kind {
            ctx["dial"] = json!(dial);
        }
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DialStatus;
    use rstest::rstest;
    use uuid::Uuid;

    fn msg_wait(timeout: bool) -> ActivatedWait {
        ActivatedWait::Msg { timeout_seconds: timeout.then_some(60),
                             timeout_on: None,
                             hint: None }
    }

    fn dial_wait() -> ActivatedWait {
        ActivatedWait::Dial { phone: "+1".into(),
                              dial_limit_seconds: None,
                              call_limit_seconds: None }
    }

    #[rstest]
    #[case::msg_by_msg(Resume::msg(MsgIn::new(Uuid::nil(), "hi"), Utc::now()), msg_wait(false), true)]
    #[case::msg_by_dial(Resume::msg(MsgIn::new(Uuid::nil(), "hi"), Utc::now()), dial_wait(), false)]
    #[case::timeout_without_timeout(Resume::wait_timeout(Utc::now()), msg_wait(false), false)]
    #[case::timeout_with_timeout(Resume::wait_timeout(Utc::now()), msg_wait(true), true)]
    #[case::expiration_by_dial(Resume::run_expiration(Utc::now()), dial_wait(), true)]
    #[case::dial_by_msg(Resume::dial(Dial { status: DialStatus::Answered, duration: 5 }, Utc::now()), msg_wait(true), false)]
    #[case::dial_by_dial(Resume::dial(Dial { status: DialStatus::Busy, duration: 0 }, Utc::now()), dial_wait(), true)]
    fn acceptance(#[case] resume: Resume, #[case] wait: ActivatedWait, #[case] accepted: bool) {
        assert_eq!(resume.check_accepted_by(&wait).is_ok(), accepted);
    }

    #[test]
    fn resume_json_uses_type_tag() {
        let resume = Resume::wait_timeout(Utc::now());
        let json = serde_json::to_value(&resume).unwrap();
        assert_eq!(json["type"], "wait_timeout");
        assert_eq!(serde_json::from_value::<Resume>(json).unwrap(), resume);
    }
}
