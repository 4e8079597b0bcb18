use convo_core::definition::FlowType;
use convo_core::event::EventKind;
use convo_core::model::MsgOut;
use convo_core::{Action, ExecutionContext, FlowError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envía un mensaje de texto al contacto. El texto y las quick replies se
/// localizan al idioma del contacto antes de evaluarse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMsg {
    pub uuid: Uuid,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub quick_replies: Vec<String>,
}

impl Action for SendMsg {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn type_name(&self) -> &'static str {
        "send_msg"
    }

    fn allowed_flow_types(&self) -> &'static [FlowType] {
        &[FlowType::Messaging, FlowType::MessagingOffline]
    }

    fn validate(&self) -> Result<(), String> {
        if self.text.trim().is_empty() && self.attachments.is_empty() {
            return Err("message must have text or attachments".into());
        }
        Ok(())
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), FlowError> {
        let text = ctx.localize(&self.uuid, "text").unwrap_or_else(|| self.text.clone());
        let quick_replies = ctx.localize_all(&self.uuid, "quick_replies")
                               .unwrap_or_else(|| self.quick_replies.clone());

        let text = ctx.evaluate_template(&text);
        let attachments: Vec<String> = self.attachments
                                           .iter()
                                           .map(|a| ctx.evaluate_template(a))
                                           .filter(|a| !a.is_empty())
                                           .collect();
        let quick_replies: Vec<String> = quick_replies.iter()
                                                      .map(|q| ctx.evaluate_template(q))
                                                      .filter(|q| !q.is_empty())
                                                      .collect();

        if text.trim().is_empty() && attachments.is_empty() {
            ctx.log_error("send_msg text evaluated to empty string, skipping");
            return Ok(());
        }

        let urn = ctx.contact().and_then(|c| c.urns.first().cloned());
        let msg = MsgOut { uuid: ctx.new_uuid(),
                           urn,
                           text,
                           attachments,
                           quick_replies };
        ctx.log_event(EventKind::MsgCreated { msg });
        Ok(())
    }
}
