use convo_core::definition::FlowType;
use convo_core::event::EventKind;
use convo_core::model::MsgOut;
use convo_core::{Action, ExecutionContext, FlowError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Mensaje hablado en flows de voz, opcionalmente con un audio grabado.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SayMsg {
    pub uuid: Uuid,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

impl Action for SayMsg {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn type_name(&self) -> &'static str {
        "say_msg"
    }

    fn allowed_flow_types(&self) -> &'static [FlowType] {
        &[FlowType::Voice]
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), FlowError> {
        let text = ctx.localize(&self.uuid, "text").unwrap_or_else(|| self.text.clone());
        let text = ctx.evaluate_template(&text);
        if text.trim().is_empty() {
            ctx.log_error("say_msg text evaluated to empty string, skipping");
            return Ok(());
        }
        let attachments = self.audio_url
                              .iter()
                              .map(|url| format!("audio:{url}"))
                              .collect();
        let msg = MsgOut { uuid: ctx.new_uuid(),
                           urn: None,
                           text,
                           attachments,
                           quick_replies: vec![] };
        ctx.log_event(EventKind::IvrCreated { msg });
        Ok(())
    }
}
