use convo_core::definition::FlowType;
use convo_core::model::FlowReference;
use convo_core::{Action, ExecutionContext, FlowError};
use log::warn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Entra en otro flow como run hijo. Con `terminal` el padre termina junto
/// con el hijo en lugar de retomar su router.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnterFlow {
    pub uuid: Uuid,
    pub flow: FlowReference,
    #[serde(default)]
    pub terminal: bool,
}

impl Action for EnterFlow {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn type_name(&self) -> &'static str {
        "enter_flow"
    }

    fn allowed_flow_types(&self) -> &'static [FlowType] {
        &[FlowType::Messaging, FlowType::Voice]
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), FlowError> {
        match ctx.assets().flow(&self.flow.uuid) {
            Some(flow) => {
                ctx.push_flow(flow, self.terminal);
            }
            None => {
                warn!("enter_flow references missing flow {}", self.flow.uuid);
                ctx.error_run(format!("missing flow {}[uuid={}]", self.flow.name, self.flow.uuid));
            }
        }
        Ok(())
    }
}
