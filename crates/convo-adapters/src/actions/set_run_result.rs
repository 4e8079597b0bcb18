use convo_core::{Action, ExecutionContext, FlowError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetRunResult {
    pub uuid: Uuid,
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub category: String,
}

impl Action for SetRunResult {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn type_name(&self) -> &'static str {
        "set_run_result"
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("result name can't be empty".into());
        }
        Ok(())
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), FlowError> {
        let value = ctx.evaluate_template(&self.value);
        let localized = ctx.localize(&self.uuid, "category").unwrap_or_default();
        ctx.save_result(&self.name, &value, &self.category, &localized, None);
        Ok(())
    }
}
