use std::fmt::Debug;

use uuid::Uuid;

use super::FlowType;
use crate::errors::FlowError;
use crate::runtime::ExecutionContext;

/// Acción ejecutable dentro de un nodo. Las implementaciones concretas viven
/// fuera del core y se registran por tipo en un `ActionRegistry`.
///
/// `execute` sólo devuelve `Err` para fallos que deben abortar el sprint
/// completo; cualquier problema recuperable se registra como evento a través
/// del contexto (`log_event`, `fail_run`).
pub trait Action: Debug + Send + Sync {
    fn uuid(&self) -> Uuid;

    /// Nombre del tipo tal como aparece en el campo `type` del JSON.
    fn type_name(&self) -> &'static str;

    /// Tipos de flow en los que la acción es legal.
    fn allowed_flow_types(&self) -> &'static [FlowType] {
        FlowType::ALL
    }

    /// Validación estática al cargar el flow.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), FlowError>;
}
