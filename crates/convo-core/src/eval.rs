//! Costura hacia el evaluador de expresiones.
//!
//! El core sólo necesita dos cosas: resolver un template contra el contexto
//! de evaluación y decidir si un test de caso coincide. La implementación
//! concreta vive fuera del core.
use std::fmt::Debug;

use serde_json::Value;

use crate::errors::EvalError;

pub trait Evaluator: Debug + Send + Sync {
    /// Resuelve `template` contra `context`.
    fn evaluate_template(&self, template: &str, context: &Value) -> Result<String, EvalError>;

    /// Evalúa un test de caso. `Ok(Some(valor))` si coincide, con el valor
    /// a guardar como resultado; `Ok(None)` si no coincide.
    fn evaluate_test(&self,
                     test: &str,
                     operand: &str,
                     arguments: &[String],
                     context: &Value)
                     -> Result<Option<String>, EvalError>;
}

/// Evaluador nulo: devuelve los templates tal cual y no conoce ningún test.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughEvaluator;

impl Evaluator for PassthroughEvaluator {
    fn evaluate_template(&self, template: &str, _context: &Value) -> Result<String, EvalError> {
        Ok(template.to_string())
    }

    fn evaluate_test(&self,
                     test: &str,
                     _operand: &str,
                     _arguments: &[String],
                     _context: &Value)
                     -> Result<Option<String>, EvalError> {
        Err(EvalError::UnknownTest(test.to_string()))
    }
}
