//! Errores del core.
//!
//! `FlowError` es el único error que devuelven las operaciones públicas del
//! engine. Los errores recuperables (ruteo, assets faltantes en tiempo de
//! ejecución, evaluación) nunca salen por aquí: se registran como eventos y
//! la ejecución continúa.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::model::AssetReference;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("reached maximum number of steps per sprint ({limit})")]
    StepBudgetExceeded { limit: usize },
    #[error("invalid session state: {0}")]
    InvalidState(String),
    #[error("resume of type {resume} not accepted by wait of type {wait}")]
    ResumeNotAccepted { resume: String, wait: String },
    #[error("missing asset: {0}")]
    MissingAsset(AssetReference),
    #[error("unknown {kind} type '{type_name}'")]
    UnknownType { kind: &'static str, type_name: String },
    #[error("serialization: {0}")]
    Serialization(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for FlowError {
    fn from(e: serde_json::Error) -> Self {
        FlowError::Serialization(e.to_string())
    }
}

/// Fallo de validación de una definición de flow. Siempre es fatal para la
/// carga del flow completo.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("validation failed for flow[uuid={flow}]: {problem}")]
    Flow { flow: Uuid, problem: ValidationProblem },
    #[error("validation failed for node[uuid={node}]: {problem}")]
    Node { node: Uuid, problem: ValidationProblem },
}

impl ValidationError {
    pub fn node(node: Uuid, problem: ValidationProblem) -> Self {
        ValidationError::Node { node, problem }
    }

    pub fn problem(&self) -> &ValidationProblem {
        match self {
            ValidationError::Flow { problem, .. } | ValidationError::Node { problem, .. } => problem,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationProblem {
    DuplicateUuid { kind: &'static str, uuid: Uuid },
    UnknownDestination { exit: Uuid, destination: Uuid },
    NoExits,
    IllegalAction { action: Uuid, type_name: String, flow_type: String },
    UnknownCategory { referrer: &'static str, category: Uuid },
    UnknownExit { category: Uuid, exit: Uuid },
    InvalidAction { action: Uuid, reason: String },
    IllegalWait { type_name: String, flow_type: String },
}

impl fmt::Display for ValidationProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationProblem::DuplicateUuid { kind, uuid } => write!(f, "{kind} UUID {uuid} isn't unique"),
            ValidationProblem::UnknownDestination { exit, destination } => {
                write!(f, "destination {destination} of exit[uuid={exit}] isn't a known node")
            }
            ValidationProblem::NoExits => write!(f, "nodes must have at least one exit"),
            ValidationProblem::IllegalAction { action,
                                               type_name,
                                               flow_type, } => {
                write!(f, "action[uuid={action}, type={type_name}] is not allowed in a flow of type {flow_type}")
            }
            ValidationProblem::UnknownCategory { referrer, category } => {
                write!(f, "{referrer} category {category} is not a valid category")
            }
            ValidationProblem::UnknownExit { category, exit } => {
                write!(f, "category[uuid={category}] references exit {exit} which isn't a node exit")
            }
            ValidationProblem::InvalidAction { action, reason } => write!(f, "invalid action[uuid={action}]: {reason}"),
            ValidationProblem::IllegalWait { type_name, flow_type } => {
                write!(f, "wait of type {type_name} is not allowed in a flow of type {flow_type}")
            }
        }
    }
}

/// Error de ruteo. Nunca se propaga al caller: el sprint lo convierte en un
/// evento `error` y el run pasa a `errored`.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutingError {
    #[error("no case matched and router has no default category")]
    NoMatch,
    #[error("router has no timeout category")]
    NoTimeoutCategory,
    #[error("category {0} doesn't exist in router")]
    UnknownCategory(Uuid),
    #[error("exit {0} doesn't exist in node")]
    UnknownExit(Uuid),
    #[error("router has no categories to pick from")]
    NoCategories,
    #[error("unable to evaluate case: {0}")]
    Evaluation(String),
}

/// Error del evaluador de expresiones.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("unknown test '{0}'")]
    UnknownTest(String),
    #[error("invalid arguments for {test}: {reason}")]
    InvalidArguments { test: String, reason: String },
    #[error("template error: {0}")]
    Template(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_destination_names_both_uuids() {
        let node = Uuid::from_u128(1);
        let exit = Uuid::from_u128(2);
        let destination = Uuid::from_u128(3);
        let err = ValidationError::node(node, ValidationProblem::UnknownDestination { exit, destination });
        let msg = err.to_string();
        assert!(msg.contains(&node.to_string()));
        assert!(msg.contains(&exit.to_string()));
        assert!(msg.contains(&format!("destination {destination}")));
        assert!(msg.ends_with("isn't a known node"));
    }

    #[test]
    fn serde_errors_convert() {
        let err: FlowError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, FlowError::Serialization(_)));
    }
}
