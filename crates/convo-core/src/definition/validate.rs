//! Validación estructural de un flow recién leído.
//!
//! Se ejecuta una sola vez al cargar. El primer problema encontrado aborta
//! la carga; no hay tolerancia parcial.
use std::collections::HashSet;

use uuid::Uuid;

use super::{Flow, Node};
use crate::errors::{ValidationError, ValidationProblem};

pub(crate) fn validate_flow(flow: &Flow) -> Result<(), ValidationError> {
    let mut seen_actions: HashSet<Uuid> = HashSet::new();
    let mut seen_exits: HashSet<Uuid> = HashSet::new();

    for node in flow.nodes() {
        validate_node(flow, node, &mut seen_actions, &mut seen_exits).map_err(|p| ValidationError::node(node.uuid, p))?;
    }
    Ok(())
}

fn validate_node(flow: &Flow,
                 node: &Node,
                 seen_actions: &mut HashSet<Uuid>,
                 seen_exits: &mut HashSet<Uuid>)
                 -> Result<(), ValidationProblem> {
    if node.exits.is_empty() {
        return Err(ValidationProblem::NoExits);
    }

    let flow_type = flow.flow_type();
    for action in &node.actions {
        if !seen_actions.insert(action.uuid()) {
            return Err(ValidationProblem::DuplicateUuid { kind: "action",
                                                          uuid: action.uuid() });
        }
        if !action.allowed_flow_types().contains(&flow_type) {
            return Err(ValidationProblem::IllegalAction { action: action.uuid(),
                                                          type_name: action.type_name().to_string(),
                                                          flow_type: flow_type.as_str().to_string() });
        }
        action.validate()
              .map_err(|reason| ValidationProblem::InvalidAction { action: action.uuid(), reason })?;
    }

    for exit in &node.exits {
        if !seen_exits.insert(exit.uuid) {
            return Err(ValidationProblem::DuplicateUuid { kind: "exit", uuid: exit.uuid });
        }
        if let Some(destination) = exit.destination_uuid {
            if flow.node(&destination).is_none() {
                return Err(ValidationProblem::UnknownDestination { exit: exit.uuid, destination });
            }
        }
    }

    if let Some(router) = &node.router {
        router.validate(node)?;
        if let Some(wait) = router.wait() {
            if !wait.allowed_flow_types().contains(&flow_type) {
                return Err(ValidationProblem::IllegalWait { type_name: wait.type_name().to_string(),
                                                            flow_type: flow_type.as_str().to_string() });
            }
        }
    }
    Ok(())
}
