use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Visita a un nodo. `exit_uuid` se fija una única vez al abandonar el nodo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub uuid: Uuid,
    pub node_uuid: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_uuid: Option<Uuid>,
    pub arrived_on: DateTime<Utc>,
}

impl Step {
    pub fn new(uuid: Uuid, node_uuid: Uuid, arrived_on: DateTime<Utc>) -> Self {
        Self { uuid,
               node_uuid,
               exit_uuid: None,
               arrived_on }
    }

    pub fn is_left(&self) -> bool {
        self.exit_uuid.is_some()
    }
}
