use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Action, Router};

/// Salida de un nodo. Sin destino, abandonar el nodo termina el run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exit {
    pub uuid: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_uuid: Option<Uuid>,
}

#[derive(Debug)]
pub struct Node {
    pub uuid: Uuid,
    pub actions: Vec<Box<dyn Action>>,
    pub router: Option<Router>,
    pub exits: Vec<Exit>,
}

impl Node {
    pub fn exit(&self, uuid: &Uuid) -> Option<&Exit> {
        self.exits.iter().find(|e| &e.uuid == uuid)
    }

    /// Salida usada por nodos sin router.
    pub fn default_exit(&self) -> Option<&Exit> {
        self.exits.first()
    }
}
