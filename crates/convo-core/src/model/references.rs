use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Referencia ligera a un flow, tal como aparece en JSON persistido.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowReference {
    pub uuid: Uuid,
    pub name: String,
}

impl FlowReference {
    pub fn new(uuid: Uuid, name: impl Into<String>) -> Self {
        Self { uuid, name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupReference {
    pub uuid: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldReference {
    pub key: String,
    pub name: String,
}

/// Asset que el resolver no pudo encontrar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssetReference {
    Flow(FlowReference),
    Group(GroupReference),
    Field(FieldReference),
}

impl fmt::Display for AssetReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetReference::Flow(r) => write!(f, "flow[uuid={},name={}]", r.uuid, r.name),
            AssetReference::Group(r) => write!(f, "group[uuid={},name={}]", r.uuid, r.name),
            AssetReference::Field(r) => write!(f, "field[key={},name={}]", r.key, r.name),
        }
    }
}
