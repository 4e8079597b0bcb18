use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::{Field, Group, SessionAssets};
use crate::definition::{ActionRegistry, Flow};
use crate::errors::FlowError;

#[derive(Deserialize)]
struct AssetsEnvelope {
    #[serde(default)]
    flows: Vec<Value>,
    #[serde(default)]
    fields: Vec<Field>,
    #[serde(default)]
    groups: Vec<Group>,
}

/// Assets en memoria, inmutables una vez cargados.
#[derive(Debug, Default)]
pub struct StaticAssets {
    flows: HashMap<Uuid, Arc<Flow>>,
    fields: HashMap<String, Field>,
    groups: HashMap<Uuid, Group>,
}

impl StaticAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lee `{"flows": [...], "fields": [...], "groups": [...]}`. Cada flow se
    /// valida al cargarse.
    pub fn from_json(registry: &ActionRegistry, data: &str) -> Result<Self, FlowError> {
        let envelope: AssetsEnvelope = serde_json::from_str(data)?;
        let mut assets = Self::new();
        for raw in envelope.flows {
            assets.add_flow(Flow::from_value(registry, raw)?);
        }
        for field in envelope.fields {
            assets.add_field(field);
        }
        for group in envelope.groups {
            assets.add_group(group);
        }
        Ok(assets)
    }

    pub fn add_flow(&mut self, flow: Flow) -> &mut Self {
        self.flows.insert(flow.uuid(), Arc::new(flow));
        self
    }

    pub fn add_field(&mut self, field: Field) -> &mut Self {
        self.fields.insert(field.key.clone(), field);
        self
    }

    pub fn add_group(&mut self, group: Group) -> &mut Self {
        self.groups.insert(group.uuid, group);
        self
    }

    pub fn flow_count(&self) -> usize {
        self.flows.len()
    }
}

impl SessionAssets for StaticAssets {
    fn flow(&self, uuid: &Uuid) -> Option<Arc<Flow>> {
        self.flows.get(uuid).cloned()
    }

    fn field(&self, key: &str) -> Option<Field> {
        self.fields.get(key).cloned()
    }

    fn group(&self, uuid: &Uuid) -> Option<Group> {
        self.groups.get(uuid).cloned()
    }
}
