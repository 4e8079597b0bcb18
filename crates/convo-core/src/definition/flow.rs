//! `Flow`: grafo inmutable y validado.
use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::validate::validate_flow;
use super::{ActionRegistry, Exit, Node, Router};
use crate::errors::{FlowError, ValidationError, ValidationProblem};
use crate::hashing::hash_value;
use crate::model::FlowReference;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowType {
    Messaging,
    MessagingOffline,
    Voice,
}

impl FlowType {
    pub const ALL: &'static [FlowType] = &[FlowType::Messaging, FlowType::MessagingOffline, FlowType::Voice];

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowType::Messaging => "messaging",
            FlowType::MessagingOffline => "messaging_offline",
            FlowType::Voice => "voice",
        }
    }
}

/// idioma -> uuid del item -> clave -> textos traducidos.
pub type Localization = BTreeMap<String, HashMap<Uuid, BTreeMap<String, Vec<String>>>>;

#[derive(Deserialize)]
struct FlowEnvelope {
    uuid: Uuid,
    name: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(rename = "type")]
    flow_type: FlowType,
    #[serde(default)]
    expire_after_minutes: u32,
    #[serde(default)]
    localization: Localization,
    #[serde(default)]
    nodes: Vec<NodeEnvelope>,
}

#[derive(Deserialize)]
struct NodeEnvelope {
    uuid: Uuid,
    #[serde(default)]
    actions: Vec<Value>,
    #[serde(default)]
    router: Option<Router>,
    #[serde(default)]
    exits: Vec<Exit>,
}

#[derive(Debug)]
pub struct Flow {
    uuid: Uuid,
    name: String,
    language: Option<String>,
    flow_type: FlowType,
    expire_after_minutes: u32,
    localization: Localization,
    nodes: IndexMap<Uuid, Node>,
    definition_hash: String,
}

impl Flow {
    /// Lee y valida un flow. Cualquier problema de validación es fatal.
    pub fn from_value(registry: &ActionRegistry, value: Value) -> Result<Flow, FlowError> {
        let definition_hash = hash_value(&value);
        let envelope: FlowEnvelope = serde_json::from_value(value)?;

        let mut nodes = IndexMap::with_capacity(envelope.nodes.len());
        for raw in envelope.nodes {
            let actions = raw.actions
                             .into_iter()
                             .map(|a| registry.read(a))
                             .collect::<Result<Vec<_>, _>>()?;
            let node = Node { uuid: raw.uuid,
                              actions,
                              router: raw.router,
                              exits: raw.exits };
            if nodes.insert(raw.uuid, node).is_some() {
                return Err(ValidationError::Flow { flow: envelope.uuid,
                                                   problem: ValidationProblem::DuplicateUuid { kind: "node",
                                                                                               uuid: raw.uuid } }.into());
            }
        }

        let flow = Flow { uuid: envelope.uuid,
                          name: envelope.name,
                          language: envelope.language,
                          flow_type: envelope.flow_type,
                          expire_after_minutes: envelope.expire_after_minutes,
                          localization: envelope.localization,
                          nodes,
                          definition_hash };
        validate_flow(&flow)?;
        Ok(flow)
    }

    pub fn from_json(registry: &ActionRegistry, data: &str) -> Result<Flow, FlowError> {
        let value: Value = serde_json::from_str(data)?;
        Self::from_value(registry, value)
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn flow_type(&self) -> FlowType {
        self.flow_type
    }

    pub fn expire_after_minutes(&self) -> u32 {
        self.expire_after_minutes
    }

    pub fn definition_hash(&self) -> &str {
        &self.definition_hash
    }

    pub fn reference(&self) -> FlowReference {
        FlowReference::new(self.uuid, self.name.clone())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node(&self, uuid: &Uuid) -> Option<&Node> {
        self.nodes.get(uuid)
    }

    /// Nodo de entrada: el primero declarado.
    pub fn first_node(&self) -> Option<&Node> {
        self.nodes.first().map(|(_, n)| n)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Primera traducción disponible de `key` para `item`, probando los
    /// idiomas en orden. Nunca traduce al idioma base del flow.
    pub fn localize(&self, languages: &[String], item: &Uuid, key: &str) -> Option<&[String]> {
        languages.iter()
                 .filter(|lang| self.language.as_deref() != Some(lang.as_str()))
                 .find_map(|lang| {
                     self.localization
                         .get(lang)
                         .and_then(|items| items.get(item))
                         .and_then(|keys| keys.get(key))
                         .filter(|texts| !texts.is_empty())
                         .map(Vec::as_slice)
                 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flow_json() -> Value {
        json!({
            "uuid": "8ca44c09-791d-453a-9799-a70dd3303306",
            "name": "Greeting",
            "language": "eng",
            "type": "messaging",
            "localization": {
                "spa": {"b1ba8d4c-1d0c-4e3b-a7a6-0c1e35a2f8a1": {"name": ["Sí"]}}
            },
            "nodes": [
                {"uuid": "32bc60ad-5c86-465e-a6b8-049c44ecce49",
                 "exits": [{"uuid": "2bff5c33-9d29-4cfc-8bb7-0a1b9f97d830", "destination_uuid": "3dcccbb4-d29c-41dd-a01f-16d814c9ab82"}]},
                {"uuid": "3dcccbb4-d29c-41dd-a01f-16d814c9ab82",
                 "exits": [{"uuid": "6ed7b3ba-5ad9-4fa7-a4ed-5e6a3c5fde88"}]}
            ]
        })
    }

    #[test]
    fn reads_nodes_in_order() {
        let flow = Flow::from_value(&ActionRegistry::new(), flow_json()).unwrap();
        assert_eq!(flow.name(), "Greeting");
        assert_eq!(flow.flow_type(), FlowType::Messaging);
        assert_eq!(flow.first_node().unwrap().uuid.to_string(), "32bc60ad-5c86-465e-a6b8-049c44ecce49");
        assert_eq!(flow.nodes().count(), 2);
        assert_eq!(flow.definition_hash().len(), 64);
    }

    #[test]
    fn localize_skips_base_language() {
        let flow = Flow::from_value(&ActionRegistry::new(), flow_json()).unwrap();
        let item: Uuid = "b1ba8d4c-1d0c-4e3b-a7a6-0c1e35a2f8a1".parse().unwrap();
        let langs = vec!["spa".to_string()];
        assert_eq!(flow.localize(&langs, &item, "name"), Some(&["Sí".to_string()][..]));
        assert_eq!(flow.localize(&["eng".to_string()], &item, "name"), None);
    }

    #[test]
    fn duplicate_node_is_rejected() {
        let mut value = flow_json();
        let first = value["nodes"][0].clone();
        value["nodes"].as_array_mut().unwrap().push(first);
        let err = Flow::from_value(&ActionRegistry::new(), value).unwrap_err();
        assert!(matches!(err,
                         FlowError::Validation(ValidationError::Flow { problem: ValidationProblem::DuplicateUuid { kind: "node", .. },
                                                                       .. })));
    }

    #[test]
    fn unknown_action_type_fails_load() {
        let mut value = flow_json();
        value["nodes"][0]["actions"] = json!([{"type": "teleport", "uuid": "d2f5b2a4-8a83-4d0b-9c3c-3b0a4f8b4c11"}]);
        let err = Flow::from_value(&ActionRegistry::new(), value).unwrap_err();
        assert!(matches!(err, FlowError::UnknownType { kind: "action", .. }));
    }
}
