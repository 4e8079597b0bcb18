use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::GroupReference;

/// Contacto de la sesión. Lo posee la sesión y sólo cambia mediante
/// modifiers o un resume que trae un contacto nuevo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub uuid: Uuid,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urns: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupReference>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
    pub created_on: DateTime<Utc>,
}

impl Contact {
    pub fn new(uuid: Uuid, name: impl Into<String>, created_on: DateTime<Utc>) -> Self {
        Self { uuid,
               name: name.into(),
               language: None,
               urns: Vec::new(),
               groups: Vec::new(),
               fields: BTreeMap::new(),
               created_on }
    }

    pub fn in_group(&self, group: &Uuid) -> bool {
        self.groups.iter().any(|g| &g.uuid == group)
    }

    /// Representación expuesta a templates (`@contact`).
    pub fn context(&self) -> Value {
        json!({
            "uuid": self.uuid,
            "name": self.name,
            "first_name": self.name.split_whitespace().next().unwrap_or(""),
            "language": self.language,
            "urns": self.urns,
            "urn": self.urns.first(),
            "groups": self.groups.iter().map(|g| g.name.clone()).collect::<Vec<_>>(),
            "fields": self.fields,
            "created_on": self.created_on,
        })
    }
}
