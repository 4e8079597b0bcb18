//! Resolución de assets (flows, campos, grupos) consumida por el engine.
//!
//! El core sólo define el contrato `SessionAssets`; `StaticAssets` es una
//! implementación en memoria útil para tests y embebidos.

mod static_assets;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::definition::Flow;
use crate::model::{FieldReference, GroupReference};

pub use static_assets::StaticAssets;

/// Campo de contacto declarado.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub key: String,
    pub name: String,
}

impl Field {
    pub fn reference(&self) -> FieldReference {
        FieldReference { key: self.key.clone(),
                         name: self.name.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub uuid: Uuid,
    pub name: String,
}

impl Group {
    pub fn reference(&self) -> GroupReference {
        GroupReference { uuid: self.uuid,
                         name: self.name.clone() }
    }
}

pub trait SessionAssets: Send + Sync {
    fn flow(&self, uuid: &Uuid) -> Option<Arc<Flow>>;
    fn field(&self, key: &str) -> Option<Field>;
    fn group(&self, uuid: &Uuid) -> Option<Group>;
}

/// Qué hacer al leer una sesión que referencia assets inexistentes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingAssetPolicy {
    /// Continuar sin informar.
    #[default]
    Ignore,
    /// Fallar con `FlowError::MissingAsset` en la primera referencia.
    Abort,
    /// Continuar y devolver la lista de referencias faltantes.
    Collect,
}
