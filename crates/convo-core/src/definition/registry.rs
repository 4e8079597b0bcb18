//! Registro explícito de constructores de acciones por tipo.
use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::Action;
use crate::errors::FlowError;

type ActionConstructor = fn(Value) -> Result<Box<dyn Action>, FlowError>;

fn construct<T>(value: Value) -> Result<Box<dyn Action>, FlowError>
    where T: Action + DeserializeOwned + 'static
{
    let action: T = serde_json::from_value(value)?;
    Ok(Box::new(action))
}

/// Se construye una vez al arrancar y se pasa por referencia a la carga de
/// flows. No hay estado global.
#[derive(Default)]
pub struct ActionRegistry {
    constructors: HashMap<String, ActionConstructor>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra `T` bajo `type_name`. Un segundo registro reemplaza al primero.
    pub fn register<T>(&mut self, type_name: &str) -> &mut Self
        where T: Action + DeserializeOwned + 'static
    {
        self.constructors.insert(type_name.to_string(), construct::<T>);
        self
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name)
    }

    pub fn registered_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Lee el campo `type` y delega en el constructor registrado.
    pub fn read(&self, value: Value) -> Result<Box<dyn Action>, FlowError> {
        let type_name = value.get("type")
                             .and_then(Value::as_str)
                             .ok_or_else(|| FlowError::Serialization("action is missing a type".into()))?
                             .to_string();
        let constructor = self.constructors
                              .get(&type_name)
                              .ok_or(FlowError::UnknownType { kind: "action", type_name })?;
        constructor(value)
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry").field("types", &self.registered_types()).finish()
    }
}
