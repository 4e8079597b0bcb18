//! Routers: deciden la salida de un nodo a partir de categorías.
//!
//! El conjunto de routers es cerrado (`switch` | `random`), así que se
//! modela como enum etiquetado en lugar de un registro abierto.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Node, Wait};
use crate::errors::{RoutingError, ValidationProblem};
use crate::runtime::ExecutionContext;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub uuid: Uuid,
    pub name: String,
    pub exit_uuid: Uuid,
}

/// Caso de un switch: test a evaluar sobre el operando.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub uuid: Uuid,
    #[serde(rename = "type")]
    pub test: String,
    #[serde(default)]
    pub arguments: Vec<String>,
    pub category_uuid: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchRouter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_name: Option<String>,
    pub categories: Vec<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait: Option<Wait>,
    pub operand: String,
    #[serde(default)]
    pub cases: Vec<Case>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_category_uuid: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomRouter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_name: Option<String>,
    pub categories: Vec<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait: Option<Wait>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Router {
    Switch(SwitchRouter),
    Random(RandomRouter),
}

/// Categoría elegida junto con lo que se guarda como resultado.
struct Pick {
    category_uuid: Uuid,
    value: String,
    input: Option<String>,
}

impl Router {
    pub fn type_name(&self) -> &'static str {
        match self {
            Router::Switch(_) => "switch",
            Router::Random(_) => "random",
        }
    }

    pub fn categories(&self) -> &[Category] {
        match self {
            Router::Switch(r) => &r.categories,
            Router::Random(r) => &r.categories,
        }
    }

    pub fn wait(&self) -> Option<&Wait> {
        match self {
            Router::Switch(r) => r.wait.as_ref(),
            Router::Random(r) => r.wait.as_ref(),
        }
    }

    pub fn result_name(&self) -> Option<&str> {
        match self {
            Router::Switch(r) => r.result_name.as_deref(),
            Router::Random(r) => r.result_name.as_deref(),
        }
    }

    pub fn category(&self, uuid: &Uuid) -> Option<&Category> {
        self.categories().iter().find(|c| &c.uuid == uuid)
    }

    /// Comprueba que toda referencia a categoría o exit resuelva dentro del nodo.
    pub(crate) fn validate(&self, node: &Node) -> Result<(), ValidationProblem> {
        for category in self.categories() {
            if node.exit(&category.exit_uuid).is_none() {
                return Err(ValidationProblem::UnknownExit { category: category.uuid,
                                                            exit: category.exit_uuid });
            }
        }
        if let Router::Switch(r) = self {
            for case in &r.cases {
                self.check_category("case", &case.category_uuid)?;
            }
            if let Some(default) = &r.default_category_uuid {
                self.check_category("default", default)?;
            }
        }
        if let Some(timeout) = self.wait().and_then(Wait::timeout_category) {
            self.check_category("timeout", &timeout)?;
        }
        Ok(())
    }

    fn check_category(&self, referrer: &'static str, uuid: &Uuid) -> Result<(), ValidationProblem> {
        match self.category(uuid) {
            Some(_) => Ok(()),
            None => Err(ValidationProblem::UnknownCategory { referrer, category: *uuid }),
        }
    }

    /// Evalúa el router y devuelve el exit elegido, guardando el resultado
    /// si el router tiene `result_name`.
    pub fn route(&self, ctx: &mut ExecutionContext<'_>) -> Result<Uuid, RoutingError> {
        let pick = match self {
            Router::Switch(r) => r.pick(ctx)?,
            Router::Random(r) => r.pick(ctx)?,
        };
        self.route_to_category(ctx, pick)
    }

    /// Ruteo por timeout: va directo a la categoría del timeout del wait,
    /// sin evaluar los casos.
    pub fn route_timeout(&self, ctx: &mut ExecutionContext<'_>) -> Result<Uuid, RoutingError> {
        let category_uuid = self.wait()
                                .and_then(Wait::timeout_category)
                                .ok_or(RoutingError::NoTimeoutCategory)?;
        self.route_to_category(ctx,
                               Pick { category_uuid,
                                      value: String::new(),
                                      input: None })
    }

    fn route_to_category(&self, ctx: &mut ExecutionContext<'_>, pick: Pick) -> Result<Uuid, RoutingError> {
        let category = self.category(&pick.category_uuid)
                           .ok_or(RoutingError::UnknownCategory(pick.category_uuid))?;

        if let Some(result_name) = self.result_name() {
            let localized = ctx.localize(&category.uuid, "name")
                               .unwrap_or_default();
            ctx.save_result(result_name, &pick.value, &category.name, &localized, pick.input);
        }
        Ok(category.exit_uuid)
    }
}

impl SwitchRouter {
    fn pick(&self, ctx: &mut ExecutionContext<'_>) -> Result<Pick, RoutingError> {
        let operand = ctx.evaluate_template(&self.operand);

        for case in &self.cases {
            let arguments: Vec<String> = case.arguments
                                             .iter()
                                             .map(|a| ctx.evaluate_template(a))
                                             .collect();
            let matched = ctx.evaluate_test(&case.test, &operand, &arguments)
                             .map_err(|e| RoutingError::Evaluation(e.to_string()))?;
            if let Some(value) = matched {
                return Ok(Pick { category_uuid: case.category_uuid,
                                 value,
                                 input: Some(operand) });
            }
        }

        match self.default_category_uuid {
            Some(category_uuid) => Ok(Pick { category_uuid,
                                             value: operand.clone(),
                                             input: Some(operand) }),
            None => Err(RoutingError::NoMatch),
        }
    }
}

impl RandomRouter {
    fn pick(&self, ctx: &mut ExecutionContext<'_>) -> Result<Pick, RoutingError> {
        if self.categories.is_empty() {
            return Err(RoutingError::NoCategories);
        }
        let index = ctx.random_index(self.categories.len());
        let category = &self.categories[index];
        Ok(Pick { category_uuid: category.uuid,
                  value: category.name.clone(),
                  input: None })
    }
}
