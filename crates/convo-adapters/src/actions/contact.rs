//! Acciones que modifican el contacto. Todas producen un `Modifier`; el
//! evento correspondiente sólo se registra si el contacto cambia.
use convo_core::event::{GroupModification, Modifier};
use convo_core::model::{FieldReference, GroupReference};
use convo_core::{Action, ExecutionContext, FlowError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static ISO639_3: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]{3}$").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetContactName {
    pub uuid: Uuid,
    pub name: String,
}

impl Action for SetContactName {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn type_name(&self) -> &'static str {
        "set_contact_name"
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), FlowError> {
        let name = ctx.evaluate_template(&self.name).trim().to_string();
        ctx.apply_modifier(Modifier::Name { name });
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetContactLanguage {
    pub uuid: Uuid,
    pub language: String,
}

impl Action for SetContactLanguage {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn type_name(&self) -> &'static str {
        "set_contact_language"
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), FlowError> {
        let language = ctx.evaluate_template(&self.language).trim().to_lowercase();
        if !language.is_empty() && !ISO639_3.is_match(&language) {
            ctx.log_error(format!("'{language}' is not a valid language code"));
            return Ok(());
        }
        ctx.apply_modifier(Modifier::Language { language });
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetContactField {
    pub uuid: Uuid,
    pub field: FieldReference,
    #[serde(default)]
    pub value: String,
}

impl Action for SetContactField {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn type_name(&self) -> &'static str {
        "set_contact_field"
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), FlowError> {
        let Some(field) = ctx.assets().field(&self.field.key) else {
            ctx.log_error(format!("missing field {}[key={}]", self.field.name, self.field.key));
            return Ok(());
        };
        let value = ctx.evaluate_template(&self.value).trim().to_string();
        ctx.apply_modifier(Modifier::Field { field: field.reference(),
                                             value: Some(value).filter(|v| !v.is_empty()) });
        Ok(())
    }
}

/// Resuelve los grupos contra los assets; los que faltan se registran como
/// error y se omiten.
fn resolve_groups(ctx: &mut ExecutionContext<'_>, groups: &[GroupReference]) -> Vec<GroupReference> {
    let mut found = Vec::with_capacity(groups.len());
    for reference in groups {
        match ctx.assets().group(&reference.uuid) {
            Some(group) => found.push(group.reference()),
            None => ctx.log_error(format!("missing group {}[uuid={}]", reference.name, reference.uuid)),
        }
    }
    found
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddContactGroups {
    pub uuid: Uuid,
    pub groups: Vec<GroupReference>,
}

impl Action for AddContactGroups {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn type_name(&self) -> &'static str {
        "add_contact_groups"
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), FlowError> {
        let groups = resolve_groups(ctx, &self.groups);
        if !groups.is_empty() {
            ctx.apply_modifier(Modifier::Groups { groups,
                                                  modification: GroupModification::Add });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveContactGroups {
    pub uuid: Uuid,
    pub groups: Vec<GroupReference>,
}

impl Action for RemoveContactGroups {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn type_name(&self) -> &'static str {
        "remove_contact_groups"
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), FlowError> {
        let groups = resolve_groups(ctx, &self.groups);
        if !groups.is_empty() {
            ctx.apply_modifier(Modifier::Groups { groups,
                                                  modification: GroupModification::Remove });
        }
        Ok(())
    }
}
