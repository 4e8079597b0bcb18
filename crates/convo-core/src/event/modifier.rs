//! Modifiers: cambios declarativos sobre el contacto.
use serde::{Deserialize, Serialize};

use super::EventKind;
use crate::model::{Contact, FieldReference, GroupReference};
use crate::utils::truncate_ellipsis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupModification {
    Add,
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Modifier {
    Name { name: String },
    Language { language: String },
    Field { field: FieldReference, value: Option<String> },
    Groups { groups: Vec<GroupReference>, modification: GroupModification },
}

impl Modifier {
    pub fn type_name(&self) -> &'static str {
        match self {
            Modifier::Name { .. } => "name",
            Modifier::Language { .. } => "language",
            Modifier::Field { .. } => "field",
            Modifier::Groups { .. } => "groups",
        }
    }

    /// Aplica el cambio y devuelve el evento a registrar, o `None` si el
    /// contacto ya estaba en ese estado.
    pub fn apply(&self, contact: &mut Contact, max_field_chars: usize) -> Option<EventKind> {
        match self {
            Modifier::Name { name } => {
                if &contact.name == name {
                    return None;
                }
                contact.name = name.clone();
                Some(EventKind::ContactNameChanged { name: name.clone() })
            }
            Modifier::Language { language } => {
                if contact.language.as_deref() == Some(language.as_str()) {
                    return None;
                }
                contact.language = if language.is_empty() { None } else { Some(language.clone()) };
                Some(EventKind::ContactLanguageChanged { language: language.clone() })
            }
            Modifier::Field { field, value } => {
                let value = value.as_deref()
                                 .filter(|v| !v.is_empty())
                                 .map(|v| truncate_ellipsis(v, max_field_chars));
                if contact.fields.get(&field.key) == value.as_ref() {
                    return None;
                }
                match &value {
                    Some(v) => contact.fields.insert(field.key.clone(), v.clone()),
                    None => contact.fields.remove(&field.key),
                };
                Some(EventKind::ContactFieldChanged { field: field.clone(), value })
            }
            Modifier::Groups { groups, modification } => {
                let mut changed = Vec::new();
                for group in groups {
                    match modification {
                        GroupModification::Add if !contact.in_group(&group.uuid) => {
                            contact.groups.push(group.clone());
                            changed.push(group.clone());
                        }
                        GroupModification::Remove if contact.in_group(&group.uuid) => {
                            contact.groups.retain(|g| g.uuid != group.uuid);
                            changed.push(group.clone());
                        }
                        _ => {}
                    }
                }
                if changed.is_empty() {
                    return None;
                }
                Some(match modification {
                    GroupModification::Add => EventKind::ContactGroupsChanged { groups_added: changed,
                                                                               groups_removed: vec![] },
                    GroupModification::Remove => EventKind::ContactGroupsChanged { groups_added: vec![],
                                                                                  groups_removed: changed },
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn contact() -> Contact {
        Contact::new(Uuid::from_u128(7), "Bob", Utc::now())
    }

    #[test]
    fn unchanged_name_logs_nothing() {
        let mut c = contact();
        assert!(Modifier::Name { name: "Bob".into() }.apply(&mut c, 640).is_none());
        let ev = Modifier::Name { name: "Robert".into() }.apply(&mut c, 640);
        assert_eq!(ev, Some(EventKind::ContactNameChanged { name: "Robert".into() }));
        assert_eq!(c.name, "Robert");
    }

    #[test]
    fn field_values_are_truncated_and_cleared() {
        let mut c = contact();
        let field = FieldReference { key: "age".into(), name: "Age".into() };
        Modifier::Field { field: field.clone(), value: Some("123456".into()) }.apply(&mut c, 5);
        assert_eq!(c.fields.get("age").map(String::as_str), Some("12..."));

        let ev = Modifier::Field { field, value: None }.apply(&mut c, 5);
        assert!(matches!(ev, Some(EventKind::ContactFieldChanged { value: None, .. })));
        assert!(c.fields.is_empty());
    }

    #[test]
    fn groups_only_report_actual_changes() {
        let mut c = contact();
        let g = GroupReference { uuid: Uuid::from_u128(9), name: "Testers".into() };
        let add = Modifier::Groups { groups: vec![g.clone()], modification: GroupModification::Add };
        assert!(add.apply(&mut c, 640).is_some());
        assert!(add.apply(&mut c, 640).is_none());
        assert!(c.in_group(&g.uuid));
    }
}
