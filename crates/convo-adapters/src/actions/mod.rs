//! Acciones concretas y su registro por tipo.

mod contact;
mod enter_flow;
mod say_msg;
mod send_msg;
mod set_run_result;

use convo_core::ActionRegistry;

pub use contact::{AddContactGroups, RemoveContactGroups, SetContactField, SetContactLanguage, SetContactName};
pub use enter_flow::EnterFlow;
pub use say_msg::SayMsg;
pub use send_msg::SendMsg;
pub use set_run_result::SetRunResult;

/// Registro con todas las acciones de este crate.
pub fn default_registry() -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    registry.register::<SendMsg>("send_msg")
            .register::<SayMsg>("say_msg")
            .register::<SetRunResult>("set_run_result")
            .register::<SetContactName>("set_contact_name")
            .register::<SetContactLanguage>("set_contact_language")
            .register::<SetContactField>("set_contact_field")
            .register::<AddContactGroups>("add_contact_groups")
            .register::<RemoveContactGroups>("remove_contact_groups")
            .register::<EnterFlow>("enter_flow");
    registry
}
