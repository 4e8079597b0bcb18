//! Eventos y modifiers que produce un sprint.
//!
//! Los eventos son el contrato observable del motor: cada acción, router,
//! wait o resume los emite a través del `ExecutionContext`. Los modifiers
//! describen cambios sobre el contacto y se aplican en el momento en que se
//! registran.

mod modifier;
mod types;

pub use modifier::{GroupModification, Modifier};
pub use types::{Event, EventKind};
