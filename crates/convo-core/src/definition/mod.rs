//! Definición inmutable de un flow: nodos, acciones, routers, waits y exits.
//!
//! Un `Flow` se construye una sola vez a partir de su JSON, usando un
//! `ActionRegistry` explícito para instanciar las acciones por tipo, y se
//! valida completo antes de entregarse. Nunca se muta después de cargado.

pub mod action;
pub mod flow;
pub mod node;
pub mod registry;
pub mod router;
pub mod validate;
pub mod wait;

pub use action::Action;
pub use flow::{Flow, FlowType, Localization};
pub use node::{Exit, Node};
pub use registry::ActionRegistry;
pub use router::{Case, Category, RandomRouter, Router, SwitchRouter};
pub use wait::{DialWait, Hint, MsgWait, Timeout, Wait};
