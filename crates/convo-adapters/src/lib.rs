//! convo-adapters: implementaciones enchufables sobre los traits del core.
//!
//! - Acciones concretas (`send_msg`, `set_contact_field`, `enter_flow`, ...)
//!   y `default_registry()` que las registra por tipo.
//! - `SimpleEvaluator`, un evaluador de templates `@ruta` y tests de casos
//!   suficiente para flows reales sencillos.
//!
//! El core no conoce ninguno de estos tipos; sólo los ve a través de
//! `Action` y `Evaluator`.

pub mod actions;
pub mod eval;

pub use actions::default_registry;
pub use eval::SimpleEvaluator;
