//! convoflow
//!
//! Fachada del workspace:
//! - `convo_core` expone el engine, las sesiones y los contratos (`Action`,
//!   `Evaluator`, `SessionAssets`).
//! - `convo_adapters` expone las acciones concretas y el `SimpleEvaluator`.
//!
//! Para la mayoría de los usos basta con `default_engine` y `load_assets`.

use std::sync::Arc;

pub use convo_adapters;
pub use convo_core;

pub use convo_adapters::{default_registry, SimpleEvaluator};
pub use convo_core::{Engine, EngineConfig, FlowError, Resume, Session, SessionStatus, Sprint, StaticAssets, Trigger};

/// Engine con la configuración leída del entorno (`CONVO_*`, `.env`) y el
/// evaluador de `convo-adapters`.
pub fn default_engine() -> Engine {
    Engine::builder().with_config(EngineConfig::from_env())
                     .with_evaluator(Arc::new(SimpleEvaluator))
                     .build()
}

/// Carga flows, fields y groups desde JSON usando el registry por defecto.
pub fn load_assets(data: &str) -> Result<StaticAssets, FlowError> {
    StaticAssets::from_json(&default_registry(), data)
}
