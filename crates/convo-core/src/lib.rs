//! convo-core: motor de sesiones para flows conversacionales.
//!
//! Un `Engine` crea sesiones a partir de triggers y las reanuda con resumes.
//! Cada llamada ejecuta un `Sprint` síncrono y acotado que recorre el grafo
//! del flow hasta encontrar un wait, completar o fallar. La persistencia es
//! responsabilidad del caller: la sesión se (de)serializa a JSON.
pub mod assets;
pub mod config;
pub mod constants;
pub mod definition;
pub mod engine;
pub mod errors;
pub mod eval;
pub mod event;
pub mod hashing;
pub mod model;
pub mod runtime;
pub mod utils;

pub use assets::{Field, Group, MissingAssetPolicy, SessionAssets, StaticAssets};
pub use config::EngineConfig;
pub use definition::{Action, ActionRegistry, Flow, FlowType, Node, Router, Wait};
pub use engine::{Engine, EngineBuilder, Services};
pub use errors::{EvalError, FlowError, RoutingError, ValidationError, ValidationProblem};
pub use eval::{Evaluator, PassthroughEvaluator};
pub use event::{Event, EventKind, Modifier};
pub use runtime::{ActivatedWait, ExecutionContext, Resume, Run, RunIndex, RunStatus, Session, SessionStatus, Sprint,
                  Trigger};
