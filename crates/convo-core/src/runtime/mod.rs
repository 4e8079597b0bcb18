//! Estado de ejecución: sesión, runs, pasos, sprint y protocolo wait/resume.

mod activated_wait;
mod context;
mod resume;
mod run;
mod session;
mod sprint;
mod status;
mod step;
mod trigger;

pub use activated_wait::ActivatedWait;
pub use context::ExecutionContext;
pub use resume::{Resume, ResumeKind};
pub use run::{Run, RunIndex, RunResult};
pub use session::Session;
pub use sprint::{Segment, Sprint};
pub use status::{RunStatus, SessionStatus};
pub use step::Step;
pub use trigger::{Trigger, TriggerKind};
