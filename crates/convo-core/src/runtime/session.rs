//! `Session`: pila de runs de un contacto y su estado de espera.
//!
//! La sesión es dueña exclusiva de todos sus runs (`runs`), que forman la
//! pila de llamadas; el último es la hoja. Los enlaces padre/hijo son
//! índices en ese vector, reconstruidos desde `parent_uuid` al leer.
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::sprint::SprintDriver;
use super::{ActivatedWait, Resume, Run, RunIndex, RunStatus, SessionStatus, Sprint, Trigger, TriggerKind};
use crate::assets::SessionAssets;
use crate::definition::{Flow, FlowType};
use crate::engine::Engine;
use crate::errors::FlowError;
use crate::hashing::hash_value;
use crate::model::{Contact, Environment, Input};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub uuid: Uuid,
    #[serde(rename = "type")]
    pub flow_type: FlowType,
    pub status: SessionStatus,
    pub trigger: Trigger,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Input>,
    #[serde(default)]
    pub runs: Vec<Run>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait: Option<ActivatedWait>,
    #[serde(default)]
    pub resume_count: usize,
}

impl Session {
    pub(crate) fn new(uuid: Uuid, trigger: Trigger, flow_type: FlowType) -> Self {
        let input = match &trigger.kind {
            TriggerKind::Msg { msg } => Some(Input::from_msg(msg.clone(), trigger.triggered_on)),
            _ => None,
        };
        Self { uuid,
               flow_type,
               status: SessionStatus::Active,
               environment: trigger.environment.clone().unwrap_or_default(),
               contact: trigger.contact.clone(),
               input,
               trigger,
               runs: Vec::new(),
               wait: None,
               resume_count: 0 }
    }

    pub(crate) fn start(&mut self,
                        engine: &Engine,
                        assets: &dyn SessionAssets,
                        flow: Arc<Flow>)
                        -> Result<Sprint, FlowError> {
        SprintDriver::new(engine, assets, self).start(flow)
    }

    /// Reanuda una sesión en espera. Falla con `InvalidState` si la sesión
    /// no espera y con `ResumeNotAccepted` si el wait activo no acepta este
    /// tipo de resume; en ambos casos la sesión queda intacta.
    pub fn resume(&mut self, engine: &Engine, assets: &dyn SessionAssets, resume: Resume) -> Result<Sprint, FlowError> {
        if self.status != SessionStatus::Waiting {
            return Err(FlowError::InvalidState(format!("only waiting sessions can be resumed, session {} is {:?}",
                                                       self.uuid, self.status)));
        }
        let wait = self.wait
                       .as_ref()
                       .ok_or_else(|| FlowError::InvalidState(format!("session {} is waiting without a wait", self.uuid)))?;
        resume.check_accepted_by(wait)?;
        self.link_runs()?;

        SprintDriver::new(engine, assets, self).resume(resume)
    }

    /// Crea un run para `flow` y lo apila como nueva hoja.
    pub fn push_flow(&mut self,
                     run_uuid: Uuid,
                     flow: &Flow,
                     parent: Option<RunIndex>,
                     terminal: bool,
                     now: DateTime<Utc>)
                     -> RunIndex {
        let parent = parent.and_then(|p| self.runs.get(p.0).map(|r| (p, r.uuid)));
        self.runs.push(Run::new(run_uuid, flow.reference(), parent, terminal, now));
        RunIndex(self.runs.len() - 1)
    }

    /// Suspensión actual, presente sólo si la sesión espera.
    pub fn wait(&self) -> Option<&ActivatedWait> {
        self.wait.as_ref()
    }

    pub fn run(&self, index: RunIndex) -> Option<&Run> {
        self.runs.get(index.0)
    }

    pub fn find_run(&self, uuid: &Uuid) -> Option<RunIndex> {
        self.runs.iter().position(|r| &r.uuid == uuid).map(RunIndex)
    }

    /// Run hoja de la pila.
    pub fn current_run(&self) -> Option<&Run> {
        self.runs.last()
    }

    pub fn waiting_run(&self) -> Option<RunIndex> {
        self.runs
            .iter()
            .rposition(|r| r.status == RunStatus::Waiting)
            .map(RunIndex)
    }

    pub fn derive_status(&self) -> SessionStatus {
        let any = |status: RunStatus| self.runs.iter().any(|r| r.status == status);
        if any(RunStatus::Waiting) {
            SessionStatus::Waiting
        } else if any(RunStatus::Errored) {
            SessionStatus::Errored
        } else if any(RunStatus::Active) {
            SessionStatus::Active
        } else {
            SessionStatus::Completed
        }
    }

    /// Interrumpe todos los runs vivos y da la sesión por completada.
    pub fn interrupt(&mut self, engine: &Engine) {
        let now = engine.services().clock.now();
        for run in self.runs.iter_mut().filter(|r| !r.status.is_terminal()) {
            run.exit(RunStatus::Interrupted, now);
        }
        self.wait = None;
        self.status = SessionStatus::Completed;
    }

    /// Reconstruye los índices de padre a partir de `parent_uuid`. El padre
    /// siempre precede al hijo en la pila.
    pub(crate) fn link_runs(&mut self) -> Result<(), FlowError> {
        for i in 0..self.runs.len() {
            let parent = match self.runs[i].parent_uuid {
                None => None,
                Some(parent_uuid) => {
                    let index = self.runs[..i].iter()
                                              .position(|r| r.uuid == parent_uuid)
                                              .ok_or_else(|| {
                                                  FlowError::InvalidState(format!("run {} has unknown parent {}",
                                                                                  self.runs[i].uuid, parent_uuid))
                                              })?;
                    Some(RunIndex(index))
                }
            };
            self.runs[i].parent = parent;
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, FlowError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Hash de la forma canónica de la sesión.
    pub fn fingerprint(&self) -> Result<String, FlowError> {
        Ok(hash_value(&serde_json::to_value(self)?))
    }
}
