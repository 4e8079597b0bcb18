//! Sprint: ráfaga acotada de ejecución entre un start/resume y la siguiente
//! suspensión o finalización.
//!
//! `SprintDriver` es el bucle principal. No detecta ciclos: cada visita a
//! un nodo consume un paso del presupuesto `max_steps_per_sprint`, y al
//! superarlo el sprint entero aborta con `StepBudgetExceeded`.
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use uuid::Uuid;

use super::{ActivatedWait, ExecutionContext, Resume, RunIndex, RunStatus, Session, SessionStatus};
use crate::assets::SessionAssets;
use crate::definition::Flow;
use crate::engine::Engine;
use crate::errors::{FlowError, RoutingError};
use crate::event::{Event, EventKind, Modifier};

/// Tramo recorrido: salida de un nodo hacia su destino.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub flow_uuid: Uuid,
    pub node_uuid: Uuid,
    pub exit_uuid: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_uuid: Option<Uuid>,
    pub time: DateTime<Utc>,
}

/// Salida de un start/resume. No se persiste.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sprint {
    events: Vec<Event>,
    modifiers: Vec<Modifier>,
    segments: Vec<Segment>,
}

impl Sprint {
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Tipos de evento en orden; útil en tests y logs.
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.iter().map(Event::type_name).collect()
    }

    pub(crate) fn log_event(&mut self, event: Event) {
        self.events.push(event);
    }

    pub(crate) fn log_modifier(&mut self, modifier: Modifier) {
        self.modifiers.push(modifier);
    }

    pub(crate) fn log_segment(&mut self, segment: Segment) {
        self.segments.push(segment);
    }
}

enum Next {
    /// Entrar al primer nodo de un run recién creado.
    Enter(RunIndex, Arc<Flow>),
    Visit(RunIndex, Arc<Flow>, Uuid),
    /// El run terminó; devolver el control a su padre.
    Finish(RunIndex),
    Wait,
    Done,
}

pub(crate) struct SprintDriver<'a> {
    engine: &'a Engine,
    assets: &'a dyn SessionAssets,
    session: &'a mut Session,
    sprint: Sprint,
    resume: Option<Resume>,
    steps: usize,
}

impl<'a> SprintDriver<'a> {
    pub(crate) fn new(engine: &'a Engine, assets: &'a dyn SessionAssets, session: &'a mut Session) -> Self {
        Self { engine,
               assets,
               session,
               sprint: Sprint::default(),
               resume: None,
               steps: 0 }
    }

    fn now(&self) -> DateTime<Utc> {
        self.engine.services().clock.now()
    }

    fn new_uuid(&self) -> Uuid {
        self.engine.services().uuids.new_uuid()
    }

    fn context<'s>(&'s mut self,
                   run: RunIndex,
                   flow: &'s Flow,
                   node_uuid: Uuid,
                   step_uuid: Option<Uuid>)
                   -> ExecutionContext<'s> {
        ExecutionContext { engine: self.engine,
                           assets: self.assets,
                           session: &mut *self.session,
                           sprint: &mut self.sprint,
                           flow,
                           run,
                           node_uuid,
                           step_uuid,
                           resume: self.resume.as_ref(),
                           pushed: None }
    }

    fn log_run_event(&mut self, run: RunIndex, step_uuid: Option<Uuid>, kind: EventKind) {
        let event = Event::new(kind, self.now(), step_uuid);
        self.session.runs[run.0].log_event(event.clone());
        self.sprint.log_event(event);
    }

    fn exit_run(&mut self, run: RunIndex, status: RunStatus) {
        let now = self.now();
        self.session.runs[run.0].exit(status, now);
    }

    fn error_run(&mut self, run: RunIndex, step_uuid: Option<Uuid>, text: String) {
        warn!("run {} errored: {}", self.session.runs[run.0].uuid, text);
        self.log_run_event(run, step_uuid, EventKind::Error { text });
        self.exit_run(run, RunStatus::Errored);
    }

    /// Crea el run raíz y ejecuta hasta esperar o terminar.
    pub(crate) fn start(mut self, flow: Arc<Flow>) -> Result<Sprint, FlowError> {
        let now = self.now();
        let uuid = self.new_uuid();
        let root = self.session.push_flow(uuid, &flow, None, false, now);
        self.continue_until_wait(Next::Enter(root, flow))?;
        Ok(self.finish())
    }

    /// Continúa la sesión desde el nodo del run en espera.
    pub(crate) fn resume(mut self, resume: Resume) -> Result<Sprint, FlowError> {
        let index = self.session
                        .waiting_run()
                        .ok_or_else(|| FlowError::InvalidState("session has no waiting run".into()))?;
        let (node_uuid, step_uuid) = {
            let run = &self.session.runs[index.0];
            let step = run.current_step()
                          .ok_or_else(|| FlowError::InvalidState(format!("waiting run {} has an empty path", run.uuid)))?;
            (step.node_uuid, step.uuid)
        };
        self.session.wait = None;

        let max = self.engine.config().max_resumes_per_session;
        if self.session.resume_count >= max {
            let text = format!("reached maximum number of resumes per session ({max})");
            warn!("session {}: {}", self.session.uuid, text);
            self.log_run_event(index, Some(step_uuid), EventKind::Failure { text });
            self.fail_stack(index);
            return Ok(self.finish());
        }
        self.session.resume_count += 1;

        let now = self.now();
        self.session.runs[index.0].set_status(RunStatus::Active, now);
        self.session.status = SessionStatus::Active;
        self.resume = Some(resume);
        debug!("session {} resumed at node {}", self.session.uuid, node_uuid);

        let flow_uuid = self.session.runs[index.0].flow.uuid;
        let next = match self.assets.flow(&flow_uuid) {
            None => {
                self.error_run(index, Some(step_uuid), format!("missing flow {flow_uuid}"));
                Next::Finish(index)
            }
            Some(flow) if flow.node(&node_uuid).is_none() => {
                self.error_run(index, Some(step_uuid), format!("missing node {node_uuid} in flow {flow_uuid}"));
                Next::Finish(index)
            }
            Some(flow) => {
                let (expire, timeout) = {
                    let mut ctx = self.context(index, &flow, node_uuid, Some(step_uuid));
                    let resume = ctx.resume;
                    if let Some(resume) = resume {
                        resume.apply(&mut ctx);
                    }
                    (resume.is_some_and(Resume::is_expiration), resume.is_some_and(Resume::is_timeout))
                };
                if expire {
                    self.expire_runs(index);
                    Next::Done
                } else {
                    self.route_node(index, flow, node_uuid, Some(step_uuid), timeout)?
                }
            }
        };

        self.continue_until_wait(next)?;
        Ok(self.finish())
    }

    /// Termina como `errored` el run y todos sus ancestros vivos.
    fn fail_stack(&mut self, from: RunIndex) {
        let mut current = Some(from);
        while let Some(index) = current {
            if !self.session.runs[index.0].status.is_terminal() {
                self.exit_run(index, RunStatus::Errored);
            }
            current = self.session.runs[index.0].parent();
        }
    }

    /// Expira el run en espera y todos sus ancestros.
    fn expire_runs(&mut self, from: RunIndex) {
        let mut current = Some(from);
        while let Some(index) = current {
            let run_uuid = self.session.runs[index.0].uuid;
            if !self.session.runs[index.0].status.is_terminal() {
                let step = self.session.runs[index.0].current_step().map(|s| s.uuid);
                self.log_run_event(index, step, EventKind::RunExpired { run_uuid });
                self.exit_run(index, RunStatus::Expired);
            }
            current = self.session.runs[index.0].parent();
        }
    }

    fn continue_until_wait(&mut self, mut next: Next) -> Result<(), FlowError> {
        loop {
            next = match next {
                Next::Enter(run, flow) => self.enter(run, flow),
                Next::Visit(run, flow, node_uuid) => {
                    self.steps += 1;
                    let limit = self.engine.config().max_steps_per_sprint;
                    if self.steps > limit {
                        warn!("session {} exceeded {} steps in a sprint", self.session.uuid, limit);
                        return Err(FlowError::StepBudgetExceeded { limit });
                    }
                    self.visit_node(run, flow, node_uuid)?
                }
                Next::Finish(run) => self.return_to_parent(run)?,
                Next::Wait | Next::Done => return Ok(()),
            };
        }
    }

    fn enter(&mut self, run: RunIndex, flow: Arc<Flow>) -> Next {
        match flow.first_node().map(|n| n.uuid) {
            Some(first) => Next::Visit(run, flow, first),
            None => {
                debug!("flow {} has no nodes", flow.uuid());
                self.exit_run(run, RunStatus::Completed);
                Next::Finish(run)
            }
        }
    }

    fn visit_node(&mut self, run: RunIndex, flow: Arc<Flow>, node_uuid: Uuid) -> Result<Next, FlowError> {
        let node = flow.node(&node_uuid)
                       .ok_or_else(|| FlowError::Internal(format!("node {node_uuid} not in flow {}", flow.uuid())))?;
        debug!("run {} visiting node {}", self.session.runs[run.0].uuid, node_uuid);

        let now = self.now();
        let step_uuid = self.new_uuid();
        self.session.runs[run.0].create_step(step_uuid, node_uuid, now);

        for action in &node.actions {
            let (status, pushed) = {
                let mut ctx = self.context(run, &flow, node_uuid, Some(step_uuid));
                action.execute(&mut ctx)?;
                (ctx.run().status, ctx.pushed.take())
            };
            if let Some((child, child_flow)) = pushed {
                return Ok(Next::Enter(child, child_flow));
            }
            if status.is_terminal() {
                return Ok(Next::Finish(run));
            }
        }

        if let Some(wait) = node.router.as_ref().and_then(|r| r.wait()) {
            let activated = {
                let mut ctx = self.context(run, &flow, node_uuid, Some(step_uuid));
                wait.begin(&mut ctx)
            };
            if let Some(activated) = activated {
                self.begin_wait(run, &flow, activated);
                return Ok(Next::Wait);
            }
        }

        self.route_node(run, flow, node_uuid, Some(step_uuid), false)
    }

    fn begin_wait(&mut self, run: RunIndex, flow: &Flow, activated: ActivatedWait) {
        let now = self.now();
        let run = &mut self.session.runs[run.0];
        run.set_status(RunStatus::Waiting, now);
        if flow.expire_after_minutes() > 0 {
            run.expires_on = Some(now + Duration::minutes(i64::from(flow.expire_after_minutes())));
        }
        debug!("run {} waiting ({})", run.uuid, activated.type_name());
        self.session.wait = Some(activated);
    }

    /// Evalúa el router del nodo (sin volver a ejecutar acciones) y sigue
    /// la salida elegida. Un nodo sin router sale por su primera salida.
    fn route_node(&mut self,
                  run: RunIndex,
                  flow: Arc<Flow>,
                  node_uuid: Uuid,
                  step_uuid: Option<Uuid>,
                  timeout: bool)
                  -> Result<Next, FlowError> {
        let Some(node) = flow.node(&node_uuid) else {
            self.error_run(run, step_uuid, format!("missing node {node_uuid} in flow {}", flow.uuid()));
            return Ok(Next::Finish(run));
        };

        let routed = match &node.router {
            None => node.default_exit()
                        .map(|e| e.uuid)
                        .ok_or(RoutingError::NoCategories),
            Some(router) => {
                let mut ctx = self.context(run, &flow, node_uuid, step_uuid);
                if timeout {
                    router.route_timeout(&mut ctx)
                } else {
                    router.route(&mut ctx)
                }
            }
        };

        match routed {
            Ok(exit_uuid) => self.leave_node(run, flow, node_uuid, exit_uuid, step_uuid),
            Err(e) => {
                self.error_run(run, step_uuid, e.to_string());
                Ok(Next::Finish(run))
            }
        }
    }

    fn leave_node(&mut self,
                  run: RunIndex,
                  flow: Arc<Flow>,
                  node_uuid: Uuid,
                  exit_uuid: Uuid,
                  step_uuid: Option<Uuid>)
                  -> Result<Next, FlowError> {
        let destination = match flow.node(&node_uuid).and_then(|n| n.exit(&exit_uuid)) {
            Some(exit) => exit.destination_uuid,
            None => {
                self.error_run(run, step_uuid, RoutingError::UnknownExit(exit_uuid).to_string());
                return Ok(Next::Finish(run));
            }
        };

        let now = self.now();
        self.session.runs[run.0].leave_step(exit_uuid, now);
        self.sprint.log_segment(Segment { flow_uuid: flow.uuid(),
                                          node_uuid,
                                          exit_uuid,
                                          destination_uuid: destination,
                                          time: now });

        match destination {
            Some(next_node) => Ok(Next::Visit(run, flow, next_node)),
            None => {
                self.session.runs[run.0].exit(RunStatus::Completed, now);
                debug!("run {} completed", self.session.runs[run.0].uuid);
                Ok(Next::Finish(run))
            }
        }
    }

    /// Un run terminó: si tiene padre, el padre continúa en su nodo actual
    /// (evaluando el router, que puede mirar `@child`). Un hijo terminal
    /// arrastra al padre con el mismo estado.
    fn return_to_parent(&mut self, child: RunIndex) -> Result<Next, FlowError> {
        let (child_status, terminal, parent) = {
            let run = &self.session.runs[child.0];
            (run.status, run.terminal, run.parent())
        };
        let Some(parent) = parent else {
            return Ok(Next::Done);
        };
        if self.session.runs[parent.0].status.is_terminal() {
            return Ok(Next::Finish(parent));
        }
        if terminal {
            let status = match child_status {
                RunStatus::Active | RunStatus::Waiting => RunStatus::Completed,
                other => other,
            };
            self.exit_run(parent, status);
            return Ok(Next::Finish(parent));
        }

        let (flow_uuid, location) = {
            let run = &self.session.runs[parent.0];
            (run.flow.uuid, run.current_step().map(|s| (s.node_uuid, s.uuid)))
        };
        let Some((node_uuid, step_uuid)) = location else {
            return Err(FlowError::Internal(format!("parent run {} has an empty path", self.session.runs[parent.0].uuid)));
        };
        let Some(flow) = self.assets.flow(&flow_uuid) else {
            self.error_run(parent, Some(step_uuid), format!("missing flow {flow_uuid}"));
            return Ok(Next::Finish(parent));
        };
        debug!("returning to run {} at node {}", self.session.runs[parent.0].uuid, node_uuid);
        self.route_node(parent, flow, node_uuid, Some(step_uuid), false)
    }

    fn finish(mut self) -> Sprint {
        self.session.status = self.session.derive_status();
        match self.session.status {
            SessionStatus::Completed => info!("session {} completed", self.session.uuid),
            SessionStatus::Errored => info!("session {} errored", self.session.uuid),
            _ => {}
        }
        self.sprint
    }
}
