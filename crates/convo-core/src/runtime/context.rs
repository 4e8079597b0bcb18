//! Contexto de ejecución entregado a acciones, routers y waits.
//!
//! Encapsula el acceso mutable a la sesión y al sprint durante la visita a
//! un nodo. Todo evento pasa por `log_event`, que lo registra a la vez en
//! el run y en el sprint.
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde_json::{json, Value};
use uuid::Uuid;

use super::{Resume, Run, RunIndex, RunResult, RunStatus, Session, Sprint};
use crate::assets::SessionAssets;
use crate::config::EngineConfig;
use crate::definition::Flow;
use crate::engine::Engine;
use crate::errors::EvalError;
use crate::event::{Event, EventKind, Modifier};
use crate::model::{Contact, Environment};
use crate::utils::truncate_ellipsis;

pub struct ExecutionContext<'a> {
    pub(crate) engine: &'a Engine,
    pub(crate) assets: &'a dyn SessionAssets,
    pub(crate) session: &'a mut Session,
    pub(crate) sprint: &'a mut Sprint,
    pub(crate) flow: &'a Flow,
    pub(crate) run: RunIndex,
    pub(crate) node_uuid: Uuid,
    pub(crate) step_uuid: Option<Uuid>,
    pub(crate) resume: Option<&'a Resume>,
    pub(crate) pushed: Option<(RunIndex, Arc<Flow>)>,
}

impl<'a> ExecutionContext<'a> {
    pub fn session(&self) -> &Session {
        &*self.session
    }

    pub(crate) fn session_mut(&mut self) -> &mut Session {
        &mut *self.session
    }

    pub fn run_index(&self) -> RunIndex {
        self.run
    }

    pub fn run(&self) -> &Run {
        &self.session.runs[self.run.0]
    }

    fn run_mut(&mut self) -> &mut Run {
        &mut self.session.runs[self.run.0]
    }

    pub fn flow(&self) -> &Flow {
        self.flow
    }

    pub fn node_uuid(&self) -> Uuid {
        self.node_uuid
    }

    pub fn step_uuid(&self) -> Option<Uuid> {
        self.step_uuid
    }

    pub fn contact(&self) -> Option<&Contact> {
        self.session.contact.as_ref()
    }

    pub fn environment(&self) -> &Environment {
        &self.session.environment
    }

    pub fn config(&self) -> &EngineConfig {
        self.engine.config()
    }

    pub fn assets(&self) -> &dyn SessionAssets {
        self.assets
    }

    pub fn resume(&self) -> Option<&Resume> {
        self.resume
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.engine.services().clock.now()
    }

    pub fn new_uuid(&self) -> Uuid {
        self.engine.services().uuids.new_uuid()
    }

    pub fn random_index(&self, len: usize) -> usize {
        self.engine.services().random.index(len)
    }

    pub fn log_event(&mut self, kind: EventKind) {
        let event = Event::new(kind, self.now(), self.step_uuid);
        debug!("run {} logged {}", self.run().uuid, event.type_name());
        self.run_mut().log_event(event.clone());
        self.sprint.log_event(event);
    }

    /// Error recuperable: se registra y la ejecución continúa.
    pub fn log_error(&mut self, text: impl Into<String>) {
        let text = text.into();
        warn!("run {} error: {}", self.run().uuid, text);
        self.log_event(EventKind::Error { text });
    }

    /// Registra un evento `error` y termina el run como `errored`.
    pub fn error_run(&mut self, text: impl Into<String>) {
        self.log_error(text);
        self.exit_run(RunStatus::Errored);
    }

    /// Registra un evento `failure` y termina el run como `errored`.
    pub fn fail_run(&mut self, text: impl Into<String>) {
        let text = text.into();
        warn!("run {} failed: {}", self.run().uuid, text);
        self.log_event(EventKind::Failure { text });
        self.exit_run(RunStatus::Errored);
    }

    fn exit_run(&mut self, status: RunStatus) {
        let now = self.now();
        self.run_mut().exit(status, now);
    }

    /// Aplica un modifier al contacto y registra el evento resultante, si lo
    /// hay. Sin contacto, el cambio se descarta con un evento `error`.
    pub fn apply_modifier(&mut self, modifier: Modifier) {
        let max_field_chars = self.config().max_field_chars;
        let Some(contact) = self.session.contact.as_mut() else {
            self.log_error(format!("can't apply modifier of type {} in a session without a contact",
                                   modifier.type_name()));
            return;
        };
        let event = modifier.apply(contact, max_field_chars);
        self.sprint.log_modifier(modifier);
        if let Some(kind) = event {
            self.log_event(kind);
        }
    }

    /// Idiomas a probar al localizar textos del flow actual.
    pub fn languages(&self) -> Vec<String> {
        let contact_language = self.contact().and_then(|c| c.language.as_deref());
        self.environment().preferred_languages(contact_language)
    }

    pub fn localize(&self, item: &Uuid, key: &str) -> Option<String> {
        self.localize_all(item, key).and_then(|texts| texts.into_iter().next())
    }

    pub fn localize_all(&self, item: &Uuid, key: &str) -> Option<Vec<String>> {
        self.flow.localize(&self.languages(), item, key).map(<[String]>::to_vec)
    }

    fn child_context(&self) -> Value {
        self.session
            .runs
            .iter()
            .rev()
            .find(|r| r.parent() == Some(self.run))
            .map(Run::context)
            .unwrap_or(Value::Null)
    }

    fn parent_context(&self) -> Value {
        match self.run().parent() {
            Some(parent) => self.session.runs[parent.0].context(),
            None => self.session.trigger.run_summary().cloned().unwrap_or(Value::Null),
        }
    }

    /// Contexto completo contra el que se evalúan templates y tests.
    pub fn evaluation_context(&self) -> Value {
        let contact = self.contact();
        json!({
            "contact": contact.map(Contact::context).unwrap_or(Value::Null),
            "fields": contact.map(|c| json!(c.fields)).unwrap_or_else(|| json!({})),
            "input": self.session.input.as_ref().map(|i| i.context()).unwrap_or(Value::Null),
            "results": self.run().results_context(),
            "run": self.run().context(),
            "parent": self.parent_context(),
            "child": self.child_context(),
            "trigger": self.session.trigger.context(),
            "resume": self.resume.map(Resume::context).unwrap_or(Value::Null),
            "node": {"uuid": self.node_uuid},
            "environment": self.environment().context(),
            "config": self.config().context(),
        })
    }

    pub fn try_evaluate_template(&self, template: &str) -> Result<String, EvalError> {
        let context = self.evaluation_context();
        let value = self.engine.evaluator().evaluate_template(template, &context)?;
        Ok(truncate_ellipsis(&value, self.config().max_template_chars))
    }

    /// Evalúa un template registrando cualquier error como evento. Ante un
    /// error devuelve una cadena vacía.
    pub fn evaluate_template(&mut self, template: &str) -> String {
        match self.try_evaluate_template(template) {
            Ok(value) => value,
            Err(e) => {
                self.log_error(e.to_string());
                String::new()
            }
        }
    }

    pub fn evaluate_test(&self, test: &str, operand: &str, arguments: &[String]) -> Result<Option<String>, EvalError> {
        let context = self.evaluation_context();
        self.engine.evaluator().evaluate_test(test, operand, arguments, &context)
    }

    /// Guarda un resultado en el run actual y emite `run_result_changed`.
    pub fn save_result(&mut self,
                       name: &str,
                       value: &str,
                       category: &str,
                       category_localized: &str,
                       input: Option<String>) {
        let max = self.config().max_result_chars;
        let result = RunResult { name: name.to_string(),
                                 value: truncate_ellipsis(value, max),
                                 category: category.to_string(),
                                 category_localized: category_localized.to_string(),
                                 node_uuid: self.node_uuid,
                                 input: input.map(|i| truncate_ellipsis(&i, max)),
                                 created_on: self.now() };
        self.log_event(EventKind::RunResultChanged { name: result.name.clone(),
                                                     value: result.value.clone(),
                                                     category: result.category.clone(),
                                                     category_localized: result.category_localized.clone(),
                                                     input: result.input.clone() });
        self.run_mut().save_result(result);
    }

    /// Empuja `flow` como run hijo del run actual. El sprint entra en él al
    /// terminar la acción en curso; las acciones restantes del nodo no se
    /// ejecutan.
    pub fn push_flow(&mut self, flow: Arc<Flow>, terminal: bool) -> RunIndex {
        let uuid = self.new_uuid();
        let now = self.now();
        let parent = self.run;
        let index = self.session.push_flow(uuid, &flow, Some(parent), terminal, now);
        self.log_event(EventKind::FlowEntered { flow: flow.reference(),
                                                parent_run_uuid: Some(self.run().uuid),
                                                terminal });
        debug!("run {} pushed flow {} (terminal={})", self.run().uuid, flow.uuid(), terminal);
        self.pushed = Some((index, flow));
        index
    }
}
