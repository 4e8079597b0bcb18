//! Utilidades compartidas por los tests de integración del core: un
//! evaluador mínimo, dos acciones de prueba y constructores de flows.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use convo_core::definition::FlowType;
use convo_core::errors::EvalError;
use convo_core::event::EventKind;
use convo_core::model::{Contact, FlowReference, MsgIn, MsgOut};
use convo_core::{Action, ActionRegistry, Engine, Evaluator, ExecutionContext, Flow, FlowError, Services, StaticAssets};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

pub const FLOW: &str = "11111111-0000-4000-8000-000000000000";
pub const CHILD_FLOW: &str = "22222222-0000-4000-8000-000000000000";
pub const NODE_A: &str = "aaaaaaaa-0000-4000-8000-000000000001";
pub const NODE_B: &str = "bbbbbbbb-0000-4000-8000-000000000002";
pub const NODE_C: &str = "cccccccc-0000-4000-8000-000000000003";
pub const CAT_YES: &str = "c0000000-0000-4000-8000-0000000000a1";
pub const CAT_NO: &str = "c0000000-0000-4000-8000-0000000000a2";
pub const CAT_TIMEOUT: &str = "c0000000-0000-4000-8000-0000000000a3";
pub const EXIT_1: &str = "e0000000-0000-4000-8000-000000000001";
pub const EXIT_2: &str = "e0000000-0000-4000-8000-000000000002";
pub const EXIT_3: &str = "e0000000-0000-4000-8000-000000000003";
pub const EXIT_4: &str = "e0000000-0000-4000-8000-000000000004";

pub fn uuid(s: &str) -> Uuid {
    s.parse().unwrap()
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

static NULL: Value = Value::Null;

/// Resuelve `@a.b.c` contra el contexto; cualquier otro texto es literal.
#[derive(Debug, Default)]
pub struct PathEvaluator;

impl Evaluator for PathEvaluator {
    fn evaluate_template(&self, template: &str, context: &Value) -> Result<String, EvalError> {
        let Some(path) = template.strip_prefix('@') else {
            return Ok(template.to_string());
        };
        let mut current = context;
        for part in path.split('.') {
            current = current.get(part).unwrap_or(&NULL);
        }
        Ok(match current {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    fn evaluate_test(&self,
                     test: &str,
                     operand: &str,
                     arguments: &[String],
                     _context: &Value)
                     -> Result<Option<String>, EvalError> {
        match test {
            "has_any_word" => {
                let words: Vec<String> = operand.split_whitespace().map(str::to_lowercase).collect();
                Ok(arguments.iter()
                            .flat_map(|a| a.split_whitespace())
                            .map(str::to_lowercase)
                            .find(|w| words.contains(w)))
            }
            "is_text_eq" => Ok(arguments.first().filter(|a| a.as_str() == operand).cloned()),
            other => Err(EvalError::UnknownTest(other.to_string())),
        }
    }
}

/// Acción de prueba: crea un mensaje saliente con el texto evaluado.
#[derive(Debug, Deserialize)]
pub struct SendText {
    uuid: Uuid,
    text: String,
}

impl Action for SendText {
    fn uuid(&self) -> Uuid {
        self.uuid
    }
    fn type_name(&self) -> &'static str {
        "send_text"
    }
    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), FlowError> {
        let text = ctx.evaluate_template(&self.text);
        let msg = MsgOut { uuid: ctx.new_uuid(),
                           urn: None,
                           text,
                           attachments: vec![],
                           quick_replies: vec![] };
        ctx.log_event(EventKind::MsgCreated { msg });
        Ok(())
    }
}

/// Acción de prueba: entra en un sub-flow.
#[derive(Debug, Deserialize)]
pub struct EnterFlow {
    uuid: Uuid,
    flow: FlowReference,
    #[serde(default)]
    terminal: bool,
}

impl Action for EnterFlow {
    fn uuid(&self) -> Uuid {
        self.uuid
    }
    fn type_name(&self) -> &'static str {
        "enter_flow"
    }
    fn allowed_flow_types(&self) -> &'static [FlowType] {
        &[FlowType::Messaging, FlowType::Voice]
    }
    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), FlowError> {
        match ctx.assets().flow(&self.flow.uuid) {
            Some(flow) => {
                ctx.push_flow(flow, self.terminal);
            }
            None => ctx.error_run(format!("missing flow {}", self.flow.uuid)),
        }
        Ok(())
    }
}

pub fn registry() -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    registry.register::<SendText>("send_text")
            .register::<EnterFlow>("enter_flow");
    registry
}

pub fn engine() -> Engine {
    Engine::builder().with_evaluator(Arc::new(PathEvaluator))
                     .with_services(Services::deterministic(t0(), 7))
                     .build()
}

pub fn contact() -> Contact {
    let mut c = Contact::new(uuid("5d76d86b-3bb9-4d5a-b822-c9d86f5d8e4f"), "Ryan Lewis", t0());
    c.language = Some("eng".into());
    c.urns = vec!["tel:+12065551212".into()];
    c
}

pub fn assets(flows: Vec<Value>) -> StaticAssets {
    let registry = registry();
    let mut assets = StaticAssets::new();
    for flow in flows {
        assets.add_flow(Flow::from_value(&registry, flow).unwrap());
    }
    assets
}

pub fn flow_ref(uuid_str: &str) -> FlowReference {
    FlowReference::new(uuid(uuid_str), "Test")
}

pub fn msg(text: &str) -> MsgIn {
    MsgIn::new(Uuid::from_u128(0x1000 + text.len() as u128), text)
}

/// Nodo A espera un mensaje y rutea por `has_any_word(yes)`; ambas
/// categorías llevan a B, que termina el flow.
pub fn yes_no_flow(timeout: bool) -> Value {
    let mut categories = vec![json!({"uuid": CAT_YES, "name": "Yes", "exit_uuid": EXIT_1}),
                              json!({"uuid": CAT_NO, "name": "No", "exit_uuid": EXIT_2})];
    let mut exits = vec![json!({"uuid": EXIT_1, "destination_uuid": NODE_B}),
                         json!({"uuid": EXIT_2, "destination_uuid": NODE_B})];
    let mut wait = json!({"type": "msg"});
    if timeout {
        categories.push(json!({"uuid": CAT_TIMEOUT, "name": "Timeout", "exit_uuid": EXIT_4}));
        exits.push(json!({"uuid": EXIT_4}));
        wait["timeout"] = json!({"seconds": 300, "category_uuid": CAT_TIMEOUT});
    }
    json!({
        "uuid": FLOW,
        "name": "Yes or No",
        "language": "eng",
        "type": "messaging",
        "nodes": [
            {
                "uuid": NODE_A,
                "actions": [],
                "router": {
                    "type": "switch",
                    "result_name": "Answer",
                    "operand": "@input.text",
                    "wait": wait,
                    "cases": [{"uuid": "ca5e0000-0000-4000-8000-000000000001", "type": "has_any_word", "arguments": ["yes"], "category_uuid": CAT_YES}],
                    "categories": categories,
                    "default_category_uuid": CAT_NO
                },
                "exits": exits
            },
            {"uuid": NODE_B, "exits": [{"uuid": EXIT_3}]}
        ]
    })
}

/// Flow padre que entra en `CHILD_FLOW`; el hijo es `yes_no_flow` y espera
/// en su nodo A.
pub fn parent_with_waiting_child() -> Vec<Value> {
    let parent = json!({
        "uuid": FLOW,
        "name": "Parent",
        "type": "messaging",
        "nodes": [{
            "uuid": NODE_C,
            "actions": [{"type": "enter_flow", "uuid": "ac000000-0000-4000-8000-0000000000f1",
                         "flow": {"uuid": CHILD_FLOW, "name": "Child"}}],
            "router": {
                "type": "switch",
                "operand": "@child.status",
                "cases": [],
                "categories": [{"uuid": CAT_NO, "name": "Any", "exit_uuid": EXIT_4}],
                "default_category_uuid": CAT_NO
            },
            "exits": [{"uuid": EXIT_4}]
        }]
    });
    let mut child = yes_no_flow(false);
    child["uuid"] = json!(CHILD_FLOW);
    vec![parent, child]
}
