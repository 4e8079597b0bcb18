mod common;

use common::{contact, engine, reload, reply, t0};
use convoflow::convo_core::model::FlowReference;
use convoflow::convo_core::{ActivatedWait, RunStatus};
use convoflow::{load_assets, SessionStatus, StaticAssets, Trigger};
use rstest::rstest;
use serde_json::json;

const FLOW: &str = "5e5f0000-0000-4000-8000-000000000001";
const NODE_A: &str = "5e5f0000-0000-4000-8000-0000000000a1";
const NODE_B: &str = "5e5f0000-0000-4000-8000-0000000000b1";

fn assets() -> StaticAssets {
    let data = json!({
        "flows": [{
            "uuid": FLOW,
            "name": "Confirmation",
            "language": "eng",
            "type": "messaging",
            "nodes": [
                {
                    "uuid": NODE_A,
                    "actions": [],
                    "router": {
                        "type": "switch",
                        "result_name": "Confirmed",
                        "operand": "@input.text",
                        "wait": {"type": "msg"},
                        "cases": [{"uuid": "5e5f0000-0000-4000-8000-0000000000c1", "type": "has_any_word", "arguments": ["yes"], "category_uuid": "5e5f0000-0000-4000-8000-0000000000d1"}],
                        "categories": [
                            {"uuid": "5e5f0000-0000-4000-8000-0000000000d1", "name": "Yes", "exit_uuid": "5e5f0000-0000-4000-8000-0000000000e1"},
                            {"uuid": "5e5f0000-0000-4000-8000-0000000000d2", "name": "No", "exit_uuid": "5e5f0000-0000-4000-8000-0000000000e2"}
                        ],
                        "default_category_uuid": "5e5f0000-0000-4000-8000-0000000000d2"
                    },
                    "exits": [
                        {"uuid": "5e5f0000-0000-4000-8000-0000000000e1", "destination_uuid": NODE_B},
                        {"uuid": "5e5f0000-0000-4000-8000-0000000000e2", "destination_uuid": NODE_B}
                    ]
                },
                {"uuid": NODE_B, "exits": [{"uuid": "5e5f0000-0000-4000-8000-0000000000e3"}]}
            ]
        }]
    });
    load_assets(&data.to_string()).unwrap()
}

fn trigger() -> Trigger {
    Trigger::manual(FlowReference::new(FLOW.parse().unwrap(), "Confirmation"), Some(contact()), t0())
}

#[rstest]
#[case("yes", "yes", "Yes")]
#[case("Yes please!", "yes", "Yes")]
#[case("no thanks", "no thanks", "No")]
fn reply_is_categorized(#[case] text: &str, #[case] value: &str, #[case] category: &str) {
    let engine = engine();
    let assets = assets();

    let (session, sprint) = engine.new_session(&assets, trigger()).unwrap();
    assert_eq!(session.status, SessionStatus::Waiting);
    assert_eq!(sprint.event_types(), vec!["msg_wait"]);
    assert!(matches!(session.wait, Some(ActivatedWait::Msg { .. })));
    assert_eq!(session.runs[0].current_node_uuid(), Some(NODE_A.parse().unwrap()));

    let mut session = reload(&engine, &assets, &session);
    let sprint = session.resume(&engine, &assets, reply(text, 1)).unwrap();

    assert_eq!(session.status, SessionStatus::Completed);
    assert!(session.wait.is_none());
    assert_eq!(sprint.event_types(), vec!["msg_received", "run_result_changed"]);

    let run = &session.runs[0];
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.path.len(), 2);
    assert_eq!(run.path[1].node_uuid, NODE_B.parse::<uuid::Uuid>().unwrap());

    let result = run.result("confirmed").unwrap();
    assert_eq!(result.value, value);
    assert_eq!(result.category, category);
    assert_eq!(result.input.as_deref(), Some(text));
}

#[test]
fn persisted_session_keeps_the_stable_field_set() {
    let engine = engine();
    let (session, _) = engine.new_session(&assets(), trigger()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&session.to_json().unwrap()).unwrap();

    for key in ["uuid", "status", "trigger", "environment", "contact", "runs", "wait"] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value["status"], "waiting");
    let run = &value["runs"][0];
    for key in ["uuid", "flow", "status", "path", "results", "created_on", "modified_on"] {
        assert!(run.get(key).is_some(), "missing run.{key}");
    }
    assert_eq!(run["path"][0]["node_uuid"], NODE_A);
}

#[test]
fn replaying_the_conversation_is_deterministic() {
    let play = || {
        let engine = engine();
        let assets = assets();
        let (mut session, _) = engine.new_session(&assets, trigger()).unwrap();
        session.resume(&engine, &assets, reply("yes", 1)).unwrap();
        session.fingerprint().unwrap()
    };
    assert_eq!(play(), play());
}
