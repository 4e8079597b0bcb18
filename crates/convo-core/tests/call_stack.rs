//! Pila de runs: sub-flows terminales y no terminales.
mod common;

use common::*;
use convo_core::{EventKind, RunStatus, SessionStatus, Trigger};
use serde_json::{json, Value};

fn parent_flow(terminal: bool) -> Value {
    json!({
        "uuid": FLOW,
        "name": "Parent",
        "type": "messaging",
        "nodes": [
            {
                "uuid": NODE_A,
                "actions": [
                    {"type": "enter_flow", "uuid": "ac000000-0000-4000-8000-000000000001",
                     "flow": {"uuid": CHILD_FLOW, "name": "Child"}, "terminal": terminal},
                    {"type": "send_text", "uuid": "ac000000-0000-4000-8000-000000000002", "text": "skipped"}
                ],
                "router": {
                    "type": "switch",
                    "result_name": "Child Status",
                    "operand": "@child.status",
                    "cases": [{"uuid": "ca5e0000-0000-4000-8000-000000000001", "type": "is_text_eq", "arguments": ["completed"], "category_uuid": CAT_YES}],
                    "categories": [{"uuid": CAT_YES, "name": "Complete", "exit_uuid": EXIT_1},
                                   {"uuid": CAT_NO, "name": "Other", "exit_uuid": EXIT_2}],
                    "default_category_uuid": CAT_NO
                },
                "exits": [{"uuid": EXIT_1, "destination_uuid": NODE_B}, {"uuid": EXIT_2}]
            },
            {
                "uuid": NODE_B,
                "actions": [{"type": "send_text", "uuid": "ac000000-0000-4000-8000-000000000003", "text": "back in parent"}],
                "exits": [{"uuid": EXIT_3}]
            }
        ]
    })
}

fn child_flow() -> Value {
    json!({
        "uuid": CHILD_FLOW,
        "name": "Child",
        "type": "messaging",
        "nodes": [{
            "uuid": NODE_C,
            "actions": [{"type": "send_text", "uuid": "ac000000-0000-4000-8000-000000000004", "text": "in child"}],
            "exits": [{"uuid": EXIT_4}]
        }]
    })
}

fn sent_texts(events: &[convo_core::Event]) -> Vec<String> {
    events.iter()
          .filter_map(|e| match &e.kind {
              EventKind::MsgCreated { msg } => Some(msg.text.clone()),
              _ => None,
          })
          .collect()
}

#[test]
fn completed_child_returns_to_parent_router() {
    let engine = engine();
    let assets = assets(vec![parent_flow(false), child_flow()]);
    let (session, sprint) = engine.new_session(&assets, Trigger::manual(flow_ref(FLOW), None, t0())).unwrap();

    assert_eq!(session.runs.len(), 2);
    assert_eq!(session.runs[1].parent_uuid, Some(session.runs[0].uuid));
    assert_eq!(session.runs[1].parent().map(|p| p.get()), Some(0));
    assert_eq!(session.runs[1].status, RunStatus::Completed);
    assert_eq!(session.runs[0].status, RunStatus::Completed);
    assert_eq!(session.runs[0].results["child_status"].category, "Complete");
    assert_eq!(sent_texts(sprint.events()), vec!["in child", "back in parent"]);
    assert_eq!(sprint.event_types()[0], "flow_entered");
    assert_eq!(session.status, SessionStatus::Completed);
}

#[test]
fn terminal_child_completes_the_parent_without_routing() {
    let engine = engine();
    let assets = assets(vec![parent_flow(true), child_flow()]);
    let (session, sprint) = engine.new_session(&assets, Trigger::manual(flow_ref(FLOW), None, t0())).unwrap();

    assert!(session.runs[1].terminal);
    assert_eq!(session.runs[0].status, RunStatus::Completed);
    assert!(session.runs[0].results.is_empty());
    assert_eq!(session.runs[0].path.len(), 1);
    assert_eq!(sent_texts(sprint.events()), vec!["in child"]);
    assert_eq!(session.status, SessionStatus::Completed);
}

#[test]
fn child_waiting_suspends_the_whole_session() {
    let engine = engine();
    let mut child = yes_no_flow(false);
    child["uuid"] = json!(CHILD_FLOW);
    let assets = assets(vec![parent_flow(false), child]);

    let (mut session, _) = engine.new_session(&assets, Trigger::manual(flow_ref(FLOW), None, t0())).unwrap();
    assert_eq!(session.status, SessionStatus::Waiting);
    assert_eq!(session.runs[0].status, RunStatus::Active);
    assert_eq!(session.runs[1].status, RunStatus::Waiting);

    let json = session.to_json().unwrap();
    let (mut session, _) = engine.read_session(&assets, json.as_bytes(), Default::default()).unwrap();
    let sprint = session.resume(&engine, &assets, convo_core::Resume::msg(msg("yes"), t0())).unwrap();
    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(session.runs[1].results["answer"].category, "Yes");
    assert_eq!(session.runs[0].results["child_status"].category, "Complete");
    assert_eq!(sent_texts(sprint.events()), vec!["back in parent"]);
}

#[test]
fn missing_child_flow_errors_the_parent_run() {
    let engine = engine();
    let assets = assets(vec![parent_flow(false)]);
    let (session, sprint) = engine.new_session(&assets, Trigger::manual(flow_ref(FLOW), None, t0())).unwrap();

    assert_eq!(session.runs.len(), 1);
    assert_eq!(session.runs[0].status, RunStatus::Errored);
    assert_eq!(sprint.event_types(), vec!["error"]);
    assert_eq!(session.status, SessionStatus::Errored);
}
