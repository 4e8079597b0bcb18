#![allow(dead_code)]
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use convoflow::convo_core::model::{Contact, MsgIn};
use convoflow::convo_core::{MissingAssetPolicy, Services};
use convoflow::{Engine, Resume, Session, SimpleEvaluator, StaticAssets};
use uuid::Uuid;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
}

pub fn engine() -> Engine {
    Engine::builder().with_evaluator(Arc::new(SimpleEvaluator))
                     .with_services(Services::deterministic(t0(), 11))
                     .with_max_steps_per_sprint(100)
                     .build()
}

pub fn contact() -> Contact {
    let mut c = Contact::new(Uuid::from_u128(0xC0), "Marta Ruiz", t0());
    c.language = Some("spa".into());
    c.urns = vec!["tel:+593987654321".into()];
    c
}

pub fn reply(text: &str, n: u128) -> Resume {
    Resume::msg(MsgIn::new(Uuid::from_u128(0xA000 + n), text), t0())
}

/// Persiste la sesión y la vuelve a leer, como haría un caller entre sprints.
pub fn reload(engine: &Engine, assets: &StaticAssets, session: &Session) -> Session {
    let json = session.to_json().unwrap();
    let (session, missing) = engine.read_session(assets, json.as_bytes(), MissingAssetPolicy::Abort).unwrap();
    assert!(missing.is_empty());
    session
}
