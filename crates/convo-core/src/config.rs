//! Límites del engine, fijos una vez construido.
//!
//! `from_env` lee variables `CONVO_*` (cargando `.env` una sola vez) y cae a
//! los valores por defecto si faltan o no parsean.

use std::env;
use std::str::FromStr;

use dotenvy::dotenv;
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::constants::{DEFAULT_MAX_FIELD_CHARS, DEFAULT_MAX_RESULT_CHARS, DEFAULT_MAX_RESUMES_PER_SESSION,
                       DEFAULT_MAX_STEPS_PER_SPRINT, DEFAULT_MAX_TEMPLATE_CHARS};

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Nodos visitables en un sprint antes de abortar.
    pub max_steps_per_sprint: usize,
    pub max_resumes_per_session: usize,
    pub max_template_chars: usize,
    pub max_field_chars: usize,
    pub max_result_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_steps_per_sprint: DEFAULT_MAX_STEPS_PER_SPRINT,
               max_resumes_per_session: DEFAULT_MAX_RESUMES_PER_SESSION,
               max_template_chars: DEFAULT_MAX_TEMPLATE_CHARS,
               max_field_chars: DEFAULT_MAX_FIELD_CHARS,
               max_result_chars: DEFAULT_MAX_RESULT_CHARS }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        let d = Self::default();
        Self { max_steps_per_sprint: env_or("CONVO_MAX_STEPS_PER_SPRINT", d.max_steps_per_sprint),
               max_resumes_per_session: env_or("CONVO_MAX_RESUMES_PER_SESSION", d.max_resumes_per_session),
               max_template_chars: env_or("CONVO_MAX_TEMPLATE_CHARS", d.max_template_chars),
               max_field_chars: env_or("CONVO_MAX_FIELD_CHARS", d.max_field_chars),
               max_result_chars: env_or("CONVO_MAX_RESULT_CHARS", d.max_result_chars) }
    }

    /// Límites visibles desde templates (`@config`).
    pub fn context(&self) -> Value {
        json!({
            "max_template_chars": self.max_template_chars,
            "max_field_chars": self.max_field_chars,
            "max_result_chars": self.max_result_chars,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"max_steps_per_sprint": 50}"#).unwrap();
        assert_eq!(cfg.max_steps_per_sprint, 50);
        assert_eq!(cfg.max_resumes_per_session, DEFAULT_MAX_RESUMES_PER_SESSION);
    }

    #[test]
    fn invalid_env_values_fall_back() {
        env::set_var("CONVO_MAX_FIELD_CHARS", "not-a-number");
        env::set_var("CONVO_MAX_RESULT_CHARS", " 128 ");
        let cfg = EngineConfig::from_env();
        assert_eq!(cfg.max_field_chars, DEFAULT_MAX_FIELD_CHARS);
        assert_eq!(cfg.max_result_chars, 128);
        env::remove_var("CONVO_MAX_FIELD_CHARS");
        env::remove_var("CONVO_MAX_RESULT_CHARS");
    }
}
