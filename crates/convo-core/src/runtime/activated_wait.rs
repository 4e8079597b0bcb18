use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::definition::Hint;

/// Suspensión concreta de la sesión. Es el único estado de espera que se
/// persiste; lo consume el siguiente resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivatedWait {
    Msg {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout_seconds: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout_on: Option<DateTime<Utc>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hint: Option<Hint>,
    },
    Dial {
        phone: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dial_limit_seconds: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        call_limit_seconds: Option<u32>,
    },
}

impl ActivatedWait {
    pub fn type_name(&self) -> &'static str {
        match self {
            ActivatedWait::Msg { .. } => "msg",
            ActivatedWait::Dial { .. } => "dial",
        }
    }

    /// Momento a partir del cual el caller debería entregar un `wait_timeout`.
    pub fn timeout_on(&self) -> Option<DateTime<Utc>> {
        match self {
            ActivatedWait::Msg { timeout_on, .. } => *timeout_on,
            ActivatedWait::Dial { .. } => None,
        }
    }

    pub fn has_timeout(&self) -> bool {
        matches!(self, ActivatedWait::Msg { timeout_seconds: Some(_), .. })
    }
}
