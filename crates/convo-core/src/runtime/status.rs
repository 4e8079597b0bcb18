use serde::{Deserialize, Serialize};

/// Estado de un run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Active,
    Completed,
    Waiting,
    Errored,
    Expired,
    Interrupted,
}

impl RunStatus {
    /// Un run en estado terminal no vuelve a ejecutarse.
    pub fn is_terminal(self) -> bool {
        !matches!(self, RunStatus::Active | RunStatus::Waiting)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Active => "active",
            RunStatus::Completed => "completed",
            RunStatus::Waiting => "waiting",
            RunStatus::Errored => "errored",
            RunStatus::Expired => "expired",
            RunStatus::Interrupted => "interrupted",
        }
    }
}

/// Estado de la sesión; siempre derivado del estado de sus runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Completed,
    Waiting,
    Errored,
}
