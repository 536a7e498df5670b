//! Activity log data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::validation::ValidationError;

/// Kind of account action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Login,
    Register,
    Update,
    Delete,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Login => "login",
            ActivityKind::Register => "register",
            ActivityKind::Update => "update",
            ActivityKind::Delete => "delete",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "login" => Ok(ActivityKind::Login),
            "register" => Ok(ActivityKind::Register),
            "update" => Ok(ActivityKind::Update),
            "delete" => Ok(ActivityKind::Delete),
            other => Err(ValidationError::InvalidChoice {
                field: "activity type",
                value: other.to_string(),
            }),
        }
    }
}

/// One logged account action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub id: String,
    /// Display name of the account that acted
    pub actor: String,
    pub action: String,
    pub timestamp: DateTime<Utc>,
    pub kind: ActivityKind,
}
