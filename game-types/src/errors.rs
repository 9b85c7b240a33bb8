use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, thiserror::Error)]
#[ts(export)]
pub enum GameError {
    #[error("No active session")]
    NoActiveSession,
    #[error("Invalid question: {reason}")]
    InvalidQuestion { reason: String },
    #[error("Unknown {kind}: {value}")]
    UnknownLabel { kind: String, value: String },
}

impl GameError {
    pub fn unknown_label(kind: &str, value: &str) -> Self {
        GameError::UnknownLabel {
            kind: kind.to_string(),
            value: value.to_string(),
        }
    }
}
