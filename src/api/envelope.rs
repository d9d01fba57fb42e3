use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::ENVELOPE_SUCCESS_CODE;

/// Uniform JSON wrapper returned by every backend endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    pub code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Application-level success (`code == 200`)
    pub fn is_success(&self) -> bool {
        self.code == ENVELOPE_SUCCESS_CODE
    }

    /// The backend's message, or `default` when it sent none
    pub fn message_or<'a>(&'a self, default: &'a str) -> &'a str {
        match self.msg.as_deref() {
            Some(msg) if !msg.is_empty() => msg,
            _ => default,
        }
    }
}
