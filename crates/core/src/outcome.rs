//! Operation outcomes.
//!
//! Public operations never surface layer errors directly. They fold
//! everything into an [`Outcome`]: a human-readable message, an
//! optional payload, and a coarse three-bucket code. Infrastructure
//! failures and business rejections are distinguished; nothing finer
//! is exposed.

use serde::{Deserialize, Serialize};

/// Default message for outcomes produced from infrastructure failures.
pub const SYSTEM_ERROR: &str = "system error, please try again later";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeCode {
    Success,
    SystemError,
    Rejected,
}

impl OutcomeCode {
    /// Wire value: `0` success, `-1` system error, `-2` rejected.
    pub fn as_i8(self) -> i8 {
        match self {
            OutcomeCode::Success => 0,
            OutcomeCode::SystemError => -1,
            OutcomeCode::Rejected => -2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome<T> {
    pub message: String,
    pub payload: Option<T>,
    pub code: OutcomeCode,
}

impl<T> Outcome<T> {
    pub fn success(message: impl Into<String>, payload: T) -> Self {
        Self {
            message: message.into(),
            payload: Some(payload),
            code: OutcomeCode::Success,
        }
    }

    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            payload: None,
            code: OutcomeCode::Success,
        }
    }

    pub fn system_error() -> Self {
        Self {
            message: SYSTEM_ERROR.to_string(),
            payload: None,
            code: OutcomeCode::SystemError,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            payload: None,
            code: OutcomeCode::Rejected,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == OutcomeCode::Success
    }
}
