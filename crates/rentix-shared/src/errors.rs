use std::fmt::Display;

use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Empty not allowed")]
    Empty,
    #[error("Maximum length exceeded. {max} allowed but found {actual}")]
    MaxExceeded { max: usize, actual: usize },
    #[error("Invalid format: {0}")]
    InvalidFormat(&'static str),
}

#[derive(Debug, Error)]
#[error("The user has not logged in")]
pub struct NotLoggedInError;

/// Everything that can go wrong talking to the backend
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// 401 from an endpoint that does not end the session (eg. wrong password)
    #[error("{0}")]
    Unauthorized(ErrorPayload),
    /// 401 from a protected endpoint. The session has already been cleared
    #[error("Session expired. Please log in again")]
    SessionExpired,
    #[error("{payload}")]
    Rejected { status: u16, payload: ErrorPayload },
    #[error("failed to send request: {0}")]
    Transport(String),
    #[error("failed to parse response: {0}")]
    Decode(String),
    #[error("response was dropped before it was delivered")]
    Canceled,
}

impl ApiError {
    /// Message suitable to show to the user as is
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized(payload) | ApiError::Rejected { payload, .. } => {
                payload.message.clone()
            }
            ApiError::SessionExpired => self.to_string(),
            ApiError::Transport(_) | ApiError::Decode(_) | ApiError::Canceled => {
                "Unable to reach the server. Please try again".to_string()
            }
        }
    }

    /// Returns `true` if the api error is [`SessionExpired`].
    ///
    /// [`SessionExpired`]: ApiError::SessionExpired
    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

/// Best effort interpretation of an error body returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorPayload {
    pub message: String,
    pub error: Option<String>,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RawMessage {
    One(String),
    Many(Vec<String>),
}

#[derive(serde::Deserialize)]
struct RawErrorPayload {
    message: RawMessage,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorPayload {
    pub fn generic(status: u16) -> Self {
        Self {
            message: format!("request failed with status code: {status}"),
            error: None,
        }
    }

    /// Never fails, if the body is not understood the generic message is used
    pub fn from_body(status: u16, body: &str) -> Self {
        let Ok(raw) = serde_json::from_str::<RawErrorPayload>(body) else {
            return Self::generic(status);
        };
        let message = match raw.message {
            RawMessage::One(message) => message,
            RawMessage::Many(messages) => messages.join("; "),
        };
        if message.is_empty() {
            return Self::generic(status);
        }
        Self {
            message,
            error: raw.error,
        }
    }
}

impl Display for ErrorPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}
