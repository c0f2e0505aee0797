use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server answered {status}")]
    Status {
        status: StatusCode,
        body: Option<Value>,
    },

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("could not encode request body: {0}")]
    Encode(String),

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

/// Turns any client failure into the single message shown to the user.
pub fn handle_api_error(error: &ApiError) -> String {
    match error {
        ApiError::Status { status, body } => body
            .as_ref()
            .and_then(message_from_body)
            .unwrap_or_else(|| message_for_status(*status)),
        ApiError::Transport(e) if e.is_timeout() => {
            "The server took too long to respond. Please try again.".to_string()
        }
        ApiError::Transport(e) if e.is_connect() => {
            "Unable to reach the server. Check your network connection.".to_string()
        }
        ApiError::Transport(e) => match e.status() {
            Some(status) => message_for_status(status),
            None => format!("Network error: {}", e),
        },
        ApiError::Decode(_) => "Unexpected response from the server.".to_string(),
        ApiError::Encode(_) => "The request could not be prepared.".to_string(),
        ApiError::Url(e) => format!("Invalid request URL: {}", e),
    }
}

fn message_for_status(status: StatusCode) -> String {
    match status.as_u16() {
        400 => "The request was invalid.".to_string(),
        401 => "Your session has expired. Please sign in again.".to_string(),
        403 => "You do not have permission to perform this action.".to_string(),
        404 => "The requested resource was not found.".to_string(),
        409 => "The resource was modified by someone else.".to_string(),
        429 => "Too many requests. Please slow down.".to_string(),
        500..=599 => "The server encountered an error. Please try again later.".to_string(),
        code => format!("Request failed with status {}.", code),
    }
}

/// DRF error bodies: `detail`, `message`, `error`, `non_field_errors`, or
/// per-field lists such as `{"title": ["This field is required."]}`.
fn message_from_body(body: &Value) -> Option<String> {
    match body {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Array(items) => items.iter().find_map(message_from_body),
        Value::Object(map) => {
            for key in ["detail", "message", "error", "non_field_errors"] {
                if let Some(message) = map.get(key).and_then(message_from_body) {
                    return Some(message);
                }
            }
            map.iter().find_map(|(field, value)| {
                first_text(value).map(|message| format!("{}: {}", field, message))
            })
        }
        _ => None,
    }
}

fn first_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Array(items) => items.iter().find_map(first_text),
        _ => None,
    }
}
