//! Error taxonomy and the shared user-facing error-extraction policy.
//!
//! Remote failures split into transport errors (nothing came back) and
//! server rejections (an HTTP error status, possibly with a structured
//! validation body). Cart operations fail either before any remote call
//! (`CartError::Validation`) or because of one (`CartError::Remote`).

use serde_json::Value;

/// Failure of a call against the admin dashboard API.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a server response (connect, timeout,
    /// invalid payload decode).
    #[error("{message}")]
    Transport { message: String },

    /// The server answered with a non-success status. `body` preserves the
    /// parsed JSON error payload, when there was one, for [`extract_error`].
    #[error("{message}")]
    Rejected {
        status: u16,
        message: String,
        body: Option<Value>,
    },
}

/// Failure of an [`crate::cart::OrderCart`] operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    /// A local precondition failed; no remote call was attempted.
    #[error("{0}")]
    Validation(String),

    /// A remote mutation or refresh failed; the message has already been
    /// run through [`extract_error`].
    #[error("{0}")]
    Remote(String),
}

impl CartError {
    pub fn message(&self) -> &str {
        match self {
            CartError::Validation(msg) | CartError::Remote(msg) => msg,
        }
    }
}

/// Turn a failed remote call into the message shown to the operator.
///
/// Precedence: the first message of the first field in a structured
/// `errors` map, else a flat `message` or `error` field, else the
/// caller-supplied fallback. Transport failures carry no body and always
/// fall through to the fallback.
pub fn extract_error(err: &ApiError, fallback: &str) -> String {
    let body = match err {
        ApiError::Rejected { body: Some(b), .. } => b,
        _ => return fallback.to_string(),
    };

    if let Some(errors) = body.get("errors").and_then(Value::as_object) {
        if let Some((_, messages)) = errors.iter().next() {
            if let Some(first) = messages
                .as_array()
                .and_then(|msgs| msgs.first())
                .and_then(Value::as_str)
            {
                return first.to_string();
            }
            // Some endpoints send a bare string instead of a list.
            if let Some(msg) = messages.as_str() {
                return msg.to_string();
            }
        }
    }

    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}
