//! Request failure envelope and user-facing formatting.
//!
//! Error bodies look like `{ "success": false, "status": 400, "error":
//! { "message": "...", "code": "...", "details": { "<field>": "..." } } }`.

use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failed HTTP exchange as reported by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestFailure {
    /// HTTP status; `0` when no response was received.
    pub status: u16,
    pub status_text: String,
    pub body: Option<Value>,
}

impl RequestFailure {
    pub fn new(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// `error.message` from the server body.
    pub fn server_message(&self) -> Option<&str> {
        self.error_node()?.get("message")?.as_str()
    }

    /// `error.code` from the server body.
    pub fn server_code(&self) -> Option<&str> {
        self.error_node()?.get("code")?.as_str()
    }

    /// Field-level messages from `error.details`, in key order.
    ///
    /// A detail is either a plain string or an object with a `message`.
    pub fn field_messages(&self) -> Vec<(String, String)> {
        let Some(details) = self
            .error_node()
            .and_then(|error| error.get("details"))
            .and_then(Value::as_object)
        else {
            return Vec::new();
        };

        details
            .iter()
            .filter_map(|(field, detail)| {
                let message = match detail {
                    Value::String(text) => Some(text.as_str()),
                    Value::Object(object) => object.get("message").and_then(Value::as_str),
                    _ => None,
                }?;
                Some((field.clone(), message.to_string()))
            })
            .collect()
    }

    /// Message shown to the user. Never retried by core.
    pub fn user_message(&self) -> String {
        let mut message = String::from("=> Error:");
        if self.status != 0 {
            message.push_str(&format!(" {}", self.status));
        }
        let status_text = self.status_text.trim();
        if !status_text.is_empty() {
            message.push_str(&format!(" {status_text}"));
        }
        if let Some(server_message) = self.server_message() {
            message.push_str(&format!(": {server_message}"));
        }
        for (field, field_message) in self.field_messages() {
            message.push_str(&format!("; {field}: {field_message}"));
        }
        message
    }

    fn error_node(&self) -> Option<&Value> {
        self.body.as_ref()?.get("error")
    }
}

impl Display for RequestFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.user_message())
    }
}

impl Error for RequestFailure {}
