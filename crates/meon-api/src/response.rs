// Response normalizer
//
// Classifies a raw HTTP response into a success payload or a failure
// message, whether the gateway answered with JSON or plain text.

use serde_json::Value;

use crate::error::Error;

/// The parts of an HTTP response the normalizer looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl RawResponse {
    /// Drain a `reqwest::Response` into a `RawResponse`.
    pub async fn read(resp: reqwest::Response) -> Result<Self, Error> {
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = resp.text().await.map_err(Error::Transport)?;
        Ok(Self {
            status,
            content_type,
            body,
        })
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `content-type` names a JSON media type.
    pub fn is_json(&self) -> bool {
        self.content_type.as_deref().is_some_and(|ct| {
            let ct = ct.to_ascii_lowercase();
            ct.contains("application/json") || ct.contains("+json")
        })
    }
}

/// A decoded success body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    /// Look up a top-level field when the payload is a JSON object.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Json(Value::Object(map)) => map.get(name),
            _ => None,
        }
    }

    /// A top-level field that is a non-empty string.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Normalize a response into `Ok(payload)` or an error carrying the
/// operator-facing message.
///
/// JSON bodies are parsed before the status is looked at, so a malformed
/// JSON body is always reported as a decode error.
pub fn normalize(raw: RawResponse) -> Result<Payload, Error> {
    let payload = if raw.is_json() {
        match serde_json::from_str::<Value>(&raw.body) {
            Ok(value) => Payload::Json(value),
            Err(e) => {
                return Err(Error::Deserialization {
                    message: e.to_string(),
                    body: raw.body,
                });
            }
        }
    } else {
        Payload::Text(raw.body.clone())
    };

    if raw.is_success() {
        return Ok(payload);
    }

    Err(Error::Http {
        status: raw.status,
        message: error_message(&payload, &raw),
    })
}

/// `message` field, else the raw body, else a generic status line.
fn error_message(payload: &Payload, raw: &RawResponse) -> String {
    if let Some(message) = payload.field("message").and_then(message_text) {
        return message;
    }
    let body = raw.body.trim();
    if body.is_empty() {
        format!("HTTP error! status: {}", raw.status)
    } else {
        body.to_owned()
    }
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
