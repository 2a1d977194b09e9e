// Credential/request builder
//
// Turns (base URL, instance id, credentials, endpoint, body) into a fully
// formed authenticated request descriptor. Nothing here touches the
// network: every precondition failure is reported before I/O happens.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

/// Status-check endpoint. The only one allowed to run without an instance.
pub const INFO_PATH: &str = "/info";
/// Login endpoint (connect and QR refresh).
pub const LOGIN_PATH: &str = "/login";
/// Logout endpoint.
pub const LOGOUT_PATH: &str = "/logout";

// ── Method ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
        }
    }
}

// ── Validation ───────────────────────────────────────────────────────

/// Precondition failures, worded for the operator (pt-BR).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Endereço da API é obrigatório.")]
    MissingBaseUrl,

    #[error("Usuário e Senha são obrigatórios.")]
    MissingCredentials,

    #[error("Nome da instância é obrigatório.")]
    MissingInstance,

    #[error("Endereço da API inválido: {url} ({reason})")]
    InvalidBaseUrl { url: String, reason: String },
}

// ── Credentials ──────────────────────────────────────────────────────

/// Operator credentials for HTTP Basic auth.
///
/// Only ever used to derive the `Authorization` header; the password stays
/// wrapped in a [`SecretString`] so it never shows up in `Debug` output.
#[derive(Debug, Clone)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Both username and password are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.expose_secret().is_empty()
    }

    /// `Basic <base64(username:password)>`
    pub fn basic_auth_value(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password.expose_secret());
        format!("Basic {}", STANDARD.encode(raw))
    }
}

// ── Endpoint ─────────────────────────────────────────────────────────

/// Path + method of one gateway call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub path: &'static str,
    pub method: HttpMethod,
}

impl Endpoint {
    pub const fn new(path: &'static str, method: HttpMethod) -> Self {
        Self { path, method }
    }

    /// Every endpoint except the status check needs an instance id.
    pub fn requires_instance(&self) -> bool {
        self.path != INFO_PATH
    }
}

// ── Prepared request ─────────────────────────────────────────────────

/// A fully formed request, ready to hand to [`GatewayClient::execute`].
///
/// [`GatewayClient::execute`]: crate::client::GatewayClient::execute
#[derive(Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: Url,
    /// Value of the `Authorization` header.
    pub authorization: String,
    /// Value of the `Content-Type` header, set for POST only.
    pub content_type: Option<&'static str>,
    /// JSON-encoded body, POST only.
    pub body: Option<String>,
}

impl fmt::Debug for PreparedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("authorization", &"Basic [REDACTED]")
            .field("content_type", &self.content_type)
            .field("body", &self.body)
            .finish()
    }
}

/// Build an authenticated request for `endpoint`.
///
/// Checks run in order: base URL, credentials, instance id (skipped for
/// [`INFO_PATH`]), then URL syntax. The first failure wins.
pub fn build_request(
    base_url: &str,
    instance_id: &str,
    endpoint: Endpoint,
    body: Option<&Map<String, Value>>,
    credentials: &Credentials,
) -> Result<PreparedRequest, ValidationError> {
    if base_url.is_empty() {
        return Err(ValidationError::MissingBaseUrl);
    }
    if !credentials.is_complete() {
        return Err(ValidationError::MissingCredentials);
    }
    if instance_id.is_empty() && endpoint.requires_instance() {
        return Err(ValidationError::MissingInstance);
    }

    let mut url = join_url(base_url, endpoint.path)?;

    let (content_type, body) = match endpoint.method {
        HttpMethod::Get => {
            url.query_pairs_mut().append_pair("id", instance_id);
            (None, None)
        }
        HttpMethod::Post => (
            Some("application/json"),
            body.map(|map| Value::Object(map.clone()).to_string()),
        ),
    };

    Ok(PreparedRequest {
        method: endpoint.method,
        url,
        authorization: credentials.basic_auth_value(),
        content_type,
        body,
    })
}

/// `{base without one trailing slash}{path}`, restricted to http(s).
fn join_url(base: &str, path: &str) -> Result<Url, ValidationError> {
    let trimmed = base.strip_suffix('/').unwrap_or(base);
    let invalid = |reason: String| ValidationError::InvalidBaseUrl {
        url: base.to_owned(),
        reason,
    };

    let url = Url::parse(&format!("{trimmed}{path}")).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    const INFO: Endpoint = Endpoint::new(INFO_PATH, HttpMethod::Get);
    const LOGIN: Endpoint = Endpoint::new(LOGIN_PATH, HttpMethod::Post);

    fn creds(user: &str, pass: &str) -> Credentials {
        Credentials::new(user, SecretString::from(pass.to_owned()))
    }

    fn id_body(id: &str) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".into(), json!(id));
        map
    }

    #[test]
    fn basic_auth_header_is_base64_of_user_colon_password() {
        assert_eq!(creds("admin", "secret").basic_auth_value(), "Basic YWRtaW46c2VjcmV0");
        // Colons in the password are kept verbatim.
        assert_eq!(
            creds("ops", "p@ss:word").basic_auth_value(),
            "Basic b3BzOnBAc3M6d29yZA=="
        );
    }

    #[test]
    fn get_appends_instance_as_id_query_param() {
        let req = build_request("http://localhost:8080", "loja 1", INFO, None, &creds("a", "b"))
            .unwrap();

        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url.as_str(), "http://localhost:8080/info?id=loja+1");
        assert_eq!(req.content_type, None);
        assert_eq!(req.body, None);
    }

    #[test]
    fn post_serializes_body_and_sets_json_content_type() {
        let body = id_body("loja1");
        let req = build_request("http://gw:8080", "loja1", LOGIN, Some(&body), &creds("a", "b"))
            .unwrap();

        assert_eq!(req.url.as_str(), "http://gw:8080/login");
        assert_eq!(req.content_type, Some("application/json"));
        let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, json!({ "id": "loja1" }));
    }

    #[test]
    fn trailing_slash_is_stripped_once() {
        let req = build_request("http://gw:8080/api/", "x", LOGIN, None, &creds("a", "b")).unwrap();
        assert_eq!(req.url.as_str(), "http://gw:8080/api/login");
    }

    #[test]
    fn empty_base_url_fails_first() {
        let err = build_request("", "", LOGIN, None, &creds("", "")).unwrap_err();
        assert_eq!(err, ValidationError::MissingBaseUrl);
        assert_eq!(err.to_string(), "Endereço da API é obrigatório.");
    }

    #[test]
    fn blank_base_url_is_invalid_not_missing() {
        let err = build_request("   ", "i", LOGIN, None, &creds("a", "b")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidBaseUrl { ref url, .. } if url == "   "));
    }

    #[test]
    fn missing_username_or_password_fails() {
        for (user, pass) in [("", "x"), ("x", ""), ("", "")] {
            let err = build_request("http://gw", "i", LOGIN, None, &creds(user, pass)).unwrap_err();
            assert_eq!(err, ValidationError::MissingCredentials);
        }
    }

    #[test]
    fn instance_required_except_for_info() {
        let err = build_request("http://gw", "", LOGIN, None, &creds("a", "b")).unwrap_err();
        assert_eq!(err, ValidationError::MissingInstance);

        let req = build_request("http://gw", "", INFO, None, &creds("a", "b")).unwrap();
        assert_eq!(req.url.as_str(), "http://gw/info?id=");
    }

    #[test]
    fn unparseable_or_non_http_base_url_is_rejected() {
        let err = build_request("not a url", "i", LOGIN, None, &creds("a", "b")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidBaseUrl { .. }));

        let err = build_request("ftp://gw", "i", LOGIN, None, &creds("a", "b")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidBaseUrl { ref reason, .. } if reason.contains("ftp")));
    }

    #[test]
    fn debug_output_redacts_authorization() {
        let req = build_request("http://gw", "i", INFO, None, &creds("admin", "secret")).unwrap();
        let debug = format!("{req:?}");
        assert!(!debug.contains("YWRtaW46c2VjcmV0"));
        assert!(debug.contains("REDACTED"));
    }
}
