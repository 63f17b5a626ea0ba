//! The failure shape handed to the classifier by HTTP-calling code.
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Transport error codes that mean the request never got a response.
pub const TRANSPORT_ERROR_CODES: [&str; 6] = [
    "ERR_NETWORK",
    "ECONNREFUSED",
    "ECONNRESET",
    "ECONNABORTED",
    "ETIMEDOUT",
    "ENOTFOUND",
];

/// A failed backend call, as much of it as the caller could observe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    /// Transport-level error code, if the call failed below HTTP.
    pub code: Option<String>,
    /// HTTP status of the response, if one arrived.
    pub status: Option<u16>,
    /// Raw error text. Logged, never shown to the user.
    pub message: String,
    /// Response body, if any.
    pub payload: Option<Value>,
    pub method: Option<String>,
    pub url: Option<String>,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// A failure carrying only an HTTP status.
    pub fn status(status: u16) -> Self {
        Self::default().with_status(status)
    }

    /// A connectivity failure with the generic network error code.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(message).with_code("ERR_NETWORK")
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_request(mut self, method: impl Into<String>, url: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self.url = Some(url.into());
        self
    }

    /// Whether the code marks a connectivity failure.
    pub fn is_transport_failure(&self) -> bool {
        self.code
            .as_deref()
            .is_some_and(|code| TRANSPORT_ERROR_CODES.contains(&code))
    }
}

impl From<&reqwest::Error> for Failure {
    fn from(err: &reqwest::Error) -> Self {
        let code = if err.is_timeout() {
            Some("ETIMEDOUT")
        } else if err.is_connect() {
            Some("ECONNREFUSED")
        } else {
            None
        };

        Self {
            code: code.map(str::to_string),
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
            payload: None,
            method: None,
            url: err.url().map(|u| u.to_string()),
        }
    }
}

impl From<reqwest::Error> for Failure {
    fn from(err: reqwest::Error) -> Self {
        Self::from(&err)
    }
}
