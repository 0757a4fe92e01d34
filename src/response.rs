//! Outcome of a resource call.

use http::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::model::ErrorEnvelope;

/// Body of a response, decoded as JSON when possible.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Json(Value),
    /// The payload was not valid JSON. `raw` keeps the bytes as received.
    Invalid { error: String, raw: Vec<u8> },
}

impl Decoded {
    pub fn from_slice(body: &[u8]) -> Self {
        match serde_json::from_slice(body) {
            Ok(value) => Decoded::Json(value),
            Err(e) => Decoded::Invalid {
                error: e.to_string(),
                raw: body.to_vec(),
            },
        }
    }

    pub fn json(&self) -> Option<&Value> {
        match self {
            Decoded::Json(value) => Some(value),
            Decoded::Invalid { .. } => None,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ResponseError {
    #[error("response body is not valid JSON: `{0}`")]
    NotJson(String),
    #[error("unexpected response shape: `{0}`")]
    UnexpectedShape(#[from] serde_json::Error),
}

/// Status and decoded body of a resource call.
///
/// Server side errors are regular responses: check [ApiResponse::is_success] and
/// [ApiResponse::error_envelope].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: StatusCode,
    body: Decoded,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: Decoded) -> Self {
        Self { status, body }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn body(&self) -> &Decoded {
        &self.body
    }

    pub fn json(&self) -> Option<&Value> {
        self.body.json()
    }

    pub fn into_body(self) -> Decoded {
        self.body
    }

    /// Deserializes the JSON body into one of the typed views of [crate::model].
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, ResponseError> {
        match &self.body {
            Decoded::Json(value) => Ok(T::deserialize(value)?),
            Decoded::Invalid { error, .. } => Err(ResponseError::NotJson(error.to_owned())),
        }
    }

    /// The error reported by the server, for unsuccessful responses carrying one.
    pub fn error_envelope(&self) -> Option<ErrorEnvelope> {
        if self.is_success() {
            return None;
        }
        self.parse().ok()
    }
}

impl From<Response<Vec<u8>>> for ApiResponse {
    fn from(response: Response<Vec<u8>>) -> Self {
        let status = response.status();
        let body = Decoded::from_slice(response.body());
        Self { status, body }
    }
}
