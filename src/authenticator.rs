use std::sync::Arc;

use http::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderValue, Request, Response, StatusCode, Uri};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http_client::{HttpClient, SharedTimeouts, Timeouts};
use crate::identity::ClientIdentity;
use crate::status::TRANSPORT_FAILURE_STATUS;
use crate::token::AccessToken;

#[derive(Error, Debug)]
pub enum AuthenticateError {
    #[error("unable to build request: `{0}`")]
    RequestError(String),
    #[error("unable to deserialize token: `{0}`")]
    DeserializeError(String),
    #[error("auth server error: Status code: `{0}`, Reason: `{1}`")]
    HttpResponseError(u16, String),
    #[error("http transport error: `{0}`")]
    HttpTransportError(String),
}

impl AuthenticateError {
    /// Status code observed by the failed exchange, if the request was sent at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AuthenticateError::RequestError(_) => None,
            // Bodies are only decoded for 200 responses.
            AuthenticateError::DeserializeError(_) => Some(StatusCode::OK.as_u16()),
            AuthenticateError::HttpResponseError(status, _) => Some(*status),
            AuthenticateError::HttpTransportError(_) => Some(TRANSPORT_FAILURE_STATUS),
        }
    }
}

pub trait Authenticator {
    fn authenticate(
        &self,
        identity: &ClientIdentity,
    ) -> Result<TokenRetrievalResponse, AuthenticateError>;
}

/// The Authenticator is responsible for exchanging the client identity for an access token.
pub struct HttpAuthenticator<C> {
    /// HTTP client
    http_client: C,
    /// Auth endpoint URL
    url: Uri,
    /// Timeouts of the client the exchange is performed for. Transport defaults apply otherwise.
    timeouts: Option<Arc<SharedTimeouts>>,
}

impl<C> HttpAuthenticator<C> {
    pub fn new(http_client: C, url: Uri) -> Self {
        Self {
            http_client,
            url,
            timeouts: None,
        }
    }

    pub fn with_timeouts(self, timeouts: Arc<SharedTimeouts>) -> Self {
        Self {
            timeouts: Some(timeouts),
            ..self
        }
    }
}

impl<C> Authenticator for HttpAuthenticator<C>
where
    C: HttpClient,
{
    /// Executes an empty POST request to the auth endpoint using HTTP Basic authentication and
    /// decodes the token from a successful response.
    fn authenticate(
        &self,
        identity: &ClientIdentity,
    ) -> Result<TokenRetrievalResponse, AuthenticateError> {
        let timeouts = self.timeouts.as_ref().map(|t| t.get());
        let request = build_request(identity, &self.url, timeouts)?;

        let response = self
            .http_client
            .send(request)
            .map_err(|e| AuthenticateError::HttpTransportError(e.to_string()))?;

        evaluate_response(response)
    }
}

fn build_request(
    identity: &ClientIdentity,
    url: &Uri,
    timeouts: Option<Timeouts>,
) -> Result<Request<Vec<u8>>, AuthenticateError> {
    let mut basic_header = HeaderValue::from_str(&identity.basic_authorization()).map_err(|_| {
        AuthenticateError::RequestError(
            "invalid HTTP header value set for Authorization".to_string(),
        )
    })?;
    basic_header.set_sensitive(true);

    let mut builder = Request::builder()
        .uri(url)
        .method("POST")
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, basic_header)
        .header(CONTENT_LENGTH, 0);
    if let Some(timeouts) = timeouts {
        builder = builder.extension(timeouts);
    }

    builder
        .body(Vec::new())
        .map_err(|e| AuthenticateError::RequestError(format!("Failed to build request: {e}")))
}

fn evaluate_response(
    response: Response<Vec<u8>>,
) -> Result<TokenRetrievalResponse, AuthenticateError> {
    let body = response.body();

    match response.status() {
        StatusCode::OK => serde_json::from_slice(body)
            .map_err(|e| AuthenticateError::DeserializeError(e.to_string())),
        status => Err(AuthenticateError::HttpResponseError(
            status.as_u16(),
            String::from_utf8_lossy(body).to_string(),
        )),
    }
}

/// Successful auth response. `created` and `expires` are unix timestamps in seconds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TokenRetrievalResponse {
    pub access_token: AccessToken,
    pub created: i64,
    pub expires: i64,
}
