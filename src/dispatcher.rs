use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderValue, Method, Request, Uri};
use thiserror::Error;
use tracing::{debug, warn};

use crate::endpoints::{EndpointCall, Payload};
use crate::environment::SmallHayEnvironment;
use crate::http_client::{HttpClient, HttpClientError, SharedTimeouts, Timeouts};
use crate::response::ApiResponse;
use crate::status::{LastStatusCode, TRANSPORT_FAILURE_STATUS};
use crate::token::Token;
use crate::{TokenRetriever, TokenRetrieverError};

/// HTTP verbs used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl From<Verb> for Method {
    fn from(verb: Verb) -> Self {
        match verb {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Delete => Method::DELETE,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Method::from(*self))
    }
}

#[derive(Error, Debug)]
pub enum DispatchError {
    /// No valid access token could be obtained; the resource call was not sent.
    #[error("unauthorized: `{0}`")]
    Unauthorized(#[from] TokenRetrieverError),
    /// The resource call did not complete.
    #[error("transport failure: `{0}`")]
    Transport(#[from] HttpClientError),
    #[error("building request: `{0}`")]
    RequestBuild(String),
}

/// Settings read by the dispatcher on every call.
///
/// Timeouts live behind a shared handle, so the auth exchange runs with the same values as the
/// resource calls.
#[derive(Debug)]
pub struct ClientConfig {
    pub environment: SmallHayEnvironment,
    timeouts: Arc<SharedTimeouts>,
}

impl ClientConfig {
    pub fn new(environment: SmallHayEnvironment) -> Self {
        Self {
            environment,
            timeouts: Arc::default(),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        self.timeouts.get().connect
    }

    pub fn set_connect_timeout(&mut self, timeout: Duration) {
        self.timeouts.set_connect(timeout);
    }

    pub fn request_timeout(&self) -> Duration {
        self.timeouts.get().request
    }

    pub fn set_request_timeout(&mut self, timeout: Duration) {
        self.timeouts.set_request(timeout);
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts.get()
    }

    pub fn shared_timeouts(&self) -> Arc<SharedTimeouts> {
        self.timeouts.clone()
    }
}

/// Sends authenticated requests to the API.
///
/// Every call first asks the token retriever for a valid token, so at most one auth exchange
/// precedes the resource call.
pub struct Dispatcher<C, R>
where
    C: HttpClient,
    R: TokenRetriever,
{
    http_client: C,
    token_retriever: R,
    config: ClientConfig,
    last_status: Arc<LastStatusCode>,
}

impl<C, R> Dispatcher<C, R>
where
    C: HttpClient,
    R: TokenRetriever,
{
    pub fn new(
        http_client: C,
        token_retriever: R,
        config: ClientConfig,
        last_status: Arc<LastStatusCode>,
    ) -> Self {
        Self {
            http_client,
            token_retriever,
            config,
            last_status,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ClientConfig {
        &mut self.config
    }

    pub fn token_retriever(&self) -> &R {
        &self.token_retriever
    }

    pub fn last_status_code(&self) -> Option<u16> {
        self.last_status.get()
    }

    /// Makes sure a valid token is available, authenticating if required.
    pub fn ensure_valid(&self) -> bool {
        self.token_retriever.retrieve().is_ok()
    }

    pub fn dispatch(&self, call: EndpointCall) -> Result<ApiResponse, DispatchError> {
        self.send(call.verb, &call.path, call.body.as_ref())
    }

    /// Sends `verb` to `endpoint` (relative to the environment api url) with the current token.
    pub fn send(
        &self,
        verb: Verb,
        endpoint: &str,
        body: Option<&Payload>,
    ) -> Result<ApiResponse, DispatchError> {
        let uri = self
            .config
            .environment
            .endpoint(endpoint)
            .map_err(|e| {
                DispatchError::RequestBuild(format!("invalid endpoint `{endpoint}`: {e}"))
            })?;

        let token = self.token_retriever.retrieve().inspect_err(|e| {
            debug!(%verb, endpoint, "not sending request without a valid token: {e}");
        })?;
        let request = build_request(verb, uri, &token, body, self.config.timeouts())?;

        debug!(%verb, endpoint, "sending request");
        let response = match self.http_client.send(request) {
            Ok(response) => response,
            Err(e) => {
                warn!(%verb, endpoint, "request failed: {e}");
                self.last_status.record(TRANSPORT_FAILURE_STATUS);
                return Err(e.into());
            }
        };
        self.last_status.record(response.status().as_u16());

        Ok(ApiResponse::from(response))
    }
}

fn build_request(
    verb: Verb,
    uri: Uri,
    token: &Token,
    body: Option<&Payload>,
    timeouts: Timeouts,
) -> Result<Request<Vec<u8>>, DispatchError> {
    let mut bearer_token_header = HeaderValue::from_str(&token.to_string()).map_err(|_| {
        DispatchError::RequestBuild("invalid HTTP header value set for Authorization".to_string())
    })?;
    bearer_token_header.set_sensitive(true);

    let builder = Request::builder()
        .uri(uri)
        .method(Method::from(verb))
        .header(AUTHORIZATION, bearer_token_header);

    let (builder, body) = match body {
        Some(payload) => (
            builder.header(CONTENT_TYPE, "application/json"),
            payload.as_bytes().to_vec(),
        ),
        None => (builder.header(CONTENT_LENGTH, 0), Vec::new()),
    };

    builder
        .extension(timeouts)
        .body(body)
        .map_err(|e| DispatchError::RequestBuild(format!("Failed to build request: {e}")))
}
