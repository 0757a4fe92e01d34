use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use http::{Request, Response};

use crate::http::config::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};

#[derive(thiserror::Error, Debug)]
pub enum HttpClientError {
    /// Represents an http transport crate error.
    #[error("HTTP Transport error: `{0}`")]
    TransportError(String),
    /// Represents an unexpected response.
    #[error("invalid http response: `{0}`")]
    InvalidResponse(String),
}

/// Per-request timeouts, carried in the request extensions.
///
/// Implementations should honor them over their own defaults when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Duration,
    pub request: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: DEFAULT_CONNECT_TIMEOUT,
            request: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Timeouts of one client, read by every component sending requests on its behalf.
#[derive(Debug, Default)]
pub struct SharedTimeouts(Mutex<Timeouts>);

impl SharedTimeouts {
    pub fn get(&self) -> Timeouts {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_connect(&self, connect: Duration) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).connect = connect;
    }

    pub fn set_request(&self, request: Duration) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).request = request;
    }
}

/// A synchronous trait that defines the internal methods for HTTP clients.
pub trait HttpClient {
    /// A synchronous function sends a request. The method and url are defined inside the Request.
    fn send(&self, req: Request<Vec<u8>>) -> Result<Response<Vec<u8>>, HttpClientError>;
}

// Accept closures as HttpClient implementations
impl<F> HttpClient for F
where
    F: Fn(Request<Vec<u8>>) -> Result<Response<Vec<u8>>, HttpClientError>,
{
    fn send(&self, req: Request<Vec<u8>>) -> Result<Response<Vec<u8>>, HttpClientError> {
        self(req)
    }
}
