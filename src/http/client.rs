use crate::http::config::{HttpConfig, ProxySettings};
use crate::http_client::{
    HttpClient as ApiHttpClient, HttpClientError as ApiHttpClientError, Timeouts,
};
use http::Response as HttpResponse;
use http::{Request, Response};
use reqwest::Proxy;
use reqwest::blocking::{Client, ClientBuilder, Response as BlockingResponse};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::debug;

/// Blocking `reqwest` transport for the API.
///
/// The connect timeout is a client-wide setting in reqwest, so the inner client is rebuilt
/// whenever a request asks for a different one. Clones share the same inner client.
#[derive(Debug, Clone)]
pub struct HttpClient {
    config: HttpConfig,
    current: Arc<Mutex<ConnectedClient>>,
}

#[derive(Debug)]
struct ConnectedClient {
    conn_timeout: Duration,
    client: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self, HttpBuildError> {
        Self::with_config(HttpConfig::default())
    }

    pub fn with_config(config: HttpConfig) -> Result<Self, HttpBuildError> {
        let client = build_client(&config, config.conn_timeout)?;
        let current = ConnectedClient {
            conn_timeout: config.conn_timeout,
            client,
        };

        Ok(Self {
            config,
            current: Arc::new(Mutex::new(current)),
        })
    }

    /// Returns a client honoring the given connect timeout, rebuilding it if required.
    fn client_for(&self, conn_timeout: Duration) -> Result<Client, HttpResponseError> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if current.conn_timeout != conn_timeout {
            debug!(?conn_timeout, "rebuilding http client for new connect timeout");
            let client = build_client(&self.config, conn_timeout)
                .map_err(|err| HttpResponseError::TransportError(err.to_string()))?;
            *current = ConnectedClient {
                conn_timeout,
                client,
            };
        }
        Ok(current.client.clone())
    }

    fn send(&self, request: Request<Vec<u8>>) -> Result<HttpResponse<Vec<u8>>, HttpResponseError> {
        let timeouts = request.extensions().get::<Timeouts>().copied();
        let conn_timeout = timeouts.map_or(self.config.conn_timeout, |t| t.connect);

        let mut req = self
            .client_for(conn_timeout)?
            .request(request.method().into(), request.uri().to_string().as_str())
            .headers(request.headers().clone())
            .body(request.body().to_vec());

        if let Some(timeouts) = timeouts {
            req = req.timeout(timeouts.request);
        }

        let res = req
            .send()
            .map_err(|err| HttpResponseError::TransportError(err.to_string()))?;

        try_build_response(res)
    }
}

fn build_client(config: &HttpConfig, conn_timeout: Duration) -> Result<Client, HttpBuildError> {
    let builder = ClientBuilder::new()
        .use_rustls_tls()
        .tls_built_in_native_certs(true)
        .timeout(config.timeout)
        .connect_timeout(conn_timeout);

    let builder = match &config.proxy {
        ProxySettings::System => builder,
        ProxySettings::Direct => builder.no_proxy(),
        ProxySettings::Through(url) => {
            let proxy = Proxy::all(url.to_string())
                .map_err(|err| HttpBuildError::InvalidProxy(err.to_string()))?;
            builder.proxy(proxy)
        }
    };

    builder
        .build()
        .map_err(|err| HttpBuildError::ClientBuilder(err.to_string()))
}

/// Builds a [HttpResponse<Vec<u8>>] from a reqwest's blocking response: status, version,
/// headers and body.
fn try_build_response(res: BlockingResponse) -> Result<HttpResponse<Vec<u8>>, HttpResponseError> {
    let status = res.status();
    let version = res.version();
    let headers = res.headers().clone();

    let body: Vec<u8> = res
        .bytes()
        .map_err(|err| HttpResponseError::ReadingResponse(err.to_string()))?
        .into();

    let mut response = http::Response::builder()
        .status(status)
        .version(version)
        .body(body)
        .map_err(|err| HttpResponseError::BuildingResponse(err.to_string()))?;
    *response.headers_mut() = headers;

    Ok(response)
}

impl ApiHttpClient for HttpClient {
    fn send(&self, req: Request<Vec<u8>>) -> Result<Response<Vec<u8>>, ApiHttpClientError> {
        let response = self.send(req)?;

        Ok(response)
    }
}

impl From<HttpResponseError> for ApiHttpClientError {
    fn from(err: HttpResponseError) -> Self {
        match err {
            HttpResponseError::TransportError(msg) => ApiHttpClientError::TransportError(msg),
            HttpResponseError::BuildingResponse(msg) | HttpResponseError::ReadingResponse(msg) => {
                ApiHttpClientError::InvalidResponse(msg)
            }
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum HttpBuildError {
    #[error("could not build the http client: {0}")]
    ClientBuilder(String),
    #[error("invalid proxy configuration: {0}")]
    InvalidProxy(String),
}

#[derive(thiserror::Error, Debug)]
enum HttpResponseError {
    #[error("could read response body: {0}")]
    ReadingResponse(String),
    #[error("could build response: {0}")]
    BuildingResponse(String),
    #[error("http transport error: `{0}`")]
    TransportError(String),
}
