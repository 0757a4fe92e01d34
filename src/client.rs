//! [SmallHay] is the entry point of the crate: it owns the client identity, the session and the
//! configuration, and exposes one method per API operation.
//!
//! ```no_run
//! use smallhay::SmallHay;
//! use smallhay::endpoints::Pagination;
//!
//! let client = SmallHay::new("demo", "demo", true)?;
//! let pages = client.get_pages(Pagination::default())?;
//! println!("{}: {:?}", pages.status(), pages.json());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::ClientID;
use crate::TokenRetriever;
use crate::authenticator::HttpAuthenticator;
use crate::dispatcher::{ClientConfig, DispatchError, Dispatcher, Verb};
use crate::endpoints::{AssetId, AssetQuery, Endpoint, PageId, Pagination, Payload};
use crate::environment::SmallHayEnvironment;
use crate::http::client::{HttpBuildError, HttpClient};
use crate::http_client::HttpClient as ApiHttpClient;
use crate::identity::{ClientIdentity, ClientSecret};
use crate::response::ApiResponse;
use crate::status::LastStatusCode;
use crate::token::Token;
use crate::token_retriever::TokenRetrieverWithCache;

#[derive(Error, Debug)]
pub enum ClientBuildError {
    #[error("building http client: `{0}`")]
    HttpClient(#[from] HttpBuildError),
    #[error("invalid auth endpoint: `{0}`")]
    InvalidAuthEndpoint(String),
}

type CachedTokenRetriever<C> = TokenRetrieverWithCache<HttpAuthenticator<C>>;

/// Client of the SmallHay API.
///
/// Methods take `&self`, so a single client can be shared between threads; the access token is
/// refreshed at most once at a time.
pub struct SmallHay<C = HttpClient>
where
    C: ApiHttpClient,
{
    dispatcher: Dispatcher<C, CachedTokenRetriever<C>>,
}

impl SmallHay<HttpClient> {
    /// Creates a client for the production API, or the test API when `test` is set.
    pub fn new(
        client_id: impl Into<ClientID>,
        client_secret: impl Into<ClientSecret>,
        test: bool,
    ) -> Result<Self, ClientBuildError> {
        Self::with_environment(
            ClientIdentity::new(client_id, client_secret),
            SmallHayEnvironment::from_test_flag(test),
        )
    }

    pub fn with_environment(
        identity: ClientIdentity,
        environment: SmallHayEnvironment,
    ) -> Result<Self, ClientBuildError> {
        Self::with_http_client(identity, environment, HttpClient::new()?)
    }
}

impl<C> SmallHay<C>
where
    C: ApiHttpClient + Clone,
{
    /// Creates a client on top of any transport. The same transport performs the auth exchanges.
    pub fn with_http_client(
        identity: ClientIdentity,
        environment: SmallHayEnvironment,
        http_client: C,
    ) -> Result<Self, ClientBuildError> {
        let auth_endpoint = environment
            .auth_endpoint()
            .map_err(|e| ClientBuildError::InvalidAuthEndpoint(e.to_string()))?;
        let last_status = Arc::new(LastStatusCode::default());

        let config = ClientConfig::new(environment);

        let authenticator = HttpAuthenticator::new(http_client.clone(), auth_endpoint)
            .with_timeouts(config.shared_timeouts());
        let token_retriever =
            TokenRetrieverWithCache::new(identity, authenticator, last_status.clone());
        let dispatcher = Dispatcher::new(http_client, token_retriever, config, last_status);

        Ok(Self { dispatcher })
    }
}

impl<C> SmallHay<C>
where
    C: ApiHttpClient,
{
    pub fn client_id(&self) -> &str {
        self.identity().client_id()
    }

    pub fn client_secret(&self) -> &ClientSecret {
        self.identity().client_secret()
    }

    pub fn is_test(&self) -> bool {
        self.environment().is_test()
    }

    pub fn environment(&self) -> &SmallHayEnvironment {
        &self.dispatcher.config().environment
    }

    /// Status code of the last exchange, the auth exchange included. `0` reports a transport
    /// failure.
    pub fn last_status_code(&self) -> Option<u16> {
        self.dispatcher.last_status_code()
    }

    /// Current access token, if any was obtained. It may be expired.
    pub fn access_token(&self) -> Option<Token> {
        self.dispatcher.token_retriever().cached()
    }

    /// Expiration of the current access token as a unix timestamp, `0` when there is none.
    pub fn access_token_expires(&self) -> i64 {
        self.access_token()
            .and_then(|token| token.expires_at())
            .map_or(0, |expires_at| expires_at.timestamp())
    }

    pub fn connect_timeout(&self) -> Duration {
        self.dispatcher.config().connect_timeout()
    }

    /// Applies to resource calls and auth exchanges alike.
    pub fn set_connect_timeout(&mut self, timeout: Duration) {
        self.dispatcher.config_mut().set_connect_timeout(timeout);
    }

    pub fn request_timeout(&self) -> Duration {
        self.dispatcher.config().request_timeout()
    }

    /// Applies to resource calls and auth exchanges alike.
    pub fn set_request_timeout(&mut self, timeout: Duration) {
        self.dispatcher.config_mut().set_request_timeout(timeout);
    }

    /// Returns whether a valid access token is available, authenticating if required.
    pub fn ensure_valid(&self) -> bool {
        self.dispatcher.ensure_valid()
    }

    /// Sends an arbitrary request. `endpoint` is relative to the api base url.
    pub fn send(
        &self,
        verb: Verb,
        endpoint: &str,
        body: Option<&Payload>,
    ) -> Result<ApiResponse, DispatchError> {
        self.dispatcher.send(verb, endpoint, body)
    }

    pub fn call(&self, endpoint: Endpoint) -> Result<ApiResponse, DispatchError> {
        self.dispatcher.dispatch(endpoint.into_call())
    }

    pub fn create_pages(&self, payload: impl Into<Payload>) -> Result<ApiResponse, DispatchError> {
        self.call(Endpoint::CreatePages(payload.into()))
    }

    pub fn get_pages(&self, pagination: Pagination) -> Result<ApiResponse, DispatchError> {
        self.call(Endpoint::ListPages(pagination))
    }

    pub fn update_pages(&self, payload: impl Into<Payload>) -> Result<ApiResponse, DispatchError> {
        self.call(Endpoint::ModifyPages(payload.into()))
    }

    pub fn delete_pages(&self, payload: impl Into<Payload>) -> Result<ApiResponse, DispatchError> {
        self.call(Endpoint::DeletePages(payload.into()))
    }

    pub fn get_page(&self, page_id: PageId) -> Result<ApiResponse, DispatchError> {
        self.call(Endpoint::ListPage(page_id))
    }

    pub fn update_page(
        &self,
        page_id: PageId,
        payload: impl Into<Payload>,
    ) -> Result<ApiResponse, DispatchError> {
        self.call(Endpoint::ModifyPage(page_id, payload.into()))
    }

    pub fn delete_page(&self, page_id: PageId) -> Result<ApiResponse, DispatchError> {
        self.call(Endpoint::DeletePage(page_id))
    }

    pub fn create_page_assets(
        &self,
        page_id: PageId,
        payload: impl Into<Payload>,
    ) -> Result<ApiResponse, DispatchError> {
        self.call(Endpoint::CreateAssets(page_id, payload.into()))
    }

    pub fn get_page_assets(
        &self,
        page_id: PageId,
        query: &AssetQuery,
    ) -> Result<ApiResponse, DispatchError> {
        self.call(Endpoint::ListAssets(page_id, query.clone()))
    }

    pub fn update_page_assets(
        &self,
        page_id: PageId,
        payload: impl Into<Payload>,
    ) -> Result<ApiResponse, DispatchError> {
        self.call(Endpoint::ModifyAssets(page_id, payload.into()))
    }

    pub fn delete_page_assets(
        &self,
        page_id: PageId,
        payload: impl Into<Payload>,
    ) -> Result<ApiResponse, DispatchError> {
        self.call(Endpoint::DeleteAssets(page_id, payload.into()))
    }

    pub fn get_page_asset(
        &self,
        page_id: PageId,
        asset_id: AssetId,
    ) -> Result<ApiResponse, DispatchError> {
        self.call(Endpoint::ListAsset(page_id, asset_id))
    }

    pub fn update_page_asset(
        &self,
        page_id: PageId,
        asset_id: AssetId,
        payload: impl Into<Payload>,
    ) -> Result<ApiResponse, DispatchError> {
        self.call(Endpoint::ModifyAsset(page_id, asset_id, payload.into()))
    }

    pub fn delete_page_asset(
        &self,
        page_id: PageId,
        asset_id: AssetId,
    ) -> Result<ApiResponse, DispatchError> {
        self.call(Endpoint::DeleteAsset(page_id, asset_id))
    }

    fn identity(&self) -> &ClientIdentity {
        self.dispatcher.token_retriever().identity()
    }
}
