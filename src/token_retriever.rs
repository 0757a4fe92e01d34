use crate::authenticator::Authenticator;
use crate::identity::ClientIdentity;
use crate::status::LastStatusCode;
use crate::token::Token;
use crate::{TokenRetriever, TokenRetrieverError};

use chrono::Utc;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Token retriever that keeps the last access token and only authenticates again once it is
/// missing or expired.
///
/// The cache lock is held while refreshing, so concurrent callers wait for the ongoing refresh
/// instead of starting their own auth exchange.
pub struct TokenRetrieverWithCache<A>
where
    A: Authenticator,
{
    identity: ClientIdentity,
    tokens: Mutex<Option<Token>>,
    authenticator: A,
    last_status: Arc<LastStatusCode>,
}

impl<A> TokenRetriever for TokenRetrieverWithCache<A>
where
    A: Authenticator,
{
    fn retrieve(&self) -> Result<Token, TokenRetrieverError> {
        let mut cached_token = self
            .tokens
            .lock()
            .map_err(|_| TokenRetrieverError::PoisonError)?;

        if let Some(token) = cached_token.as_ref().filter(|t| !t.is_expired()) {
            return Ok(token.to_owned());
        }

        let token = self.refresh_token().inspect_err(|e| {
            debug!("error refreshing token: {e}");
        })?;
        *cached_token = Some(token.to_owned());

        if token.is_expired() {
            debug!("authorization token refreshed but already expired");
            return Err(TokenRetrieverError::ExpiredOnArrival);
        }

        debug!("authorization token refreshed");
        Ok(token)
    }

    fn cached(&self) -> Option<Token> {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .to_owned()
    }
}

impl<A> TokenRetrieverWithCache<A>
where
    A: Authenticator,
{
    /// Creates a retriever without any cached token. Auth exchanges record their status in
    /// `last_status`.
    pub fn new(
        identity: ClientIdentity,
        authenticator: A,
        last_status: Arc<LastStatusCode>,
    ) -> Self {
        Self {
            identity,
            tokens: Mutex::new(None),
            authenticator,
            last_status,
        }
    }

    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    fn refresh_token(&self) -> Result<Token, TokenRetrieverError> {
        let received_at = Utc::now();
        match self.authenticator.authenticate(&self.identity) {
            Ok(response) => {
                self.last_status.record(::http::StatusCode::OK.as_u16());
                Token::from_response_at(&response, received_at)
            }
            Err(e) => {
                if let Some(status) = e.status_code() {
                    self.last_status.record(status);
                }
                Err(e.into())
            }
        }
    }
}
