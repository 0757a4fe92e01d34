pub mod authenticator;
pub mod client;
pub mod commands;
pub mod dispatcher;
pub mod endpoints;
pub mod environment;
pub mod http;
pub mod http_client;
pub mod identity;
pub mod model;
pub mod parameters;
pub mod response;
pub mod status;
pub mod token;
pub mod token_retriever;

use crate::token::Token;
use thiserror::Error;

pub use client::SmallHay;

pub type ClientID = String;

#[derive(Error, Debug)]
pub enum TokenRetrieverError {
    #[error("retrieving token: `{0}`")]
    TokenRetrieverError(String),
    #[error("fetching access token: `{0}`")]
    AuthenticatorError(#[from] authenticator::AuthenticateError),
    #[error("access token received already expired")]
    ExpiredOnArrival,
    #[error("acquiring cache mutex lock")]
    PoisonError,
}

/// The TokenRetriever is responsible for providing a valid authorization token
pub trait TokenRetriever {
    fn retrieve(&self) -> Result<Token, TokenRetrieverError>;

    /// Last token obtained, valid or not, without performing any exchange.
    fn cached(&self) -> Option<Token>;
}
