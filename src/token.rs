use std::fmt;

use crate::{TokenRetrieverError, authenticator::TokenRetrievalResponse};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

pub type AccessToken = String;

/// Access token returned by the auth endpoint.
///
/// A token without `expires_at` never expires.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Token {
    expires_at: Option<DateTime<Utc>>,
    access_token: AccessToken,
}

impl Token {
    pub fn new(access_token: AccessToken, expires_at: Option<DateTime<Utc>>) -> Self {
        Token {
            access_token,
            expires_at,
        }
    }

    /// Builds the token described by an auth response received at `now`.
    ///
    /// The lifetime is `expires - created` as reported by the server, so the result does not
    /// depend on clock skew between client and server. A non positive lifetime yields a token
    /// that is already expired.
    pub fn from_response_at(
        response: &TokenRetrievalResponse,
        now: DateTime<Utc>,
    ) -> Result<Self, TokenRetrieverError> {
        let lifetime = response
            .expires
            .checked_sub(response.created)
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| {
                TokenRetrieverError::TokenRetrieverError(
                    "token lifetime is out of range".to_string(),
                )
            })?;

        let expires_at = now.checked_add_signed(lifetime).ok_or_else(|| {
            TokenRetrieverError::TokenRetrieverError(
                "Failed to calculate expiration time".to_string(),
            )
        })?;

        Ok(Token::new(response.access_token.to_owned(), Some(expires_at)))
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|expires_at| expires_at > now)
    }

    pub fn is_expired(&self) -> bool {
        !self.is_valid_at(Utc::now())
    }

    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bearer {}", self.access_token)
    }
}
