use std::fmt;

use base64::{Engine, engine::general_purpose};

use crate::ClientID;

/// Client credentials of a SmallHay account, used only to obtain access tokens.
#[derive(Clone, PartialEq)]
pub struct ClientIdentity {
    client_id: ClientID,
    client_secret: ClientSecret,
}

impl ClientIdentity {
    pub fn new(client_id: impl Into<ClientID>, client_secret: impl Into<ClientSecret>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &ClientSecret {
        &self.client_secret
    }

    /// Value of the `Authorization` header used in the auth exchange.
    pub(crate) fn basic_authorization(&self) -> String {
        let credentials = format!("{}:{}", self.client_id, self.client_secret.0);
        format!("Basic {}", general_purpose::STANDARD.encode(credentials))
    }
}

impl fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientIdentity")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret)
            .finish()
    }
}

#[derive(Clone, PartialEq)]
pub struct ClientSecret(String);

impl ClientSecret {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl<S: AsRef<str>> From<S> for ClientSecret {
    fn from(secret: S) -> Self {
        ClientSecret(secret.as_ref().to_string())
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClientSecret: redacted")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_authorization_encodes_id_and_secret() {
        let identity = ClientIdentity::new("demo", "demo");
        assert_eq!(identity.basic_authorization(), "Basic ZGVtbzpkZW1v");
    }

    #[test]
    fn secret_is_redacted_from_debug() {
        let identity = ClientIdentity::new("client", "super-secret");
        let debug = format!("{identity:?}");
        assert!(debug.contains("client"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn secret_is_exposed_only_on_request() {
        let secret = ClientSecret::from("super-secret");
        assert_eq!(secret.expose(), "super-secret");
        assert_eq!(format!("{secret:?}"), "ClientSecret: redacted");
    }
}
