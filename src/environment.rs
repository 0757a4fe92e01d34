use http::Uri;
use http::uri::InvalidUri;

const PRODUCTION_API_ENDPOINT_STR: &str = "https://api.smallhay.com/v1";
const TEST_API_ENDPOINT_STR: &str = "https://test-api.smallhay.com/v1";

const AUTH_PATH: &str = "auth";

#[derive(thiserror::Error, Debug)]
pub enum EnvironmentError {
    #[error("invalid api endpoint `{0}`: `{1}`")]
    InvalidEndpoint(String, String),
}

/// Represents the SmallHay environment the client talks to.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SmallHayEnvironment {
    #[default]
    Production,
    Test,
    /// Any other deployment of the API, identified by its base url (`https://host/v1`).
    Custom { api_endpoint: String },
}

impl SmallHayEnvironment {
    /// Selects the test or production environment, as the `test` flag of the client constructor.
    pub fn from_test_flag(test: bool) -> Self {
        if test { Self::Test } else { Self::Production }
    }

    /// Builds a custom environment, validating that the url is absolute.
    pub fn custom(api_endpoint: &str) -> Result<Self, EnvironmentError> {
        let uri = api_endpoint.parse::<Uri>().map_err(|e| {
            EnvironmentError::InvalidEndpoint(api_endpoint.to_string(), e.to_string())
        })?;
        if uri.scheme().is_none() || uri.host().is_none() {
            return Err(EnvironmentError::InvalidEndpoint(
                api_endpoint.to_string(),
                "scheme and host are required".to_string(),
            ));
        }

        Ok(Self::Custom {
            api_endpoint: api_endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn is_test(&self) -> bool {
        matches!(self, Self::Test)
    }

    /// Base url every endpoint path is appended to, without trailing slash.
    pub fn api_endpoint(&self) -> &str {
        match self {
            Self::Production => PRODUCTION_API_ENDPOINT_STR,
            Self::Test => TEST_API_ENDPOINT_STR,
            Self::Custom { api_endpoint } => api_endpoint,
        }
    }

    /// Full URI of an endpoint relative to the api base (`pages`, `pages/1/assets?type=all`...).
    pub fn endpoint(&self, path: &str) -> Result<Uri, InvalidUri> {
        format!("{}/{}", self.api_endpoint(), path.trim_start_matches('/')).parse()
    }

    /// URI of the authentication endpoint.
    pub fn auth_endpoint(&self) -> Result<Uri, InvalidUri> {
        self.endpoint(AUTH_PATH)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(
        SmallHayEnvironment::Production,
        "https://api.smallhay.com/v1/auth",
        "https://api.smallhay.com/v1/pages?offset=0&limit=100"
    )]
    #[case(
        SmallHayEnvironment::Test,
        "https://test-api.smallhay.com/v1/auth",
        "https://test-api.smallhay.com/v1/pages?offset=0&limit=100"
    )]
    #[case(
        SmallHayEnvironment::custom("http://localhost:8080/v1/").unwrap(),
        "http://localhost:8080/v1/auth",
        "http://localhost:8080/v1/pages?offset=0&limit=100"
    )]
    fn endpoints(
        #[case] env: SmallHayEnvironment,
        #[case] expected_auth_url: &str,
        #[case] expected_pages_url: &str,
    ) {
        assert_eq!(env.auth_endpoint().unwrap().to_string(), expected_auth_url);
        assert_eq!(
            env.endpoint("pages?offset=0&limit=100").unwrap().to_string(),
            expected_pages_url
        );
    }

    #[rstest]
    #[case(true, SmallHayEnvironment::Test)]
    #[case(false, SmallHayEnvironment::Production)]
    fn test_flag_selects_environment(#[case] test: bool, #[case] expected: SmallHayEnvironment) {
        let env = SmallHayEnvironment::from_test_flag(test);
        assert_eq!(env.is_test(), test);
        assert_eq!(env, expected);
    }

    #[rstest]
    #[case("not a url")]
    #[case("/v1")]
    fn invalid_custom_endpoint(#[case] endpoint: &str) {
        assert_matches!(
            SmallHayEnvironment::custom(endpoint),
            Err(EnvironmentError::InvalidEndpoint(s, _)) => assert_eq!(s, endpoint)
        );
    }
}
