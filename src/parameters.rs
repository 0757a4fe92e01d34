use crate::endpoints::{AssetId, AssetQuery, Endpoint, PageId, Pagination, Payload};
use crate::environment::SmallHayEnvironment;
use crate::http::config::{HttpConfig, ProxySettings};
use crate::identity::ClientIdentity;
use clap::error::ErrorKind;
use clap::{Args, Error, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// ID of the client
    #[arg(long, short = 'i', env = "SMALLHAY_CLIENT_ID")]
    client_id: String,

    /// Secret of the client
    #[arg(long, short = 's', env = "SMALLHAY_CLIENT_SECRET", hide_env_values = true)]
    client_secret: String,

    /// Environment to target
    #[arg(long, short, value_enum, default_value = "production")]
    environment: Environments,

    /// Base url of the API, e.g. https://api.example.com/v1. Required with '--environment custom'.
    #[arg(long)]
    api_endpoint: Option<String>,

    /// Seconds allowed to establish a connection
    #[arg(long, default_value_t = 2)]
    connect_timeout: u64,

    /// Seconds allowed for a whole request
    #[arg(long, default_value_t = 4)]
    request_timeout: u64,

    /// 'system' follows HTTPS_PROXY, HTTP_PROXY and NO_PROXY, 'direct' ignores them,
    /// anything else is the url of the proxy to use.
    #[arg(long, default_value = "system")]
    proxy: ProxySettings,
}

impl ConnectionArgs {
    pub fn identity(&self) -> ClientIdentity {
        ClientIdentity::new(self.client_id.as_str(), self.client_secret.as_str())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn environment(&self) -> Result<SmallHayEnvironment, Error> {
        select_environment(&self.environment, self.api_endpoint.as_deref())
    }

    pub fn http_config(&self) -> HttpConfig {
        HttpConfig::new(
            self.request_timeout(),
            self.connect_timeout(),
            self.proxy.clone(),
        )
    }
}

#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum Environments {
    #[value(name = "production")]
    Production,
    #[value(name = "test")]
    Test,
    #[value(name = "custom")]
    Custom,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticates with the client credentials and prints the access token.
    RetrieveToken {
        /// Select format how the Token should be obtained
        #[arg(long, default_value = "Plain")]
        output_token_format: OutPutTokenFormat,
    },
    /// Manage pages.
    #[command(subcommand)]
    Pages(PagesCommand),
    /// Manage the assets of a page.
    #[command(subcommand)]
    Assets(AssetsCommand),
}

#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum OutPutTokenFormat {
    /// Returns only the access token
    #[value(name = "Plain")]
    Plain,
    /// Returns full token information in json format
    #[value(name = "Json")]
    Json,
}

#[derive(Subcommand, Debug)]
pub enum PagesCommand {
    /// List pages.
    List(PaginationArgs),
    /// Show a single page.
    Get { page_id: PageId },
    /// Create pages from a JSON list of paths, e.g. '["/test"]'.
    Create(PayloadArgs),
    /// Update pages. Updates a single page when '--page-id' is set.
    Update {
        #[arg(long)]
        page_id: Option<PageId>,

        #[command(flatten)]
        payload: PayloadArgs,
    },
    /// Delete a single page, or the pages listed in the payload.
    Delete(DeleteArgs),
}

#[derive(Subcommand, Debug)]
pub enum AssetsCommand {
    /// List the assets of a page.
    List {
        page_id: PageId,

        /// Asset type to list
        #[arg(long = "type", default_value = "all")]
        asset_type: String,

        #[command(flatten)]
        pagination: PaginationArgs,
    },
    /// Show a single asset.
    Get { page_id: PageId, asset_id: AssetId },
    /// Create assets of a page.
    Create {
        page_id: PageId,

        #[command(flatten)]
        payload: PayloadArgs,
    },
    /// Update assets of a page. Updates a single asset when '--asset-id' is set.
    Update {
        page_id: PageId,

        #[arg(long)]
        asset_id: Option<AssetId>,

        #[command(flatten)]
        payload: PayloadArgs,
    },
    /// Delete a single asset, or the assets listed in the payload.
    Delete {
        page_id: PageId,

        #[command(flatten)]
        target: DeleteAssetArgs,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct PaginationArgs {
    #[arg(long, default_value_t = 0)]
    offset: u64,

    #[arg(long, default_value_t = 100)]
    limit: u64,
}

impl From<PaginationArgs> for Pagination {
    fn from(args: PaginationArgs) -> Self {
        Pagination {
            offset: args.offset,
            limit: args.limit,
        }
    }
}

/// JSON body of write operations, inline or read from a file.
#[derive(Args, Debug, Clone, PartialEq)]
#[group(id = "payload-input", required = true, multiple = false)]
pub struct PayloadArgs {
    /// Inline JSON payload
    #[arg(long, group = "payload-input")]
    data: Option<String>,

    /// Path to a file holding the JSON payload
    #[arg(long, group = "payload-input")]
    file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, PartialEq)]
#[group(id = "page-delete-target", required = true, multiple = false)]
pub struct DeleteArgs {
    /// Page to delete
    #[arg(long, group = "page-delete-target")]
    page_id: Option<PageId>,

    /// Inline JSON payload listing the pages to delete
    #[arg(long, group = "page-delete-target")]
    data: Option<String>,

    /// Path to a file holding the JSON payload
    #[arg(long, group = "page-delete-target")]
    file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, PartialEq)]
#[group(id = "asset-delete-target", required = true, multiple = false)]
pub struct DeleteAssetArgs {
    /// Asset to delete
    #[arg(long, group = "asset-delete-target")]
    asset_id: Option<AssetId>,

    /// Inline JSON payload listing the assets to delete
    #[arg(long, group = "asset-delete-target")]
    data: Option<String>,

    /// Path to a file holding the JSON payload
    #[arg(long, group = "asset-delete-target")]
    file: Option<PathBuf>,
}

pub fn select_environment(
    environment: &Environments,
    api_endpoint: Option<&str>,
) -> Result<SmallHayEnvironment, Error> {
    match environment {
        Environments::Production => Ok(SmallHayEnvironment::Production),
        Environments::Test => Ok(SmallHayEnvironment::Test),
        Environments::Custom => {
            let api_endpoint = api_endpoint.ok_or_else(|| {
                Error::raw(
                    ErrorKind::MissingRequiredArgument,
                    "'--api-endpoint' is required with '--environment custom'",
                )
            })?;
            SmallHayEnvironment::custom(api_endpoint)
                .map_err(|e| Error::raw(ErrorKind::ValueValidation, e.to_string()))
        }
    }
}

/// Reads the payload from the inline value or the given file.
pub fn select_payload(data: Option<&str>, file: Option<&PathBuf>) -> Result<Payload, Error> {
    match (data, file) {
        (Some(data), _) => Ok(Payload::from(data)),
        (None, Some(path)) => Ok(Payload::from(fs::read(path)?)),
        (None, None) => Err(Error::raw(
            ErrorKind::MissingRequiredArgument,
            "a payload is required, use '--data' or '--file'",
        )),
    }
}

impl PayloadArgs {
    pub fn payload(&self) -> Result<Payload, Error> {
        select_payload(self.data.as_deref(), self.file.as_ref())
    }
}

impl PagesCommand {
    pub fn into_endpoint(self) -> Result<Endpoint, Error> {
        let endpoint = match self {
            PagesCommand::List(pagination) => Endpoint::ListPages(pagination.into()),
            PagesCommand::Get { page_id } => Endpoint::ListPage(page_id),
            PagesCommand::Create(payload) => Endpoint::CreatePages(payload.payload()?),
            PagesCommand::Update {
                page_id: Some(page_id),
                payload,
            } => Endpoint::ModifyPage(page_id, payload.payload()?),
            PagesCommand::Update {
                page_id: None,
                payload,
            } => Endpoint::ModifyPages(payload.payload()?),
            PagesCommand::Delete(DeleteArgs {
                page_id: Some(page_id),
                ..
            }) => Endpoint::DeletePage(page_id),
            PagesCommand::Delete(DeleteArgs { data, file, .. }) => {
                Endpoint::DeletePages(select_payload(data.as_deref(), file.as_ref())?)
            }
        };
        Ok(endpoint)
    }
}

impl AssetsCommand {
    pub fn into_endpoint(self) -> Result<Endpoint, Error> {
        let endpoint = match self {
            AssetsCommand::List {
                page_id,
                asset_type,
                pagination,
            } => Endpoint::ListAssets(
                page_id,
                AssetQuery {
                    asset_type,
                    pagination: pagination.into(),
                },
            ),
            AssetsCommand::Get { page_id, asset_id } => Endpoint::ListAsset(page_id, asset_id),
            AssetsCommand::Create { page_id, payload } => {
                Endpoint::CreateAssets(page_id, payload.payload()?)
            }
            AssetsCommand::Update {
                page_id,
                asset_id: Some(asset_id),
                payload,
            } => Endpoint::ModifyAsset(page_id, asset_id, payload.payload()?),
            AssetsCommand::Update {
                page_id,
                asset_id: None,
                payload,
            } => Endpoint::ModifyAssets(page_id, payload.payload()?),
            AssetsCommand::Delete {
                page_id,
                target:
                    DeleteAssetArgs {
                        asset_id: Some(asset_id),
                        ..
                    },
            } => Endpoint::DeleteAsset(page_id, asset_id),
            AssetsCommand::Delete {
                page_id,
                target: DeleteAssetArgs { data, file, .. },
            } => Endpoint::DeleteAssets(page_id, select_payload(data.as_deref(), file.as_ref())?),
        };
        Ok(endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use clap::Parser;
    use rstest::rstest;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        connection: ConnectionArgs,

        #[command(subcommand)]
        command: Commands,
    }

    fn parse(args: &[&str]) -> Result<TestCli, Error> {
        let base = ["smallhay-cli", "--client-id", "demo", "--client-secret", "demo"];
        TestCli::try_parse_from(base.iter().chain(args))
    }

    fn endpoint(args: &[&str]) -> Endpoint {
        match parse(args).unwrap().command {
            Commands::Pages(command) => command.into_endpoint().unwrap(),
            Commands::Assets(command) => command.into_endpoint().unwrap(),
            Commands::RetrieveToken { .. } => panic!("not a resource command"),
        }
    }

    #[test]
    fn connection_defaults() {
        let cli = parse(&["retrieve-token"]).unwrap();

        assert_eq!(cli.connection.identity(), ClientIdentity::new("demo", "demo"));
        assert_eq!(
            cli.connection.environment().unwrap(),
            SmallHayEnvironment::Production
        );
        assert_eq!(cli.connection.connect_timeout(), Duration::from_secs(2));
        assert_eq!(cli.connection.request_timeout(), Duration::from_secs(4));
        assert_matches!(
            cli.command,
            Commands::RetrieveToken {
                output_token_format: OutPutTokenFormat::Plain
            }
        );
    }

    #[rstest]
    #[case(&["--environment", "test"], SmallHayEnvironment::Test)]
    #[case(
        &["--environment", "custom", "--api-endpoint", "http://localhost:8080/v1/"],
        SmallHayEnvironment::Custom { api_endpoint: "http://localhost:8080/v1".to_string() }
    )]
    fn environments(#[case] args: &[&str], #[case] expected: SmallHayEnvironment) {
        let args: Vec<&str> = args.iter().copied().chain(["retrieve-token"]).collect();
        let cli = parse(&args).unwrap();

        assert_eq!(cli.connection.environment().unwrap(), expected);
    }

    #[test]
    fn custom_environment_requires_endpoint() {
        let cli = parse(&["--environment", "custom", "retrieve-token"]).unwrap();

        let err = cli.connection.environment().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[rstest]
    #[case(&[], ProxySettings::System)]
    #[case(&["--proxy", "direct"], ProxySettings::Direct)]
    #[case(
        &["--proxy", "http://proxy.internal:3128"],
        ProxySettings::Through("http://proxy.internal:3128".parse().unwrap())
    )]
    fn proxy_option(#[case] args: &[&str], #[case] expected: ProxySettings) {
        let args: Vec<&str> = args.iter().copied().chain(["retrieve-token"]).collect();
        let cli = parse(&args).unwrap();

        assert_eq!(cli.connection.http_config().proxy, expected);
    }

    #[test]
    fn invalid_proxy_is_rejected() {
        let err = parse(&["--proxy", "proxy.internal:3128", "retrieve-token"]).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[rstest]
    #[case(&["pages", "list"], Endpoint::ListPages(Pagination::default()))]
    #[case(
        &["pages", "list", "--offset", "100", "--limit", "10"],
        Endpoint::ListPages(Pagination { offset: 100, limit: 10 })
    )]
    #[case(&["pages", "get", "12"], Endpoint::ListPage(12))]
    #[case(&["pages", "create", "--data", r#"["/test"]"#], Endpoint::CreatePages(r#"["/test"]"#.into()))]
    #[case(&["pages", "update", "--data", "{}"], Endpoint::ModifyPages("{}".into()))]
    #[case(
        &["pages", "update", "--page-id", "12", "--data", "{}"],
        Endpoint::ModifyPage(12, "{}".into())
    )]
    #[case(&["pages", "delete", "--page-id", "12"], Endpoint::DeletePage(12))]
    #[case(&["pages", "delete", "--data", "[12]"], Endpoint::DeletePages("[12]".into()))]
    #[case(&["assets", "list", "12"], Endpoint::ListAssets(12, AssetQuery::default()))]
    #[case(
        &["assets", "list", "12", "--type", "javascript", "--limit", "5"],
        Endpoint::ListAssets(12, AssetQuery {
            asset_type: "javascript".to_string(),
            pagination: Pagination { offset: 0, limit: 5 },
        })
    )]
    #[case(&["assets", "get", "12", "7"], Endpoint::ListAsset(12, 7))]
    #[case(&["assets", "create", "12", "--data", "[]"], Endpoint::CreateAssets(12, "[]".into()))]
    #[case(&["assets", "update", "12", "--data", "[]"], Endpoint::ModifyAssets(12, "[]".into()))]
    #[case(
        &["assets", "update", "12", "--asset-id", "7", "--data", "{}"],
        Endpoint::ModifyAsset(12, 7, "{}".into())
    )]
    #[case(&["assets", "delete", "12", "--asset-id", "7"], Endpoint::DeleteAsset(12, 7))]
    #[case(&["assets", "delete", "12", "--data", "[7]"], Endpoint::DeleteAssets(12, "[7]".into()))]
    fn resource_commands(#[case] args: &[&str], #[case] expected: Endpoint) {
        assert_eq!(endpoint(args), expected);
    }

    #[rstest]
    #[case(&["pages", "create"])]
    #[case(&["pages", "delete"])]
    #[case(&["pages", "delete", "--page-id", "12", "--data", "[12]"])]
    #[case(&["assets", "delete", "12"])]
    fn invalid_resource_commands(#[case] args: &[&str]) {
        assert!(parse(args).is_err());
    }

    #[test]
    fn payload_from_missing_file() {
        let payload = PayloadArgs {
            data: None,
            file: Some(PathBuf::from("/nonexistent/payload.json")),
        };

        assert_eq!(payload.payload().unwrap_err().kind(), ErrorKind::Io);
    }
}
