use clap::Parser;
use smallhay::SmallHay;
use smallhay::authenticator::HttpAuthenticator;
use smallhay::commands::resource::ResourceCommand;
use smallhay::commands::retrieve_token::RetrieveTokenCommand;
use smallhay::endpoints::Endpoint;
use smallhay::environment::SmallHayEnvironment;
use smallhay::http::client::HttpClient;
use smallhay::parameters::{Commands, ConnectionArgs, OutPutTokenFormat};
use smallhay::status::LastStatusCode;
use smallhay::token_retriever::TokenRetrieverWithCache;
use std::error::Error;
use std::sync::Arc;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "smallhay-cli", version, about = "Command line client of the SmallHay API")]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Log verbosity, repeat for more details
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let environment = cli.connection.environment()?;
    let http_client = HttpClient::with_config(cli.connection.http_config())
        .map_err(|e| format!("error creating http client: {}", e))?;

    match cli.command {
        Commands::RetrieveToken {
            output_token_format,
        } => {
            let http_authenticator =
                HttpAuthenticator::new(http_client, environment.auth_endpoint()?);
            let token_retriever = TokenRetrieverWithCache::new(
                cli.connection.identity(),
                http_authenticator,
                Arc::new(LastStatusCode::default()),
            );
            let token = RetrieveTokenCommand::new(token_retriever).retrieve_token()?;
            match output_token_format {
                OutPutTokenFormat::Plain => {
                    println!("{}", token.access_token());
                }
                OutPutTokenFormat::Json => {
                    let output = serde_json::to_string_pretty(&token)?;
                    println!("{}", output);
                }
            }
            Ok(())
        }
        Commands::Pages(command) => run_resource_command(
            &cli.connection,
            environment,
            http_client,
            command.into_endpoint()?,
        ),
        Commands::Assets(command) => run_resource_command(
            &cli.connection,
            environment,
            http_client,
            command.into_endpoint()?,
        ),
    }
}

fn run_resource_command(
    connection: &ConnectionArgs,
    environment: SmallHayEnvironment,
    http_client: HttpClient,
    endpoint: Endpoint,
) -> Result<(), Box<dyn Error>> {
    let mut client = SmallHay::with_http_client(connection.identity(), environment, http_client)?;
    client.set_connect_timeout(connection.connect_timeout());
    client.set_request_timeout(connection.request_timeout());

    let output = ResourceCommand::new(&client).run(endpoint)?;
    println!("{}", output.body);

    if output.is_success() {
        Ok(())
    } else {
        Err(format!("request failed with status {}", output.status).into())
    }
}
