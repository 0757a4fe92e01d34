use crate::SmallHay;
use crate::dispatcher::DispatchError;
use crate::endpoints::Endpoint;
use crate::http_client::HttpClient;
use crate::response::{ApiResponse, Decoded};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("request failed: `{0}`")]
    Dispatch(#[from] DispatchError),
    #[error("formatting response: `{0}`")]
    Output(#[from] serde_json::Error),
}

/// Status and printable body of a resource call.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    pub status: u16,
    pub body: String,
}

impl CommandOutput {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub struct ResourceCommand<'a, C>
where
    C: HttpClient,
{
    client: &'a SmallHay<C>,
}

impl<'a, C> ResourceCommand<'a, C>
where
    C: HttpClient,
{
    pub fn new(client: &'a SmallHay<C>) -> Self {
        Self { client }
    }

    /// Performs the call. JSON bodies are pretty printed, anything else is returned as received.
    pub fn run(&self, endpoint: Endpoint) -> Result<CommandOutput, ResourceError> {
        debug!(?endpoint, "running resource command");
        let response = self.client.call(endpoint)?;
        render(response)
    }
}

fn render(response: ApiResponse) -> Result<CommandOutput, ResourceError> {
    let status = response.status().as_u16();
    let body = match response.into_body() {
        Decoded::Json(value) => serde_json::to_string_pretty(&value)?,
        Decoded::Invalid { raw, .. } => String::from_utf8_lossy(&raw).into_owned(),
    };

    Ok(CommandOutput { status, body })
}
