//! NIFCLOUD client with convenience APIs.

pub use nifsign_nifcloud::*;

#[cfg(feature = "default-context")]
use crate::default_context;

/// Create a client for the given service and region with the default context.
///
/// Credentials come from the default sources, see [`DefaultCredentialProvider`].
///
/// # Example
///
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> nifsign::Result<()> {
/// let client = nifsign::nifcloud::default_client("computing", "jp-east-1");
///
/// let resp = client
///     .post(None, [("Action", "DescribeInstances")], Default::default())
///     .await?;
/// println!("{}", resp.status());
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "default-context")]
pub fn default_client(service_name: &str, region_name: &str) -> Client {
    Client::new(
        default_context(),
        Config::new(service_name).with_region_name(region_name),
    )
}
