use anyhow::{Context, Result};
use mongodb::options::ClientOptions;
use mongodb::Client;

/// Builds a lazily connecting MongoDB client; no I/O happens until the first
/// operation is issued against it.
pub async fn connect(uri: &str) -> Result<Client> {
    let mut options = ClientOptions::parse(uri)
        .await
        .with_context(|| format!("failed to parse MongoDB URI {uri}"))?;
    options.app_name = Some("sensorviz".to_string());
    Client::with_options(options).context("failed to create MongoDB client")
}
