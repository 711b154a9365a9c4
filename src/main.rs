use anyhow::{Context, Result};
use clap::Parser;
use sensorviz::{cli, config, db, openapi, repository, routes, service, state};
use std::sync::Arc;
use tokio::net::TcpListener;

async fn bind_listener(addr: &str) -> Result<TcpListener> {
    match TcpListener::bind(addr).await {
        Ok(listener) => Ok(listener),
        Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
            anyhow::bail!(
                "Failed to bind sensorviz listener on {addr}: port already in use. Stop the other service using this port or re-run with --port to choose another port.",
            );
        }
        Err(err) => {
            Err(err).with_context(|| format!("failed to bind sensorviz listener on {addr}"))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    if args.print_openapi {
        println!("{}", serde_json::to_string_pretty(&openapi::openapi_json())?);
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = config::AppConfig::from_env();
    let client = db::connect(&config.mongodb_uri).await?;
    let repo = Arc::new(repository::MongoSensorRepository::new(client, &config));

    let state = state::AppState {
        config: config.clone(),
        service: service::QueryService::new(repo),
    };

    let app = routes::router(state);
    let addr = format!("{}:{}", args.host, args.port);
    let listener = bind_listener(&addr).await?;
    tracing::info!(%addr, database = %config.database, "starting sensorviz server");
    axum::serve(listener, app).await?;
    Ok(())
}
