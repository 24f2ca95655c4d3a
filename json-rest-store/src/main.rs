use std::path::PathBuf;

use clap::Parser;
use json_rest_store::prelude::*;

/// Serve JSON documents as REST resources from an in-memory store
#[derive(Parser)]
#[command(name = "json-rest-store")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file; skips the usual search path
    #[arg(short, long, env = "JSON_REST_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on, overriding the configuration
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(port) = cli.port {
        config.service.port = port;
    }

    init_tracing(&config)?;

    if config.resources.is_empty() {
        tracing::warn!("No resources configured; every request will answer 404");
    }

    let app = build_router(&config);
    Server::new(config).serve(app).await
}

fn build_router(config: &Config) -> Router {
    let mut binder = JsonRestStore::new(MemoryStore::new());
    if let Some(name) = &config.store.sort_param {
        binder = binder.with_sort_param(name.as_str());
    }

    for resource in &config.resources {
        binder = binder.rest_with(&resource.path, &resource.id_field, resource.operations);
    }

    binder.into_router()
}
