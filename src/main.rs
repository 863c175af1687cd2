//! serve-config
//!
//! Reconciles single serve requests into the local daemon's serve
//! configuration document.
//!
//! # Architecture Overview
//!
//! ```text
//!   argv ──▶ cli ──▶ serve::service ──▶ target / mount (normalize)
//!                          │
//!                          ├──▶ store (get current document)
//!                          ├──▶ identity (self DNS name)
//!                          ├──▶ reconcile (clone, mutate, compare)
//!                          └──▶ store (set, only if changed)
//! ```

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use serve_config::cli::{run_serve, Cli, Commands};
use serve_config::config::{StoreBackend, ToolConfig};
use serve_config::fsprobe::OsFilesystem;
use serve_config::identity::{IdentityResolver, StaticIdentity};
use serve_config::local_api::LocalApiClient;
use serve_config::observability::logging;
use serve_config::serve::{Outcome, ServeService};
use serve_config::store::{ConfigStore, FileStore};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = cli.tool_config()?;

    logging::init(&config.observability.log_level);

    tracing::debug!(
        local_api = %config.local_api.base_url,
        store = ?config.store.backend,
        "Configuration loaded"
    );

    let service = build_service(&config)?;

    match &cli.command {
        Commands::Serve(args) => {
            let mut stdout = std::io::stdout();
            let outcome = run_serve(&service, args, tokio::io::stdin(), &mut stdout).await?;
            if outcome == Some(Outcome::Unchanged) {
                tracing::info!("Nothing to do");
            }
        }
    }

    Ok(())
}

type DynService = ServeService<Box<dyn ConfigStore>, Box<dyn IdentityResolver>, OsFilesystem>;

fn build_service(config: &ToolConfig) -> Result<DynService, reqwest::Error> {
    let api = LocalApiClient::new(
        &config.local_api.base_url,
        Duration::from_secs(config.local_api.timeout_secs),
    )?;

    let store: Box<dyn ConfigStore> = match config.store.backend {
        StoreBackend::LocalApi => Box::new(api.clone()),
        StoreBackend::File => Box::new(FileStore::new(&config.store.path)),
    };

    let identity: Box<dyn IdentityResolver> = if config.identity.dns_name.is_empty() {
        Box::new(api)
    } else {
        Box::new(StaticIdentity::new(config.identity.dns_name.as_str()))
    };

    Ok(ServeService::new(store, identity, OsFilesystem))
}
