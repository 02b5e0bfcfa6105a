//! tcg-shelf server
//!
//! Serves the personal card collection API over HTTP.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use tcg_shelf_db::CollectionStore;
use tcg_shelf_fetcher::TcgdexClient;
use tcg_shelf_lib::{CollectionManager, Settings};
use tcg_shelf_server::{Router, Server, ServerError};

#[derive(Parser)]
#[command(name = "tcg-shelf", version)]
#[command(about = "Search the card catalog and keep a personal collection", long_about = None)]
struct Cli {
    /// Settings file (defaults to the per-user config directory)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Interface to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Collection database file
    #[arg(long)]
    database: Option<PathBuf>,

    /// Catalog API base URL
    #[arg(long)]
    catalog_url: Option<String>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,

    /// Print the resolved settings and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn apply(&self, settings: &mut Settings) {
        if let Some(host) = &self.host {
            settings.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if let Some(path) = &self.database {
            settings.database_path = path.clone();
        }
        if let Some(url) = &self.catalog_url {
            settings.catalog_url = url.clone();
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ServerError> {
    let mut settings = Settings::load(cli.settings.as_deref())?;
    cli.apply(&mut settings);

    if cli.print_config {
        print!("{}", settings.to_toml_string()?);
        return Ok(());
    }

    log::info!("Using collection database {}", settings.database_path.display());
    let store = CollectionStore::open(&settings.database_path)?;
    let catalog = TcgdexClient::new(settings.client_options())?;
    log::info!("Using card catalog at {}", catalog.cards_url());

    let manager = Arc::new(CollectionManager::new(catalog, store));
    let server = Server::bind(settings.listen_address(), Router::new(manager)).await?;
    server
        .serve_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::warn!("Failed to listen for Ctrl-C: {e}");
                std::future::pending::<()>().await;
            }
        })
        .await?;
    Ok(())
}
