//! greader-api binary entry point.
//!
//! Usage:
//! ```bash
//! greader-api --config greader.toml serve
//! greader-api hash-password
//! greader-api --config greader.toml token --user alice
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use greader_api::config::Config;
use greader_api::http::build_router;
use greader_api::server::ReaderApi;
use greader_api::storage::SqliteStore;
use greader_api::users::{hash_password, ConfigUsers, UserDirectory};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Google Reader compatible sync API server.
#[derive(Parser, Debug)]
#[command(name = "greader-api")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = "greader.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    Serve,

    /// Hash an API password for the [[users]] table (prompts for it)
    HashPassword,

    /// Print the API token of a configured user
    Token {
        /// Username
        #[arg(long, short)]
        user: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => {
            let config = load_config(&cli.config)?;
            init_logging(&config);
            serve(config).await?;
        }
        Commands::HashPassword => {
            let password = rpassword::prompt_password("API password: ")
                .context("Failed to read password")?;
            let confirm = rpassword::prompt_password("Repeat: ")
                .context("Failed to read password")?;
            if password != confirm {
                anyhow::bail!("Passwords do not match");
            }
            let phc = hash_password(&password)
                .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;
            println!("{phc}");
        }
        Commands::Token { user } => {
            let config = load_config(&cli.config)?;
            let salt = config
                .api
                .salt
                .as_deref()
                .context("No [api] salt configured")?;
            let account = ConfigUsers::new(&config.users)
                .find(&user)
                .with_context(|| format!("Unknown user {user}"))?;
            let tokens = greader_core::TokenService::new(salt);
            println!("{}", tokens.issue(&account.name, &account.api_password_hash));
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<Config> {
    Config::from_file(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn serve(config: Config) -> Result<()> {
    let bind_address = config.server.bind_address.clone();

    let store = SqliteStore::new(&config.storage.database)
        .await
        .with_context(|| format!("Failed to open database {}", config.storage.database.display()))?;
    let users = ConfigUsers::new(&config.users);
    if users.is_empty() {
        tracing::warn!("No [[users]] configured: every login will fail");
    }

    let api = Arc::new(ReaderApi::new(config, Arc::new(store), Arc::new(users)));
    let app = build_router(api);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    tracing::info!(
        "greader-api v{} listening on {}",
        env!("CARGO_PKG_VERSION"),
        bind_address
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
