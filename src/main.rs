use std::fs;
use std::sync::Arc;

use anyhow::bail;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use touchline::auth::TokenGenerator;
use touchline::config::ServerConfig;
use touchline::media::MediaStorage;
use touchline::server::{AppState, create_router};
use touchline::store::{SqliteStore, Store};
use touchline::types::Token;

fn create_admin_token(generator: &TokenGenerator) -> anyhow::Result<(Token, String)> {
    let (raw_token, lookup, hash) = generator.generate()?;
    let token = Token {
        id: Uuid::new_v4().to_string(),
        token_hash: hash,
        token_lookup: lookup,
        created_at: Utc::now(),
        expires_at: None,
        last_used_at: None,
    };
    Ok((token, raw_token))
}

#[cfg(unix)]
fn set_restrictive_permissions(path: &std::path::Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        tracing::warn!("Failed to set permissions on {}: {e}", path.display());
    }
}

#[derive(Parser)]
#[command(name = "touchline")]
#[command(about = "Content backend for a youth football club", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, default_value = "8080")]
        port: u16,

        /// Data directory for database and uploaded media
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Season served by the current-tables endpoint
        #[arg(long, default_value = "2025-2026")]
        current_season: String,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Initialize the server (create database and admin token)
    Init {
        /// Data directory for database and uploaded media
        #[arg(long, default_value = "./data")]
        data_dir: String,
    },
}

fn run_init(data_dir: String) -> anyhow::Result<()> {
    let data_path: std::path::PathBuf = data_dir.into();
    fs::create_dir_all(&data_path)?;
    fs::create_dir_all(data_path.join("uploads"))?;

    let db_path = data_path.join("touchline.db");
    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;

    let token_file = data_path.join(".admin_token");

    if store.has_admin_token()? {
        bail!(
            "Server already initialized. Admin token exists at: {}",
            token_file.display()
        );
    }

    let generator = TokenGenerator::new();
    let (token, raw_token) = create_admin_token(&generator)?;

    store.create_token(&token)?;
    fs::write(&token_file, &raw_token)?;

    #[cfg(unix)]
    set_restrictive_permissions(&token_file);

    println!();
    println!("========================================");
    println!("Admin token (save this, it won't be shown again):");
    println!();
    println!("  {raw_token}");
    println!();
    println!("Token also written to: {}", token_file.display());
    println!("========================================");
    println!();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("touchline=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Admin { command } => match command {
            AdminCommands::Init { data_dir } => {
                run_init(data_dir)?;
            }
        },
        Commands::Serve {
            host,
            port,
            data_dir,
            current_season,
        } => {
            let config = ServerConfig {
                host,
                port,
                data_dir: data_dir.into(),
                current_season,
            };

            let token_file = config.data_dir.join(".admin_token");
            if !token_file.exists() {
                bail!(
                    "Server not initialized. Run 'touchline admin init' first to create the database and admin token."
                );
            }

            let store = SqliteStore::new(config.db_path())?;
            store.initialize()?;
            if !store.has_admin_token()? {
                bail!(
                    "Server not initialized. Run 'touchline admin init' first to create the database and admin token."
                );
            }

            info!("Admin token available at {}", token_file.display());

            let media = MediaStorage::new(config.uploads_dir());

            let state = Arc::new(AppState {
                store: Arc::new(store),
                media,
                config: config.clone(),
            });

            let app = create_router(state);
            let addr = config.socket_addr()?;

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = tokio::signal::ctrl_c().await;
                })
                .await?;
        }
    }

    Ok(())
}
