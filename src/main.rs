mod commands;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use shop_admin::api::admin::AttachmentFilter;
use shop_admin::session::FileTokenStore;
use shop_admin::{ApiClient, ClientConfig, TokenStore};

#[derive(Parser, Debug)]
#[command(name = "shop-admin", version, about = "Storefront admin console")]
struct Cli {
    /// Backend base URL (overrides SHOP_ADMIN_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session file (overrides SHOP_ADMIN_TOKEN_FILE)
    #[arg(long, global = true)]
    token_file: Option<PathBuf>,

    /// Keep tokens in the OS keychain instead of a session file
    #[cfg(all(feature = "keychain", any(target_os = "macos", target_os = "windows")))]
    #[arg(long, global = true)]
    keychain: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exchange email and password for a session
    Login {
        #[arg(long)]
        email: String,
        /// Falls back to SHOP_ADMIN_PASSWORD
        #[arg(long)]
        password: Option<String>,
    },
    /// Drop the stored session
    Logout,
    /// Show whether a session is stored
    Status,
    /// Force a token refresh
    Refresh,
    /// Headline counters
    Dashboard,
    /// List categories, or show one
    Categories {
        #[arg(long)]
        id: Option<u64>,
    },
    /// Create a category (or update one with --id) from a JSON payload
    SaveCategory {
        #[arg(long)]
        id: Option<u64>,
        json: String,
    },
    /// List products, or show one
    Products {
        #[arg(long)]
        id: Option<u64>,
    },
    /// Create a product (or update one with --id) from a JSON payload
    SaveProduct {
        #[arg(long)]
        id: Option<u64>,
        json: String,
    },
    /// List attachments
    Attachments {
        /// all, active, inactive, linked, active-linked, inactive-linked,
        /// unlinked, active-unlinked, inactive-unlinked
        #[arg(long, default_value_t = AttachmentFilter::All)]
        filter: AttachmentFilter,
    },
    /// Attachment counters for the files page
    AttachmentStats,
    /// Show attachment metadata
    Attachment { id: u64 },
    /// Upload a file, or replace an existing attachment with --replace
    Upload {
        file: PathBuf,
        #[arg(long)]
        replace: Option<u64>,
        #[arg(long, default_value = "application/octet-stream")]
        mime: String,
    },
    /// Download attachment content
    Download {
        id: u64,
        #[arg(long)]
        out: PathBuf,
    },
    Activate { id: u64 },
    Deactivate { id: u64 },
    /// Issue a raw authenticated request
    Request {
        path: String,
        #[arg(long)]
        method: Option<String>,
        /// JSON request body
        #[arg(long)]
        data: Option<String>,
    },
}

fn build_store(cli: &Cli, config: &ClientConfig) -> Arc<dyn TokenStore> {
    #[cfg(all(feature = "keychain", any(target_os = "macos", target_os = "windows")))]
    {
        if cli.keychain {
            log::debug!("Using OS keychain token store");
            return Arc::new(shop_admin::session::KeychainTokenStore::default());
        }
    }

    let path = cli
        .token_file
        .clone()
        .or_else(|| config.token_file.clone())
        .unwrap_or_else(FileTokenStore::default_path);
    log::debug!("Using session file {}", path.display());
    Arc::new(FileTokenStore::new(path))
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    env_logger::init();

    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let config = match cli.api_url.as_deref() {
        Some(url) => match config.with_base_url(url) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => config,
    };

    let store = build_store(&cli, &config);
    let client = ApiClient::from_config(&config, store);
    log::debug!("Admin API at {}", client.base_url());

    let result = match cli.command {
        Command::Login { email, password } => commands::login(&client, &email, password).await,
        Command::Logout => commands::logout(&client),
        Command::Status => commands::status(&client),
        Command::Refresh => commands::refresh(&client).await,
        Command::Dashboard => commands::dashboard(&client).await,
        Command::Categories { id } => commands::categories(&client, id).await,
        Command::SaveCategory { id, json } => commands::save_category(&client, id, &json).await,
        Command::Products { id } => commands::products(&client, id).await,
        Command::SaveProduct { id, json } => commands::save_product(&client, id, &json).await,
        Command::Attachments { filter } => commands::attachments(&client, filter).await,
        Command::AttachmentStats => commands::attachment_stats(&client).await,
        Command::Attachment { id } => commands::attachment(&client, id).await,
        Command::Upload { file, replace, mime } => {
            commands::upload(&client, &file, replace, &mime).await
        }
        Command::Download { id, out } => commands::download(&client, id, &out).await,
        Command::Activate { id } => commands::set_active(&client, id, true).await,
        Command::Deactivate { id } => commands::set_active(&client, id, false).await,
        Command::Request { path, method, data } => {
            commands::raw_request(&client, &path, method.as_deref(), data.as_deref()).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
