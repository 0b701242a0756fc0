//! Larder CLI - grocery lists and recipes from the terminal.
//!
//! A thin front end over `larder-core`: it loads configuration, picks a
//! bearer token source, runs one command and prints plain text.

mod commands;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use larder_core::{Config, CredentialStore, StaticToken, Store, TokenProvider};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::Command;

/// Environment variable overriding the configured API base URL
const API_URL_ENV: &str = "LARDER_API_URL";

/// Environment variable supplying a bearer token directly
const TOKEN_ENV: &str = "LARDER_TOKEN";

/// Log file name prefix inside the log directory
const LOG_FILE_PREFIX: &str = "larder.log";

/// Initialize the tracing subscriber for logging.
///
/// Logs go to a daily rolling file so stdout carries only command output;
/// stderr is used when no log directory is available. The returned guard
/// must live until exit to flush buffered lines.
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_dir = config.log_dir().and_then(|dir| {
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    });

    match log_dir {
        Ok(log_dir) => {
            let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        Err(_) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

/// Pick the token source: `LARDER_TOKEN` first, then the keychain entry for
/// the last username that logged in.
fn token_provider(config: &Config) -> Result<Arc<dyn TokenProvider>> {
    if let Ok(token) = std::env::var(TOKEN_ENV) {
        return Ok(Arc::new(StaticToken::new(token)));
    }
    let username = config
        .last_username
        .clone()
        .context("Not logged in. Run `larder login <username>` or set LARDER_TOKEN.")?;
    let credentials = CredentialStore::new(username);
    if !credentials.has_token() {
        anyhow::bail!(
            "No token stored for {}. Run `larder login {}` again.",
            credentials.username(),
            credentials.username()
        );
    }
    Ok(Arc::new(credentials))
}

fn login(config: &mut Config, username: &str) -> Result<()> {
    let token = rpassword::prompt_password("Bearer token: ").context("Failed to read token")?;
    let token = token.trim();
    if token.is_empty() {
        anyhow::bail!("Token must not be empty");
    }

    CredentialStore::new(username).store(token)?;
    config.last_username = Some(username.to_string());
    config.save().context("Failed to save config")?;
    println!("Token stored for {}", username);
    Ok(())
}

fn logout(config: &mut Config) -> Result<()> {
    let Some(username) = config.last_username.take() else {
        println!("Not logged in");
        return Ok(());
    };

    CredentialStore::new(username.as_str()).delete()?;
    config.save().context("Failed to save config")?;
    println!("Token removed for {}", username);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config, using defaults: {}", e);
            Config::default()
        }
    };
    if let Ok(url) = std::env::var(API_URL_ENV) {
        config.api_base_url = url;
    }

    let _log_guard = init_tracing(&config);
    info!(api = %config.api_base_url, "Larder CLI starting");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if matches!(args.first().map(String::as_str), Some("help" | "--help" | "-h")) {
        println!("{}", commands::USAGE);
        return Ok(());
    }

    let command = Command::parse(&args)?;
    match &command {
        Command::Login { username } => return login(&mut config, username),
        Command::Logout => return logout(&mut config),
        _ => {}
    }

    let store = Store::from_config(&config, token_provider(&config)?)?;
    let result = commands::run(&store, command).await;
    if let Err(ref e) = result {
        warn!(error = %e, "Command failed");
    }
    result
}
