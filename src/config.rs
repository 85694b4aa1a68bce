use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage_dir: String,
    pub database_url: String,
    pub public_url: Option<String>,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "File-sharing service with expiring download links")]
pub struct Args {
    /// Host to bind to (overrides FILEDROP_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides FILEDROP_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory where file payloads are stored (overrides FILEDROP_STORAGE_DIR)
    #[arg(long)]
    pub storage_dir: Option<String>,

    /// Database URL (overrides FILEDROP_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Public base URL for minted download links (overrides FILEDROP_PUBLIC_URL)
    #[arg(long)]
    pub public_url: Option<String>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        // Parse CLI once
        let args = Args::parse();

        // --- Environment fallback ---
        let env_host = env::var("FILEDROP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("FILEDROP_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing FILEDROP_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading FILEDROP_PORT"),
        };
        let env_storage =
            env::var("FILEDROP_STORAGE_DIR").unwrap_or_else(|_| "./data/blobs".into());
        let env_db = env::var("FILEDROP_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/meta/filedrop.db".into());
        let env_public = env::var("FILEDROP_PUBLIC_URL").ok();

        // --- Merge ---
        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            storage_dir: args.storage_dir.unwrap_or(env_storage),
            database_url: args.database_url.unwrap_or(env_db),
            public_url: args.public_url.or(env_public),
        };

        Ok((cfg, args.migrate))
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL download links are minted against. Falls back to the bind
    /// address when no public URL is configured, with the wildcard hosts
    /// rewritten to loopback so links stay dialable.
    pub fn link_base(&self) -> String {
        match &self.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => {
                let host = match self.host.as_str() {
                    "0.0.0.0" | "::" => "127.0.0.1",
                    other => other,
                };
                format!("http://{}:{}", host, self.port)
            }
        }
    }
}
