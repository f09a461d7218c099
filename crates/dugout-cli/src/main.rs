//! dugout - Cosmos DB (API for MongoDB) CRUD walkthrough
//!
//! Usage:
//!   dugout                                  Run against the account in DUGOUT_* env vars
//!   dugout --account ballpark --username u  Override account settings (password stays in env)
//!   dugout --uri mongodb://localhost:27017 --database dugout_test
//!   dugout --json                           Print a JSON report after the walkthrough
//!   dugout --log-level debug

use anyhow::{Context, Result};
use clap::Parser;
use dugout_mongodb::config::{
    ENV_ACCOUNT, ENV_COLLECTION, ENV_CONNECT_TIMEOUT, ENV_DATABASE, ENV_OPERATION_TIMEOUT,
    ENV_URI, ENV_USERNAME,
};
use dugout_mongodb::{Connection, ConnectionConfig, Player, Walkthrough};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "dugout")]
#[command(about = "Insert, query, update and delete players in a Cosmos DB collection", long_about = None)]
#[command(version)]
struct Cli {
    /// Cosmos DB account name [env: DUGOUT_ACCOUNT]
    #[arg(long)]
    account: Option<String>,

    /// Account username [env: DUGOUT_USERNAME]. The password is read from DUGOUT_PASSWORD only
    #[arg(long)]
    username: Option<String>,

    /// Database name, defaults to the account name [env: DUGOUT_DATABASE]
    #[arg(long)]
    database: Option<String>,

    /// Collection name [env: DUGOUT_COLLECTION]
    #[arg(long)]
    collection: Option<String>,

    /// Full connection string, replaces the account-based URI [env: DUGOUT_URI]
    #[arg(long)]
    uri: Option<String>,

    /// Setup budget in seconds [env: DUGOUT_CONNECT_TIMEOUT_SECS]
    #[arg(long, value_name = "SECS")]
    connect_timeout: Option<u64>,

    /// Operations budget in seconds [env: DUGOUT_OPERATION_TIMEOUT_SECS]
    #[arg(long, value_name = "SECS")]
    operation_timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the walkthrough report as JSON when done
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Flags that were given, keyed by the environment variable they override
    fn overrides(&self) -> Vec<(&'static str, String)> {
        let mut overrides = Vec::new();
        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(value) = value {
                overrides.push((key, value));
            }
        };

        push(ENV_ACCOUNT, self.account.clone());
        push(ENV_USERNAME, self.username.clone());
        push(ENV_DATABASE, self.database.clone());
        push(ENV_COLLECTION, self.collection.clone());
        push(ENV_URI, self.uri.clone());
        push(ENV_CONNECT_TIMEOUT, self.connect_timeout.map(|s| s.to_string()));
        push(ENV_OPERATION_TIMEOUT, self.operation_timeout.map(|s| s.to_string()));
        overrides
    }

    /// Resolve configuration: flags first, then `env`
    fn resolve_config<F>(&self, env: F) -> dugout_mongodb::Result<ConnectionConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides = self.overrides();
        ConnectionConfig::from_lookup(|key| {
            overrides
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
                .or_else(|| env(key))
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dugout_common::init_logging(&cli.log_level);

    let config = cli
        .resolve_config(|key| std::env::var(key).ok())
        .context("Failed to load connection settings")?;

    let connection = Connection::connect(config)
        .await
        .context("Failed to connect")?;
    println!("Connected to MongoDB!");

    let store = connection.store::<Player>();
    info!(collection = %store.collection_name(), "Starting walkthrough");

    let report = Walkthrough::new(&store, std::io::stdout().lock())
        .run()
        .await
        .context("Walkthrough failed")?;

    let budget = store.budget().clone();
    connection
        .disconnect(&budget)
        .await
        .context("Failed to close the connection")?;
    println!("Connection closed");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
