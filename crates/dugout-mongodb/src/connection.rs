//! Session bootstrap and teardown

use crate::budget::Budget;
use crate::config::ConnectionConfig;
use crate::record::Record;
use crate::store::RecordStore;
use bson::doc;
use dugout_common::{DugoutError, Result};
use mongodb::{options::ClientOptions, Client, Database};
use tracing::{debug, info};

/// An open, verified session against one database
pub struct Connection {
    client: Client,
    database: Database,
    config: ConnectionConfig,
}

impl Connection {
    /// Open a client and verify it with a ping.
    ///
    /// Client setup runs under the setup budget; the ping gets its own budget
    /// of the same length. Any failure is returned as-is, there is no retry.
    pub async fn connect(config: ConnectionConfig) -> Result<Self> {
        info!(uri = %config.redacted_uri(), database = %config.database, "Connecting");

        let setup = Budget::start("setup", config.connect_timeout);
        let client = setup.run("connect", Self::open_client(&config)).await?;

        let connection = Self {
            database: client.database(&config.database),
            client,
            config,
        };

        let probe = Budget::start("ping", connection.config.connect_timeout);
        probe.run("ping", connection.ping()).await?;

        info!("Connected to {}", connection.database_name());
        Ok(connection)
    }

    async fn open_client(config: &ConnectionConfig) -> Result<Client> {
        let uri = config.connection_uri();
        let mut client_options = ClientOptions::parse(uri.as_str()).await?;

        client_options.connect_timeout = Some(config.connect_timeout);
        client_options.server_selection_timeout = Some(config.connect_timeout);
        client_options.app_name = Some(config.app_name.clone());

        debug!(hosts = ?client_options.hosts, "Parsed client options");
        Ok(Client::with_options(client_options)?)
    }

    /// Round-trip liveness probe
    pub async fn ping(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| DugoutError::Ping(e.to_string()))
    }

    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    /// Store for `T` in the configured collection, with a fresh operations budget
    pub fn store<T: Record>(&self) -> RecordStore<T> {
        self.store_in(&self.config.collection)
    }

    /// Store for `T` in `collection`, with a fresh operations budget
    pub fn store_in<T: Record>(&self, collection: &str) -> RecordStore<T> {
        RecordStore::new(
            self.database.collection(collection),
            Budget::start("operations", self.config.operation_timeout),
        )
    }

    /// Close the session within `budget`
    pub async fn disconnect(self, budget: &Budget) -> Result<()> {
        let client = self.client;
        budget
            .run("disconnect", async move {
                client.shutdown().await;
                Ok::<_, DugoutError>(())
            })
            .await?;
        debug!("Client shut down");
        Ok(())
    }
}
