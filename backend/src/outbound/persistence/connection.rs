//! MongoDB client construction.
//!
//! The driver pools connections internally, so [`MongoStore`] is created once
//! at start-up and cloned into every repository. Cloning shares the pool.

use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use tracing::{info, warn};

use crate::domain::ports::StoreHealth;

use super::documents::{QuestDocument, UserDocument};

/// Collection holding user profiles.
pub const USERS_COLLECTION: &str = "users";
/// Collection holding quests.
pub const QUESTS_COLLECTION: &str = "quests";

const APP_NAME: &str = "effortee";

/// Errors raised while connecting to MongoDB.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    /// The URI could not be parsed or the client could not be built.
    #[error("failed to build MongoDB client: {message}")]
    Build { message: String },

    /// The server did not answer a ping.
    #[error("MongoDB ping failed: {message}")]
    Ping { message: String },
}

impl ConnectionError {
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }

    pub fn ping(message: impl Into<String>) -> Self {
        Self::Ping {
            message: message.into(),
        }
    }
}

/// Connection settings for the document store.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use effortee::outbound::persistence::ConnectionConfig;
///
/// let config = ConnectionConfig::new("mongodb://localhost:27017", "effortee")
///     .with_server_selection_timeout(Duration::from_secs(2));
/// assert_eq!(config.database(), "effortee");
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    uri: String,
    database: String,
    server_selection_timeout: Duration,
}

impl ConnectionConfig {
    /// Create a configuration with a 5 second server-selection timeout.
    pub fn new(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: database.into(),
            server_selection_timeout: Duration::from_secs(5),
        }
    }

    /// Bound how long each operation waits for a usable server.
    pub fn with_server_selection_timeout(mut self, timeout: Duration) -> Self {
        self.server_selection_timeout = timeout;
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn database(&self) -> &str {
        &self.database
    }
}

/// Handle to the Effortee database.
#[derive(Clone, Debug)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Build a client for `config`. No I/O happens until the first
    /// operation; call [`MongoStore::ping`] to fail fast.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Build`] when the URI is invalid.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, ConnectionError> {
        let mut options = ClientOptions::parse(config.uri())
            .await
            .map_err(|err| ConnectionError::build(err.to_string()))?;
        options.app_name = Some(APP_NAME.to_owned());
        options.server_selection_timeout = Some(config.server_selection_timeout);
        let client =
            Client::with_options(options).map_err(|err| ConnectionError::build(err.to_string()))?;
        info!(database = config.database(), "MongoDB client configured");
        Ok(Self {
            database: client.database(config.database()),
        })
    }

    /// Round-trip a `ping` command.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Ping`] when no server answers.
    pub async fn ping(&self) -> Result<(), ConnectionError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|err| ConnectionError::ping(err.to_string()))
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub(crate) fn quests(&self) -> Collection<QuestDocument> {
        self.database.collection(QUESTS_COLLECTION)
    }

    pub(crate) fn users(&self) -> Collection<UserDocument> {
        self.database.collection(USERS_COLLECTION)
    }
}

#[async_trait]
impl StoreHealth for MongoStore {
    async fn is_reachable(&self) -> bool {
        match self.ping().await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "health check could not reach MongoDB");
                false
            }
        }
    }
}
