//! HTTP server configuration object and helpers.

use effortee::inbound::http::auth::ApiToken;
use effortee::outbound::persistence::MongoStore;
use std::net::SocketAddr;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) api_token: ApiToken,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: Option<MongoStore>,
}

impl ServerConfig {
    /// Construct a server configuration guarded by `api_token`.
    #[must_use]
    pub fn new(api_token: ApiToken, bind_addr: SocketAddr) -> Self {
        Self {
            api_token,
            bind_addr,
            store: None,
        }
    }

    /// Attach a MongoDB handle for persistence adapters.
    ///
    /// Without one, every port is served by its in-memory fixture.
    #[must_use]
    pub fn with_store(mut self, store: MongoStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
