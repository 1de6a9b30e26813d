//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureQuestCommand, FixtureQuestQuery, FixtureUsersQuery, QuestCommand, QuestQuery,
    UsersQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub quests: Arc<dyn QuestCommand>,
    pub quests_query: Arc<dyn QuestQuery>,
    pub users: Arc<dyn UsersQuery>,
}

impl HttpStatePorts {
    /// Ports backed by in-process fixtures; nothing is persisted.
    pub fn fixtures() -> Self {
        Self {
            quests: Arc::new(FixtureQuestCommand),
            quests_query: Arc::new(FixtureQuestQuery),
            users: Arc::new(FixtureUsersQuery),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub quests: Arc<dyn QuestCommand>,
    pub quests_query: Arc<dyn QuestQuery>,
    pub users: Arc<dyn UsersQuery>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use effortee::domain::ports::{FixtureQuestCommand, FixtureQuestQuery, FixtureUsersQuery};
    /// use effortee::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts {
    ///     quests: Arc::new(FixtureQuestCommand),
    ///     quests_query: Arc::new(FixtureQuestQuery),
    ///     users: Arc::new(FixtureUsersQuery),
    /// });
    /// let _users = state.users.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            quests,
            quests_query,
            users,
        } = ports;
        Self {
            quests,
            quests_query,
            users,
        }
    }
}
