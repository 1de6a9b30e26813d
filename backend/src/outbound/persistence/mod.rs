//! MongoDB persistence adapters.
//!
//! This module provides concrete implementations of the repository ports
//! backed by the official MongoDB driver.
//!
//! # Architecture
//!
//! - **Thin adapters**: repository implementations only translate between
//!   BSON documents and domain types. No business logic resides here.
//! - **Internal documents**: document structs (`documents.rs`) and query
//!   builders (`queries.rs`) never leave this module.
//! - **Shared client**: [`MongoStore`] wraps a driver handle whose connection
//!   pool is shared by every clone.
//! - **Strongly typed errors**: driver errors are classified and mapped to
//!   the domain persistence errors.
//!
//! # Example
//!
//! ```no_run
//! use effortee::outbound::persistence::{ConnectionConfig, MongoQuestRepository, MongoStore};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MongoStore::connect(&ConnectionConfig::new(
//!     "mongodb://localhost:27017",
//!     "effortee",
//! ))
//! .await?;
//! let repository = MongoQuestRepository::new(store);
//! # let _ = repository;
//! # Ok(())
//! # }
//! ```

mod connection;
mod documents;
mod error_mapping;
mod mongo_quest_repository;
mod mongo_user_repository;
mod queries;
pub mod setup;

pub use connection::{
    ConnectionConfig, ConnectionError, MongoStore, QUESTS_COLLECTION, USERS_COLLECTION,
};
pub use mongo_quest_repository::MongoQuestRepository;
pub use mongo_user_repository::MongoUserRepository;
pub use setup::{
    AdminAccount, AdminOutcome, SetupError, SetupOptions, SetupSummary, prepare_database,
};
