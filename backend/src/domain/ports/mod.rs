//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod quest_command;
mod quest_query;
mod quest_repository;
mod store_health;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use quest_command::MockQuestCommand;
pub use quest_command::{
    CreateQuestRequest, DeleteQuestResponse, FixtureQuestCommand, QuestCommand,
    UpdateQuestRequest,
};
#[cfg(test)]
pub use quest_query::MockQuestQuery;
pub use quest_query::{FixtureQuestQuery, ListQuestsRequest, QuestQuery};
#[cfg(test)]
pub use quest_repository::MockQuestRepository;
pub use quest_repository::{FixtureQuestRepository, QuestRepository, QuestRepositoryError};
#[cfg(test)]
pub use store_health::MockStoreHealth;
pub use store_health::StoreHealth;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::{FixtureUsersQuery, UsersQuery};
