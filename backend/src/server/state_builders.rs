//! Builders for HTTP state ports backed by MongoDB or fixtures.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use effortee::domain::ports::{
    FixtureQuestCommand, FixtureQuestQuery, FixtureUsersQuery, QuestCommand, QuestQuery,
    UsersQuery,
};
use effortee::domain::{QuestService, TimeRandomQuestIdGenerator, UserService};
use effortee::inbound::http::state::{HttpState, HttpStatePorts};
use effortee::outbound::persistence::{MongoQuestRepository, MongoStore, MongoUserRepository};

use super::ServerConfig;

/// Build a command/query pair from one service when a store is available,
/// otherwise return the fixtures.
fn build_quest_pair_with_store<Store, Service>(
    store: &Option<Store>,
    make_service: impl FnOnce(&Store) -> Service,
) -> (Arc<dyn QuestCommand>, Arc<dyn QuestQuery>)
where
    Service: QuestCommand + QuestQuery + 'static,
{
    match store {
        Some(store) => {
            let service = Arc::new(make_service(store));
            (
                service.clone() as Arc<dyn QuestCommand>,
                service as Arc<dyn QuestQuery>,
            )
        }
        None => (Arc::new(FixtureQuestCommand), Arc::new(FixtureQuestQuery)),
    }
}

fn mongo_quest_service(store: &MongoStore) -> QuestService<MongoQuestRepository> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    QuestService::new(
        Arc::new(MongoQuestRepository::new(store.clone())),
        Arc::new(TimeRandomQuestIdGenerator::new(clock.clone())),
        clock,
    )
}

fn build_users_query(store: &Option<MongoStore>) -> Arc<dyn UsersQuery> {
    match store {
        Some(store) => Arc::new(UserService::new(Arc::new(MongoUserRepository::new(
            store.clone(),
        )))),
        None => Arc::new(FixtureUsersQuery),
    }
}

/// Build the shared HTTP state from configured ports and fixture fallbacks.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let (quests, quests_query) = build_quest_pair_with_store(&config.store, mongo_quest_service);
    web::Data::new(HttpState::new(HttpStatePorts {
        quests,
        quests_query,
        users: build_users_query(&config.store),
    }))
}
