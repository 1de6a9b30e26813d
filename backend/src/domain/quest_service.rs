//! Quest domain service.
//!
//! Implements the quest driving ports on top of a [`QuestRepository`]. Every
//! operation validates its input first and then issues exactly one
//! repository call.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::error;

use crate::domain::ports::{
    CreateQuestRequest, DeleteQuestResponse, ListQuestsRequest, QuestCommand, QuestQuery,
    QuestRepository, QuestRepositoryError, UpdateQuestRequest,
};
use crate::domain::{
    CalendarDate, Error, NewQuest, Quest, QuestFilter, QuestId, QuestIdGenerator, QuestPatch,
    QuestStats, RawQuestFilter,
};

const QUEST_NOT_FOUND: &str = "Quest not found";

/// Quest service implementing [`QuestCommand`] and [`QuestQuery`].
#[derive(Clone)]
pub struct QuestService<R> {
    repo: Arc<R>,
    ids: Arc<dyn QuestIdGenerator>,
    clock: Arc<dyn Clock>,
}

impl<R> QuestService<R> {
    /// Create a service over `repo`, drawing identifiers from `ids` and
    /// creation dates from `clock`.
    pub fn new(repo: Arc<R>, ids: Arc<dyn QuestIdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, ids, clock }
    }
}

fn map_repository_error(error: QuestRepositoryError) -> Error {
    match error {
        QuestRepositoryError::Connection { message } => {
            error!(%message, "quest repository unavailable");
            Error::service_unavailable(format!("quest repository unavailable: {message}"))
        }
        QuestRepositoryError::Query { message } | QuestRepositoryError::Duplicate { message } => {
            error!(%message, "quest repository failure");
            Error::persistence(message)
        }
    }
}

/// Identifiers without the `quest_` prefix can never match a stored quest.
fn lookup_id(quest_id: &str) -> Result<QuestId, Error> {
    QuestId::new(quest_id).map_err(|_| Error::not_found(QUEST_NOT_FOUND))
}

impl<R> QuestService<R>
where
    R: QuestRepository,
{
    fn today(&self) -> CalendarDate {
        CalendarDate::from_date(self.clock.utc().date_naive())
    }
}

#[async_trait]
impl<R> QuestCommand for QuestService<R>
where
    R: QuestRepository,
{
    async fn create_quest(&self, request: CreateQuestRequest) -> Result<Quest, Error> {
        let new_quest = NewQuest::from_fields(&request.fields)?;
        let quest = new_quest.into_quest(self.ids.next_id(), self.today());
        self.repo
            .insert(&quest)
            .await
            .map_err(map_repository_error)
    }

    async fn update_quest(&self, request: UpdateQuestRequest) -> Result<Quest, Error> {
        let patch = QuestPatch::from_fields(&request.fields)?;
        let id = lookup_id(&request.quest_id)?;
        self.repo
            .update(&id, &patch)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(QUEST_NOT_FOUND))
    }

    async fn delete_quest(&self, quest_id: &str) -> Result<DeleteQuestResponse, Error> {
        let id = lookup_id(quest_id)?;
        let deleted = self.repo.delete(&id).await.map_err(map_repository_error)?;
        if !deleted {
            return Err(Error::not_found(QUEST_NOT_FOUND));
        }
        Ok(DeleteQuestResponse { quest_id: id })
    }
}

#[async_trait]
impl<R> QuestQuery for QuestService<R>
where
    R: QuestRepository,
{
    async fn list_quests(&self, request: &ListQuestsRequest) -> Result<Vec<Quest>, Error> {
        let filter = QuestFilter::parse(RawQuestFilter {
            status: request.status.as_deref(),
            subject: request.subject.as_deref(),
            visibility: request.visibility.as_deref(),
            deadline_before: request.deadline_before.as_deref(),
            deadline_after: request.deadline_after.as_deref(),
        })?;
        self.repo.list(&filter).await.map_err(map_repository_error)
    }

    async fn get_quest(&self, quest_id: &str) -> Result<Quest, Error> {
        let id = lookup_id(quest_id)?;
        self.repo
            .find_by_id(&id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(QUEST_NOT_FOUND))
    }

    async fn quest_stats(&self) -> Result<QuestStats, Error> {
        self.repo
            .totals()
            .await
            .map(QuestStats::from)
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "quest_service_tests.rs"]
mod tests;
