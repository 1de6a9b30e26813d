//! Driving port for quest reads.

use async_trait::async_trait;

use crate::domain::{Error, Quest, QuestStats, QuestTotals};

/// Raw list filters as they arrive in a query string.
///
/// Values are validated by the implementation; empty strings count as
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuestsRequest {
    pub status: Option<String>,
    pub subject: Option<String>,
    pub visibility: Option<String>,
    pub deadline_before: Option<String>,
    pub deadline_after: Option<String>,
}

/// Domain use-case port for quest reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestQuery: Send + Sync {
    /// Quests matching the filters, newest first.
    async fn list_quests(&self, request: &ListQuestsRequest) -> Result<Vec<Quest>, Error>;

    /// One quest by its public identifier.
    async fn get_quest(&self, quest_id: &str) -> Result<Quest, Error>;

    /// Collection-wide counts, minute sums and completion rate.
    async fn quest_stats(&self) -> Result<QuestStats, Error>;
}

/// Query over an empty quest collection.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureQuestQuery;

#[async_trait]
impl QuestQuery for FixtureQuestQuery {
    async fn list_quests(&self, _request: &ListQuestsRequest) -> Result<Vec<Quest>, Error> {
        Ok(Vec::new())
    }

    async fn get_quest(&self, _quest_id: &str) -> Result<Quest, Error> {
        Err(Error::not_found("Quest not found"))
    }

    async fn quest_stats(&self) -> Result<QuestStats, Error> {
        Ok(QuestStats::from(QuestTotals::default()))
    }
}
