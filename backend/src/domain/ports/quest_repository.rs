//! Driven port for quest persistence.

use async_trait::async_trait;

use crate::domain::{Quest, QuestFilter, QuestId, QuestPatch, QuestTotals};

use super::define_port_error;

define_port_error! {
    /// Errors raised by quest repository adapters.
    pub enum QuestRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "quest repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "quest repository query failed: {message}",
        /// A unique index rejected the write.
        Duplicate { message: String } => "duplicate quest: {message}",
    }
}

/// Storage operations for quests. Each call is a single round trip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestRepository: Send + Sync {
    /// Insert a new quest and return it with its storage identity set.
    async fn insert(&self, quest: &Quest) -> Result<Quest, QuestRepositoryError>;

    /// Quests matching `filter`, newest `created_at` first.
    async fn list(&self, filter: &QuestFilter) -> Result<Vec<Quest>, QuestRepositoryError>;

    /// Fetch a quest by its public identifier.
    async fn find_by_id(&self, id: &QuestId) -> Result<Option<Quest>, QuestRepositoryError>;

    /// Apply `patch` and return the updated quest, or `None` when no quest
    /// has this identifier.
    async fn update(
        &self,
        id: &QuestId,
        patch: &QuestPatch,
    ) -> Result<Option<Quest>, QuestRepositoryError>;

    /// Delete a quest, reporting whether one was removed.
    async fn delete(&self, id: &QuestId) -> Result<bool, QuestRepositoryError>;

    /// Counts and minute sums over the whole collection.
    async fn totals(&self) -> Result<QuestTotals, QuestRepositoryError>;
}

/// Empty repository for wiring that never touches quests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureQuestRepository;

#[async_trait]
impl QuestRepository for FixtureQuestRepository {
    async fn insert(&self, quest: &Quest) -> Result<Quest, QuestRepositoryError> {
        Ok(quest.clone())
    }

    async fn list(&self, _filter: &QuestFilter) -> Result<Vec<Quest>, QuestRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: &QuestId) -> Result<Option<Quest>, QuestRepositoryError> {
        Ok(None)
    }

    async fn update(
        &self,
        _id: &QuestId,
        _patch: &QuestPatch,
    ) -> Result<Option<Quest>, QuestRepositoryError> {
        Ok(None)
    }

    async fn delete(&self, _id: &QuestId) -> Result<bool, QuestRepositoryError> {
        Ok(false)
    }

    async fn totals(&self) -> Result<QuestTotals, QuestRepositoryError> {
        Ok(QuestTotals::default())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_repository_is_empty() {
        let repo = FixtureQuestRepository;
        let id = QuestId::new("quest_001").expect("valid id");
        assert!(repo.list(&QuestFilter::default()).await.expect("list").is_empty());
        assert!(repo.find_by_id(&id).await.expect("find").is_none());
        assert!(!repo.delete(&id).await.expect("delete"));
        assert_eq!(repo.totals().await.expect("totals"), QuestTotals::default());
    }

    #[rstest]
    #[case(QuestRepositoryError::connection("refused"), "quest repository connection failed: refused")]
    #[case(QuestRepositoryError::duplicate("id quest_001"), "duplicate quest: id quest_001")]
    fn errors_render_messages(#[case] error: QuestRepositoryError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }
}
