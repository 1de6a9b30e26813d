//! Driving port for quest mutations.
//!
//! Inbound adapters hand over request bodies as raw JSON objects; the
//! implementation owns field validation, the update allow-list and
//! identifier assignment.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::{CalendarDate, Error, NewQuest, Quest, QuestId, QuestPatch};

/// Request to create a quest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateQuestRequest {
    pub fields: Map<String, Value>,
}

/// Request to patch a quest.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateQuestRequest {
    pub quest_id: String,
    pub fields: Map<String, Value>,
}

/// Confirmation returned after a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteQuestResponse {
    pub quest_id: QuestId,
}

/// Domain use-case port for quest writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestCommand: Send + Sync {
    /// Validate and store a new quest with a server-assigned id and
    /// creation date.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use effortee::domain::ports::{CreateQuestRequest, FixtureQuestCommand, QuestCommand};
    /// # use serde_json::json;
    /// # async fn example() -> Result<(), effortee::domain::Error> {
    /// let body = json!({
    ///     "title": "Just get started",
    ///     "subject": "Math",
    ///     "suggested_minutes": 20,
    ///     "deadline": "2025-02-20",
    /// });
    /// let fields = body.as_object().cloned().unwrap_or_default();
    /// let quest = FixtureQuestCommand.create_quest(CreateQuestRequest { fields }).await?;
    /// assert!(quest.id().as_ref().starts_with("quest_"));
    /// # Ok(())
    /// # }
    /// ```
    async fn create_quest(&self, request: CreateQuestRequest) -> Result<Quest, Error>;

    /// Apply allow-listed fields and return the updated quest.
    async fn update_quest(&self, request: UpdateQuestRequest) -> Result<Quest, Error>;

    /// Remove a quest.
    async fn delete_quest(&self, quest_id: &str) -> Result<DeleteQuestResponse, Error>;
}

/// Fixture command that validates input but stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureQuestCommand;

#[async_trait]
impl QuestCommand for FixtureQuestCommand {
    async fn create_quest(&self, request: CreateQuestRequest) -> Result<Quest, Error> {
        let new_quest = NewQuest::from_fields(&request.fields)?;
        let id = QuestId::new("quest_fixture")?;
        Ok(new_quest.into_quest(id, new_quest_date()?))
    }

    async fn update_quest(&self, request: UpdateQuestRequest) -> Result<Quest, Error> {
        QuestPatch::from_fields(&request.fields)?;
        Err(Error::not_found("Quest not found"))
    }

    async fn delete_quest(&self, _quest_id: &str) -> Result<DeleteQuestResponse, Error> {
        Err(Error::not_found("Quest not found"))
    }
}

fn new_quest_date() -> Result<CalendarDate, Error> {
    CalendarDate::parse("2025-01-01", "created_at")
        .map_err(|err| Error::internal(format!("invalid fixture date: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[tokio::test]
    async fn fixture_command_validates_create_bodies() {
        let err = FixtureQuestCommand
            .create_quest(CreateQuestRequest::default())
            .await
            .expect_err("missing fields");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_command_rejects_empty_patches_before_lookup() {
        let request = UpdateQuestRequest {
            quest_id: "quest_001".to_owned(),
            fields: json!({ "id": "quest_x" }).as_object().cloned().unwrap_or_default(),
        };
        let err = FixtureQuestCommand
            .update_quest(request)
            .await
            .expect_err("no updatable fields");
        assert_eq!(err.message(), "No valid fields to update");
    }
}
