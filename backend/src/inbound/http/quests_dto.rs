//! Quest request and response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::ListQuestsRequest;
use crate::domain::{Quest, QuestStats};

/// Query filters for `GET /v1/quest/`. Empty values count as absent.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuestsQuery {
    /// `prepare`, `active` or `done`.
    pub status: Option<String>,
    /// Exact subject match.
    pub subject: Option<String>,
    /// `private` or `shared`.
    pub visibility: Option<String>,
    /// Inclusive upper deadline bound (`YYYY-MM-DD`).
    pub deadline_before: Option<String>,
    /// Inclusive lower deadline bound (`YYYY-MM-DD`).
    pub deadline_after: Option<String>,
}

impl From<ListQuestsQuery> for ListQuestsRequest {
    fn from(query: ListQuestsQuery) -> Self {
        Self {
            status: query.status,
            subject: query.subject,
            visibility: query.visibility,
            deadline_before: query.deadline_before,
            deadline_after: query.deadline_after,
        }
    }
}

/// Documented shape of quest create and update bodies.
///
/// Handlers accept the raw JSON object so that unknown keys can be dropped
/// and type errors reported per field.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct QuestFieldsRequest {
    #[schema(example = "Just get started", max_length = 200)]
    title: Option<String>,
    description: Option<String>,
    #[schema(example = "Math")]
    subject: Option<String>,
    #[schema(example = "Algebra basics")]
    topic: Option<String>,
    #[schema(example = "focus_time")]
    effort_type: Option<String>,
    #[schema(minimum = 0)]
    studied_minutes: Option<i32>,
    #[schema(minimum = 1, example = 20)]
    suggested_minutes: Option<i32>,
    #[schema(example = "2025-02-20")]
    deadline: Option<String>,
    #[schema(example = "shared")]
    visibility: Option<String>,
    #[schema(example = "prepare")]
    status: Option<String>,
}

/// Quest as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct QuestResponse {
    /// Storage identity.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    #[schema(example = "65b2f0c1a4e5d6f7a8b9c0e1")]
    pub storage_id: Option<String>,
    #[schema(example = "quest_m7fyylc0abcde")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub topic: String,
    pub effort_type: String,
    pub studied_minutes: i32,
    pub suggested_minutes: i32,
    #[schema(example = "2025-02-20")]
    pub deadline: String,
    pub visibility: String,
    pub status: String,
    #[schema(example = "2025-02-18")]
    pub created_at: String,
}

impl From<Quest> for QuestResponse {
    fn from(quest: Quest) -> Self {
        Self {
            storage_id: quest.storage_id().map(str::to_owned),
            id: quest.id().to_string(),
            title: quest.title().as_ref().to_owned(),
            description: quest.description().to_owned(),
            subject: quest.subject().as_ref().to_owned(),
            topic: quest.topic().to_owned(),
            effort_type: quest.effort_type().as_str().to_owned(),
            studied_minutes: quest.studied_minutes().get(),
            suggested_minutes: quest.suggested_minutes().get(),
            deadline: quest.deadline().to_string(),
            visibility: quest.visibility().as_str().to_owned(),
            status: quest.status().as_str().to_owned(),
            created_at: quest.created_at().to_string(),
        }
    }
}

/// `{"success": true, "quest": ...}`
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestEnvelope {
    pub success: bool,
    pub quest: QuestResponse,
}

/// `{"success": true, "message": ..., "quest": ...}`
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestMessageEnvelope {
    pub success: bool,
    #[schema(example = "Quest created successfully")]
    pub message: String,
    pub quest: QuestResponse,
}

/// `{"success": true, "count": n, "quests": [...]}`
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestListEnvelope {
    pub success: bool,
    pub count: usize,
    pub quests: Vec<QuestResponse>,
}

/// Aggregate figures over every quest.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestStatsResponse {
    pub total_quests: u64,
    pub prepare_quests: u64,
    pub active_quests: u64,
    pub completed_quests: u64,
    pub total_minutes_studied: i64,
    pub total_minutes_suggested: i64,
    #[schema(example = "50.00%")]
    pub completion_rate: String,
}

impl From<QuestStats> for QuestStatsResponse {
    fn from(stats: QuestStats) -> Self {
        let totals = *stats.totals();
        Self {
            total_quests: totals.total,
            prepare_quests: totals.prepare,
            active_quests: totals.active,
            completed_quests: totals.done,
            total_minutes_studied: totals.studied_minutes,
            total_minutes_suggested: totals.suggested_minutes,
            completion_rate: stats.completion_rate().to_owned(),
        }
    }
}

/// `{"success": true, "stats": ...}`
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestStatsEnvelope {
    pub success: bool,
    pub stats: QuestStatsResponse,
}

/// `{"success": true, "message": ..., "id": ...}`
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteQuestEnvelope {
    pub success: bool,
    #[schema(example = "Quest deleted successfully")]
    pub message: String,
    pub id: String,
}
