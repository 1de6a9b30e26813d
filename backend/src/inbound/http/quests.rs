//! Quest HTTP handlers.
//!
//! ```text
//! POST   /v1/quest/
//! GET    /v1/quest/?status=active&deadline_before=2025-03-01
//! GET    /v1/quest/stats
//! GET    /v1/quest/{id}
//! PATCH  /v1/quest/{id}
//! DELETE /v1/quest/{id}
//! ```
//!
//! Register [`quest_stats`] before the `{id}` routes so `stats` is never
//! read as a quest id.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde_json::{Map, Value};

use crate::domain::ports::{CreateQuestRequest, ListQuestsRequest, UpdateQuestRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerAuth;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::quests_dto::{
    DeleteQuestEnvelope, ListQuestsQuery, QuestEnvelope, QuestFieldsRequest, QuestListEnvelope,
    QuestMessageEnvelope, QuestResponse, QuestStatsEnvelope,
};
use crate::inbound::http::state::HttpState;

const CREATED_MESSAGE: &str = "Quest created successfully";
const UPDATED_MESSAGE: &str = "Quest updated successfully";
const DELETED_MESSAGE: &str = "Quest deleted successfully";

/// Create a quest. The server assigns `id` and `created_at`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use effortee::inbound::http::quests::create_quest;
///
/// let app = App::new().service(web::scope("/v1/quest").service(create_quest));
/// ```
#[utoipa::path(
    post,
    path = "/v1/quest/",
    request_body = QuestFieldsRequest,
    responses(
        (status = 201, description = "Quest created", body = QuestMessageEnvelope),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 403, description = "Missing or invalid bearer token", body = ErrorEnvelope),
        (status = 500, description = "Persistence failure", body = ErrorEnvelope),
        (status = 503, description = "Store unavailable", body = ErrorEnvelope)
    ),
    tags = ["quests"],
    operation_id = "createQuest"
)]
#[post("")]
pub async fn create_quest(
    _auth: BearerAuth,
    state: web::Data<HttpState>,
    payload: web::Json<Map<String, Value>>,
) -> ApiResult<HttpResponse> {
    let request = CreateQuestRequest {
        fields: payload.into_inner(),
    };
    let quest = state.quests.create_quest(request).await?;
    Ok(HttpResponse::Created().json(QuestMessageEnvelope {
        success: true,
        message: CREATED_MESSAGE.to_owned(),
        quest: QuestResponse::from(quest),
    }))
}

/// List quests, newest first.
#[utoipa::path(
    get,
    path = "/v1/quest/",
    params(ListQuestsQuery),
    responses(
        (status = 200, description = "Matching quests", body = QuestListEnvelope),
        (status = 400, description = "Invalid filter", body = ErrorEnvelope),
        (status = 403, description = "Missing or invalid bearer token", body = ErrorEnvelope),
        (status = 500, description = "Persistence failure", body = ErrorEnvelope),
        (status = 503, description = "Store unavailable", body = ErrorEnvelope)
    ),
    tags = ["quests"],
    operation_id = "listQuests"
)]
#[get("")]
pub async fn list_quests(
    _auth: BearerAuth,
    state: web::Data<HttpState>,
    query: web::Query<ListQuestsQuery>,
) -> ApiResult<web::Json<QuestListEnvelope>> {
    let request = ListQuestsRequest::from(query.into_inner());
    let quests: Vec<QuestResponse> = state
        .quests_query
        .list_quests(&request)
        .await?
        .into_iter()
        .map(QuestResponse::from)
        .collect();
    Ok(web::Json(QuestListEnvelope {
        success: true,
        count: quests.len(),
        quests,
    }))
}

/// Aggregate counts and minute totals.
#[utoipa::path(
    get,
    path = "/v1/quest/stats",
    responses(
        (status = 200, description = "Quest statistics", body = QuestStatsEnvelope),
        (status = 403, description = "Missing or invalid bearer token", body = ErrorEnvelope),
        (status = 500, description = "Persistence failure", body = ErrorEnvelope),
        (status = 503, description = "Store unavailable", body = ErrorEnvelope)
    ),
    tags = ["quests"],
    operation_id = "questStats"
)]
#[get("/stats")]
pub async fn quest_stats(
    _auth: BearerAuth,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<QuestStatsEnvelope>> {
    let stats = state.quests_query.quest_stats().await?;
    Ok(web::Json(QuestStatsEnvelope {
        success: true,
        stats: stats.into(),
    }))
}

/// Fetch one quest by its public id.
#[utoipa::path(
    get,
    path = "/v1/quest/{id}",
    params(("id" = String, Path, description = "Quest id", example = "quest_001")),
    responses(
        (status = 200, description = "Quest", body = QuestEnvelope),
        (status = 403, description = "Missing or invalid bearer token", body = ErrorEnvelope),
        (status = 404, description = "Quest not found", body = ErrorEnvelope),
        (status = 500, description = "Persistence failure", body = ErrorEnvelope)
    ),
    tags = ["quests"],
    operation_id = "getQuest"
)]
#[get("/{id}")]
pub async fn get_quest(
    _auth: BearerAuth,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<QuestEnvelope>> {
    let quest = state.quests_query.get_quest(&path.into_inner()).await?;
    Ok(web::Json(QuestEnvelope {
        success: true,
        quest: quest.into(),
    }))
}

/// Apply allow-listed fields to a quest. Other keys are ignored.
#[utoipa::path(
    patch,
    path = "/v1/quest/{id}",
    params(("id" = String, Path, description = "Quest id", example = "quest_001")),
    request_body = QuestFieldsRequest,
    responses(
        (status = 200, description = "Quest updated", body = QuestMessageEnvelope),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 403, description = "Missing or invalid bearer token", body = ErrorEnvelope),
        (status = 404, description = "Quest not found", body = ErrorEnvelope),
        (status = 500, description = "Persistence failure", body = ErrorEnvelope)
    ),
    tags = ["quests"],
    operation_id = "updateQuest"
)]
#[patch("/{id}")]
pub async fn update_quest(
    _auth: BearerAuth,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Map<String, Value>>,
) -> ApiResult<web::Json<QuestMessageEnvelope>> {
    let request = UpdateQuestRequest {
        quest_id: path.into_inner(),
        fields: payload.into_inner(),
    };
    let quest = state.quests.update_quest(request).await?;
    Ok(web::Json(QuestMessageEnvelope {
        success: true,
        message: UPDATED_MESSAGE.to_owned(),
        quest: quest.into(),
    }))
}

/// Delete a quest.
#[utoipa::path(
    delete,
    path = "/v1/quest/{id}",
    params(("id" = String, Path, description = "Quest id", example = "quest_001")),
    responses(
        (status = 200, description = "Quest deleted", body = DeleteQuestEnvelope),
        (status = 403, description = "Missing or invalid bearer token", body = ErrorEnvelope),
        (status = 404, description = "Quest not found", body = ErrorEnvelope),
        (status = 500, description = "Persistence failure", body = ErrorEnvelope)
    ),
    tags = ["quests"],
    operation_id = "deleteQuest"
)]
#[delete("/{id}")]
pub async fn delete_quest(
    _auth: BearerAuth,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteQuestEnvelope>> {
    let deleted = state.quests.delete_quest(&path.into_inner()).await?;
    Ok(web::Json(DeleteQuestEnvelope {
        success: true,
        message: DELETED_MESSAGE.to_owned(),
        id: deleted.quest_id.to_string(),
    }))
}

#[cfg(test)]
#[path = "quests_tests.rs"]
mod tests;
