//! Test helpers for inbound HTTP components.

use actix_web::http::header::AUTHORIZATION;
use actix_web::web;

use crate::domain::{
    CalendarDate, EffortType, Quest, QuestDraft, QuestId, QuestStatus, QuestTitle, StudiedMinutes,
    Subject, SuggestedMinutes, Visibility,
};
use crate::inbound::http::auth::ApiToken;

/// Token accepted by apps built with [`api_token`].
pub const TEST_TOKEN: &str = "test-token";

/// Registered token for `App::app_data`.
pub fn api_token() -> web::Data<ApiToken> {
    web::Data::new(ApiToken::new(TEST_TOKEN).expect("non-empty test token"))
}

/// `Authorization` header carrying [`TEST_TOKEN`].
pub fn bearer() -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {TEST_TOKEN}"))
}

/// Stored copy of the first seed quest.
pub fn sample_quest() -> Quest {
    let date = |value: &str, field| CalendarDate::parse(value, field).expect("valid date");
    Quest::new(QuestDraft {
        id: QuestId::new("quest_001").expect("valid id"),
        title: QuestTitle::new("Just get started").expect("valid title"),
        description: String::new(),
        subject: Subject::new("Math").expect("valid subject"),
        topic: "Algebra basics".to_owned(),
        effort_type: EffortType::FocusTime,
        studied_minutes: StudiedMinutes::new(10).expect("valid minutes"),
        suggested_minutes: SuggestedMinutes::new(20).expect("valid minutes"),
        deadline: date("2025-02-20", "deadline"),
        visibility: Visibility::Shared,
        status: QuestStatus::Active,
        created_at: date("2025-02-18", "created_at"),
    })
    .with_storage_id("65b2f0c1a4e5d6f7a8b9c0e1")
}
