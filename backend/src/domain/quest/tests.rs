//! Tests for quest value types.

use super::*;
use crate::domain::ErrorCode;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case("quest_001")]
#[case("quest_lz3k1a9x2")]
fn quest_id_accepts_prefixed_values(#[case] raw: &str) {
    let id = QuestId::new(raw).expect("valid quest id");
    assert_eq!(id.as_ref(), raw);
}

#[rstest]
#[case("")]
#[case("quest_")]
#[case("task_001")]
#[case(" quest_001")]
fn quest_id_rejects_malformed_values(#[case] raw: &str) {
    assert_eq!(QuestId::new(raw), Err(QuestValidationError::InvalidId));
}

#[rstest]
fn title_accepts_boundary_length() {
    let title = "a".repeat(TITLE_MAX);
    assert!(QuestTitle::new(title).is_ok());
}

#[rstest]
#[case("", QuestValidationError::EmptyTitle)]
#[case("   ", QuestValidationError::EmptyTitle)]
fn title_rejects_blank(#[case] raw: &str, #[case] expected: QuestValidationError) {
    assert_eq!(QuestTitle::new(raw), Err(expected));
}

#[rstest]
fn title_rejects_overlong() {
    let title = "a".repeat(TITLE_MAX + 1);
    assert_eq!(
        QuestTitle::new(title),
        Err(QuestValidationError::TitleTooLong { max: TITLE_MAX })
    );
}

#[rstest]
#[case("prepare", QuestStatus::Prepare)]
#[case("active", QuestStatus::Active)]
#[case("done", QuestStatus::Done)]
fn status_parses_known_values(#[case] raw: &str, #[case] expected: QuestStatus) {
    assert_eq!(raw.parse::<QuestStatus>(), Ok(expected));
    assert_eq!(expected.as_str(), raw);
}

#[rstest]
#[case("finished")]
#[case("Active")]
#[case("")]
fn status_rejects_unknown_values(#[case] raw: &str) {
    assert_eq!(
        raw.parse::<QuestStatus>(),
        Err(QuestValidationError::InvalidStatus(raw.to_owned()))
    );
}

#[rstest]
fn defaults_match_creation_defaults() {
    assert_eq!(QuestStatus::default(), QuestStatus::Prepare);
    assert_eq!(Visibility::default(), Visibility::Shared);
    assert_eq!(EffortType::default(), EffortType::FocusTime);
}

#[rstest]
#[case("public")]
#[case("PRIVATE")]
fn visibility_rejects_unknown_values(#[case] raw: &str) {
    assert!(matches!(
        raw.parse::<Visibility>(),
        Err(QuestValidationError::InvalidVisibility(_))
    ));
}

#[rstest]
fn effort_type_keeps_unrecognised_labels() {
    let effort: EffortType = "practice".parse().expect("free-form label");
    assert_eq!(effort, EffortType::Other("practice".to_owned()));
    assert_eq!(effort.as_str(), "practice");
}

#[rstest]
fn effort_type_rejects_blank() {
    assert_eq!(
        " ".parse::<EffortType>(),
        Err(QuestValidationError::EmptyEffortType)
    );
}

#[rstest]
#[case(0, true)]
#[case(-1, false)]
#[case(i64::from(i32::MAX), true)]
#[case(i64::from(i32::MAX) + 1, false)]
fn studied_minutes_bounds(#[case] value: i64, #[case] accepted: bool) {
    assert_eq!(StudiedMinutes::new(value).is_ok(), accepted);
}

#[rstest]
#[case(1, true)]
#[case(0, false)]
#[case(-5, false)]
fn suggested_minutes_bounds(#[case] value: i64, #[case] accepted: bool) {
    assert_eq!(SuggestedMinutes::new(value).is_ok(), accepted);
}

#[rstest]
#[case("2025-02-22")]
#[case("2024-02-29")]
fn calendar_date_round_trips(#[case] raw: &str) {
    let date = CalendarDate::parse(raw, "deadline").expect("valid date");
    assert_eq!(date.to_string(), raw);
}

#[rstest]
#[case("2025-2-22")]
#[case("2025-02-30")]
#[case("22/02/2025")]
#[case("2025-02-22T00:00:00Z")]
fn calendar_date_rejects_malformed(#[case] raw: &str) {
    assert!(matches!(
        CalendarDate::parse(raw, "deadline"),
        Err(QuestValidationError::InvalidDate { field: "deadline", .. })
    ));
}

#[rstest]
fn calendar_dates_order_chronologically() {
    let earlier = CalendarDate::parse("2025-02-20", "deadline").expect("valid");
    let later = CalendarDate::parse("2025-02-25", "deadline").expect("valid");
    assert!(earlier < later);
}

#[rstest]
fn missing_fields_error_lists_fields() {
    let error: Error =
        QuestValidationError::MissingFields(vec!["title", "deadline"]).into();
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "Missing required fields: title, deadline");
    assert_eq!(
        error.details(),
        Some(&json!({ "fields": ["title", "deadline"], "code": "missing_fields" }))
    );
}

#[rstest]
fn field_errors_carry_field_details() {
    let error: Error = QuestValidationError::InvalidStatus("finished".to_owned()).into();
    assert_eq!(
        error.details(),
        Some(&json!({ "field": "status", "code": "invalid_enum_value" }))
    );
}
