//! Tests for the quest service.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};
use serde_json::{Map, Value, json};

use super::*;
use crate::domain::ports::MockQuestRepository;
use crate::domain::{ErrorCode, QuestStatus, QuestTotals, TimeRandomQuestIdGenerator};

struct FixtureClock(DateTime<Utc>);

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

fn fixture_clock() -> Arc<dyn Clock> {
    let now = Utc
        .with_ymd_and_hms(2025, 2, 18, 23, 59, 0)
        .single()
        .expect("valid fixture timestamp");
    Arc::new(FixtureClock(now))
}

/// Hands out `quest_001`, `quest_002`, ...
#[derive(Default)]
struct SequentialIds(AtomicUsize);

impl QuestIdGenerator for SequentialIds {
    fn next_id(&self) -> QuestId {
        let next = self.0.fetch_add(1, Ordering::SeqCst) + 1;
        QuestId::new(format!("quest_{next:03}")).expect("valid sequential id")
    }
}

/// In-memory store mirroring the adapter contract.
#[derive(Default)]
struct InMemoryQuestRepository {
    quests: Mutex<Vec<Quest>>,
}

#[async_trait]
impl QuestRepository for InMemoryQuestRepository {
    async fn insert(&self, quest: &Quest) -> Result<Quest, QuestRepositoryError> {
        let mut quests = self.quests.lock().expect("store poisoned");
        if quests.iter().any(|stored| stored.id() == quest.id()) {
            return Err(QuestRepositoryError::duplicate(quest.id().to_string()));
        }
        let stored = quest
            .clone()
            .with_storage_id(format!("{:024x}", quests.len() + 1));
        quests.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self, filter: &QuestFilter) -> Result<Vec<Quest>, QuestRepositoryError> {
        let quests = self.quests.lock().expect("store poisoned");
        let mut matching: Vec<Quest> = quests
            .iter()
            .filter(|quest| filter.matches(quest))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(matching)
    }

    async fn find_by_id(&self, id: &QuestId) -> Result<Option<Quest>, QuestRepositoryError> {
        let quests = self.quests.lock().expect("store poisoned");
        Ok(quests.iter().find(|quest| quest.id() == id).cloned())
    }

    async fn update(
        &self,
        id: &QuestId,
        patch: &QuestPatch,
    ) -> Result<Option<Quest>, QuestRepositoryError> {
        let mut quests = self.quests.lock().expect("store poisoned");
        let Some(slot) = quests.iter_mut().find(|quest| quest.id() == id) else {
            return Ok(None);
        };
        *slot = patch.apply_to(slot.clone());
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: &QuestId) -> Result<bool, QuestRepositoryError> {
        let mut quests = self.quests.lock().expect("store poisoned");
        let before = quests.len();
        quests.retain(|quest| quest.id() != id);
        Ok(quests.len() < before)
    }

    async fn totals(&self) -> Result<QuestTotals, QuestRepositoryError> {
        let quests = self.quests.lock().expect("store poisoned");
        let count = |status: QuestStatus| {
            u64::try_from(quests.iter().filter(|q| q.status() == status).count())
                .expect("count fits")
        };
        Ok(QuestTotals {
            total: u64::try_from(quests.len()).expect("count fits"),
            prepare: count(QuestStatus::Prepare),
            active: count(QuestStatus::Active),
            done: count(QuestStatus::Done),
            studied_minutes: quests
                .iter()
                .map(|q| i64::from(q.studied_minutes().get()))
                .sum(),
            suggested_minutes: quests
                .iter()
                .map(|q| i64::from(q.suggested_minutes().get()))
                .sum(),
        })
    }
}

type Service = QuestService<InMemoryQuestRepository>;

#[fixture]
fn service() -> Service {
    QuestService::new(
        Arc::new(InMemoryQuestRepository::default()),
        Arc::new(SequentialIds::default()),
        fixture_clock(),
    )
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn create_body(deadline: &str, studied: i64, suggested: i64) -> CreateQuestRequest {
    CreateQuestRequest {
        fields: object(json!({
            "title": "Practice Problems",
            "subject": "Math",
            "studied_minutes": studied,
            "suggested_minutes": suggested,
            "deadline": deadline,
        })),
    }
}

fn list_request() -> ListQuestsRequest {
    ListQuestsRequest::default()
}

#[rstest]
#[tokio::test]
async fn create_assigns_identity_and_date(service: Service) {
    let quest = service
        .create_quest(create_body("2025-02-22", 0, 60))
        .await
        .expect("quest created");
    assert_eq!(quest.id().as_ref(), "quest_001");
    assert_eq!(quest.created_at().to_string(), "2025-02-18");
    assert!(quest.storage_id().is_some());
    assert_eq!(quest.status(), QuestStatus::Prepare);
}

#[rstest]
#[tokio::test]
async fn create_ignores_client_supplied_identity(service: Service) {
    let mut request = create_body("2025-02-22", 0, 60);
    request.fields.insert("id".into(), json!("quest_mine"));
    request.fields.insert("created_at".into(), json!("1999-12-31"));
    let quest = service.create_quest(request).await.expect("quest created");
    assert_eq!(quest.id().as_ref(), "quest_001");
    assert_eq!(quest.created_at().to_string(), "2025-02-18");
}

#[rstest]
#[case("title")]
#[case("subject")]
#[case("suggested_minutes")]
#[case("deadline")]
#[tokio::test]
async fn create_requires_fields(service: Service, #[case] field: &str) {
    let mut request = create_body("2025-02-22", 0, 60);
    request.fields.remove(field);
    let err = service.create_quest(request).await.expect_err("validation");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert!(err.message().contains(field));
}

#[rstest]
#[tokio::test]
async fn create_rejects_zero_suggested_minutes(service: Service) {
    let err = service
        .create_quest(create_body("2025-02-22", 0, 0))
        .await
        .expect_err("validation");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details(),
        Some(&json!({ "field": "suggested_minutes", "code": "out_of_range" }))
    );
}

#[rstest]
#[tokio::test]
async fn create_rejects_unknown_status(service: Service) {
    let mut request = create_body("2025-02-22", 0, 60);
    request.fields.insert("status".into(), json!("finished"));
    let err = service.create_quest(request).await.expect_err("validation");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn rapid_creates_never_collide() {
    let clock = fixture_clock();
    let service = QuestService::new(
        Arc::new(InMemoryQuestRepository::default()),
        Arc::new(TimeRandomQuestIdGenerator::new(clock.clone())),
        clock,
    );
    let mut ids = HashSet::new();
    for _ in 0..200 {
        let quest = service
            .create_quest(create_body("2025-02-22", 0, 30))
            .await
            .expect("quest created");
        assert!(quest.id().as_ref().starts_with("quest_"));
        ids.insert(quest.id().to_string());
    }
    assert_eq!(ids.len(), 200);
}

#[rstest]
#[tokio::test]
async fn update_applies_only_allowed_fields(service: Service) {
    let created = service
        .create_quest(create_body("2025-02-22", 0, 60))
        .await
        .expect("quest created");
    let updated = service
        .update_quest(UpdateQuestRequest {
            quest_id: created.id().to_string(),
            fields: object(json!({
                "status": "active",
                "id": "quest_other",
                "created_at": "2000-01-01",
                "colour": "blue",
            })),
        })
        .await
        .expect("quest updated");
    assert_eq!(updated.status(), QuestStatus::Active);
    assert_eq!(updated.id(), created.id());
    assert_eq!(updated.created_at(), created.created_at());
    assert_eq!(updated.title(), created.title());
}

#[rstest]
#[tokio::test]
async fn update_with_only_disallowed_keys_is_rejected(service: Service) {
    let created = service
        .create_quest(create_body("2025-02-22", 0, 60))
        .await
        .expect("quest created");
    let err = service
        .update_quest(UpdateQuestRequest {
            quest_id: created.id().to_string(),
            fields: object(json!({ "id": "quest_other", "owner": "me" })),
        })
        .await
        .expect_err("validation");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "No valid fields to update");
}

#[rstest]
#[case("quest_404")]
#[case("not-a-quest")]
#[tokio::test]
async fn update_of_unknown_quest_is_not_found(service: Service, #[case] id: &str) {
    let err = service
        .update_quest(UpdateQuestRequest {
            quest_id: id.to_owned(),
            fields: object(json!({ "status": "done" })),
        })
        .await
        .expect_err("not found");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Quest not found");
}

#[rstest]
#[tokio::test]
async fn delete_then_get_is_not_found(service: Service) {
    let created = service
        .create_quest(create_body("2025-02-22", 0, 60))
        .await
        .expect("quest created");
    let response = service
        .delete_quest(created.id().as_ref())
        .await
        .expect("deleted");
    assert_eq!(&response.quest_id, created.id());

    let err = service
        .get_quest(created.id().as_ref())
        .await
        .expect_err("gone");
    assert_eq!(err.code(), ErrorCode::NotFound);

    let err = service
        .delete_quest(created.id().as_ref())
        .await
        .expect_err("already gone");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn list_applies_deadline_bounds(service: Service) {
    for deadline in ["2025-02-19", "2025-02-20", "2025-02-22", "2025-02-25"] {
        service
            .create_quest(create_body(deadline, 0, 30))
            .await
            .expect("quest created");
    }

    let before = service
        .list_quests(&ListQuestsRequest {
            deadline_before: Some("2025-02-22".into()),
            ..list_request()
        })
        .await
        .expect("listed");
    assert_eq!(before.len(), 3);
    assert!(before.iter().all(|q| q.deadline().to_string().as_str() <= "2025-02-22"));

    let between = service
        .list_quests(&ListQuestsRequest {
            deadline_before: Some("2025-02-22".into()),
            deadline_after: Some("2025-02-20".into()),
            ..list_request()
        })
        .await
        .expect("listed");
    let deadlines: Vec<String> = between.iter().map(|q| q.deadline().to_string()).collect();
    assert_eq!(deadlines.len(), 2);
    assert!(deadlines.contains(&"2025-02-20".to_owned()));
    assert!(deadlines.contains(&"2025-02-22".to_owned()));
}

#[rstest]
#[tokio::test]
async fn list_rejects_invalid_status_filter(service: Service) {
    let err = service
        .list_quests(&ListQuestsRequest {
            status: Some("archived".into()),
            ..list_request()
        })
        .await
        .expect_err("validation");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn stats_report_completion_rate(service: Service) {
    service
        .create_quest(create_body("2025-02-22", 10, 20))
        .await
        .expect("quest created");
    service
        .create_quest(create_body("2025-02-23", 20, 40))
        .await
        .expect("quest created");

    let stats = service.quest_stats().await.expect("stats");
    assert_eq!(stats.totals().total, 2);
    assert_eq!(stats.totals().prepare, 2);
    assert_eq!(stats.totals().studied_minutes, 30);
    assert_eq!(stats.totals().suggested_minutes, 60);
    assert_eq!(stats.completion_rate(), "50.00%");
}

#[rstest]
#[tokio::test]
async fn stats_on_empty_collection(service: Service) {
    let stats = service.quest_stats().await.expect("stats");
    assert_eq!(stats.totals(), &QuestTotals::default());
    assert_eq!(stats.completion_rate(), "0%");
}

fn mock_service(repo: MockQuestRepository) -> QuestService<MockQuestRepository> {
    QuestService::new(
        Arc::new(repo),
        Arc::new(SequentialIds::default()),
        fixture_clock(),
    )
}

#[rstest]
#[case(QuestRepositoryError::connection("no servers"), ErrorCode::ServiceUnavailable)]
#[case(QuestRepositoryError::query("validation failed"), ErrorCode::PersistenceError)]
#[case(QuestRepositoryError::duplicate("quest_001"), ErrorCode::PersistenceError)]
#[tokio::test]
async fn repository_errors_are_mapped(
    #[case] failure: QuestRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockQuestRepository::new();
    repo.expect_insert()
        .times(1)
        .return_once(move |_| Err(failure));
    let err = mock_service(repo)
        .create_quest(create_body("2025-02-22", 0, 30))
        .await
        .expect_err("repository failure");
    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn persistence_errors_keep_underlying_message() {
    let mut repo = MockQuestRepository::new();
    repo.expect_totals()
        .times(1)
        .return_once(|| Err(QuestRepositoryError::query("aggregate failed")));
    let err = mock_service(repo).quest_stats().await.expect_err("failure");
    assert_eq!(err.message(), "aggregate failed");
}

#[rstest]
#[tokio::test]
async fn validation_failures_skip_the_repository() {
    let mut repo = MockQuestRepository::new();
    repo.expect_insert().never();
    repo.expect_update().never();
    let service = mock_service(repo);

    service
        .create_quest(CreateQuestRequest::default())
        .await
        .expect_err("missing fields");
    service
        .update_quest(UpdateQuestRequest {
            quest_id: "quest_001".into(),
            fields: Map::new(),
        })
        .await
        .expect_err("empty patch");
}
