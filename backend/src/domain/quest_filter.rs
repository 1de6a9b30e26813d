//! Query filters for listing quests.

use super::quest::{CalendarDate, QuestStatus, QuestValidationError, Visibility};
#[cfg(test)]
use super::quest::Quest;

/// Exact-match and inclusive deadline-range filters.
///
/// Every filter is optional; an empty filter matches every quest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestFilter {
    pub status: Option<QuestStatus>,
    pub subject: Option<String>,
    pub visibility: Option<Visibility>,
    /// Keep quests with `deadline <= deadline_before`.
    pub deadline_before: Option<CalendarDate>,
    /// Keep quests with `deadline >= deadline_after`.
    pub deadline_after: Option<CalendarDate>,
}

/// Raw query-string values as received by an inbound adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawQuestFilter<'a> {
    pub status: Option<&'a str>,
    pub subject: Option<&'a str>,
    pub visibility: Option<&'a str>,
    pub deadline_before: Option<&'a str>,
    pub deadline_after: Option<&'a str>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

impl QuestFilter {
    /// Parse raw query values. Empty strings are treated as absent.
    ///
    /// # Examples
    /// ```
    /// use effortee::domain::{QuestFilter, QuestStatus, RawQuestFilter};
    ///
    /// let filter = QuestFilter::parse(RawQuestFilter {
    ///     status: Some("done"),
    ///     subject: Some(""),
    ///     ..RawQuestFilter::default()
    /// })
    /// .expect("valid filter");
    /// assert_eq!(filter.status, Some(QuestStatus::Done));
    /// assert_eq!(filter.subject, None);
    /// ```
    pub fn parse(raw: RawQuestFilter<'_>) -> Result<Self, QuestValidationError> {
        Ok(Self {
            status: non_empty(raw.status).map(str::parse).transpose()?,
            subject: non_empty(raw.subject).map(str::to_owned),
            visibility: non_empty(raw.visibility).map(str::parse).transpose()?,
            deadline_before: non_empty(raw.deadline_before)
                .map(|value| CalendarDate::parse(value, "deadline_before"))
                .transpose()?,
            deadline_after: non_empty(raw.deadline_after)
                .map(|value| CalendarDate::parse(value, "deadline_after"))
                .transpose()?,
        })
    }

    /// Whether `quest` satisfies every set filter.
    ///
    /// Mirrors the query document MongoDB evaluates, for in-memory
    /// repositories in tests.
    #[cfg(test)]
    pub(crate) fn matches(&self, quest: &Quest) -> bool {
        self.status.is_none_or(|status| quest.status() == status)
            && self
                .subject
                .as_deref()
                .is_none_or(|subject| quest.subject().as_ref() == subject)
            && self
                .visibility
                .is_none_or(|visibility| quest.visibility() == visibility)
            && self
                .deadline_before
                .is_none_or(|bound| quest.deadline() <= bound)
            && self
                .deadline_after
                .is_none_or(|bound| quest.deadline() >= bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quest_fields::NewQuest;
    use crate::domain::QuestId;
    use rstest::rstest;
    use serde_json::json;

    fn quest_due(deadline: &str, status: &str) -> Quest {
        let body = json!({
            "title": "Practice",
            "subject": "Math",
            "suggested_minutes": 30,
            "deadline": deadline,
            "status": status,
        });
        let fields = body.as_object().expect("object literal");
        NewQuest::from_fields(fields)
            .expect("valid quest")
            .into_quest(
                QuestId::new("quest_1").expect("valid id"),
                CalendarDate::parse("2025-02-01", "created_at").expect("valid date"),
            )
    }

    #[rstest]
    fn empty_values_are_absent() {
        let filter = QuestFilter::parse(RawQuestFilter {
            status: Some(""),
            subject: Some(""),
            visibility: Some(""),
            deadline_before: Some(""),
            deadline_after: Some(""),
        })
        .expect("valid filter");
        assert_eq!(filter, QuestFilter::default());
    }

    #[rstest]
    #[case(RawQuestFilter { status: Some("archived"), ..RawQuestFilter::default() })]
    #[case(RawQuestFilter { visibility: Some("public"), ..RawQuestFilter::default() })]
    #[case(RawQuestFilter { deadline_before: Some("next week"), ..RawQuestFilter::default() })]
    #[case(RawQuestFilter { deadline_after: Some("2025-13-01"), ..RawQuestFilter::default() })]
    fn rejects_invalid_values(#[case] raw: RawQuestFilter<'static>) {
        assert!(QuestFilter::parse(raw).is_err());
    }

    #[rstest]
    #[case("2025-02-21", true)]
    #[case("2025-02-22", true)]
    #[case("2025-02-23", false)]
    fn deadline_before_is_inclusive(#[case] deadline: &str, #[case] expected: bool) {
        let filter = QuestFilter::parse(RawQuestFilter {
            deadline_before: Some("2025-02-22"),
            ..RawQuestFilter::default()
        })
        .expect("valid filter");
        assert_eq!(filter.matches(&quest_due(deadline, "prepare")), expected);
    }

    #[rstest]
    #[case("2025-02-19", false)]
    #[case("2025-02-20", true)]
    #[case("2025-02-22", true)]
    #[case("2025-02-23", false)]
    fn combined_bounds_intersect(#[case] deadline: &str, #[case] expected: bool) {
        let filter = QuestFilter::parse(RawQuestFilter {
            deadline_after: Some("2025-02-20"),
            deadline_before: Some("2025-02-22"),
            ..RawQuestFilter::default()
        })
        .expect("valid filter");
        assert_eq!(filter.matches(&quest_due(deadline, "prepare")), expected);
    }

    #[rstest]
    fn status_filter_is_exact() {
        let filter = QuestFilter {
            status: Some(QuestStatus::Done),
            ..QuestFilter::default()
        };
        assert!(filter.matches(&quest_due("2025-02-22", "done")));
        assert!(!filter.matches(&quest_due("2025-02-22", "active")));
    }
}
