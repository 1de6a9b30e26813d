//! Allow-listed partial updates to a quest.

use serde_json::{Map, Value};

use super::quest::{
    CalendarDate, EffortType, QuestStatus, QuestTitle, QuestValidationError, StudiedMinutes,
    Subject, SuggestedMinutes, Visibility,
};
#[cfg(test)]
use super::quest::Quest;
use super::quest_fields::{
    parse_deadline, parse_effort_type, parse_status, parse_studied_minutes,
    parse_subject, parse_suggested_minutes, parse_text, parse_title, parse_visibility,
};

/// Keys a patch may touch. Anything else in a request body is dropped.
pub const UPDATABLE_FIELDS: [&str; 10] = [
    "title",
    "description",
    "subject",
    "topic",
    "effort_type",
    "studied_minutes",
    "suggested_minutes",
    "deadline",
    "visibility",
    "status",
];

/// Validated set of field changes.
///
/// ## Invariants
/// - At least one field is set.
/// - `id` and `created_at` can never be expressed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestPatch {
    pub title: Option<QuestTitle>,
    pub description: Option<String>,
    pub subject: Option<Subject>,
    pub topic: Option<String>,
    pub effort_type: Option<EffortType>,
    pub studied_minutes: Option<StudiedMinutes>,
    pub suggested_minutes: Option<SuggestedMinutes>,
    pub deadline: Option<CalendarDate>,
    pub visibility: Option<Visibility>,
    pub status: Option<QuestStatus>,
}

fn reject_null<'a>(
    value: &'a Value,
    field: &'static str,
) -> Result<&'a Value, QuestValidationError> {
    if value.is_null() {
        return Err(QuestValidationError::WrongType {
            field,
            expected: "a non-null value",
        });
    }
    Ok(value)
}

impl QuestPatch {
    /// Build a patch from a request body.
    ///
    /// `null` clears `description` and `topic`; it is rejected for every
    /// other field.
    ///
    /// # Examples
    /// ```
    /// use effortee::domain::QuestPatch;
    /// use serde_json::json;
    ///
    /// let body = json!({ "status": "done", "id": "quest_other" });
    /// let patch = QuestPatch::from_fields(body.as_object().expect("object")).expect("valid");
    /// assert_eq!(patch.changed_fields(), vec!["status"]);
    /// ```
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, QuestValidationError> {
        let mut patch = Self::default();
        for key in UPDATABLE_FIELDS {
            let Some(value) = fields.get(key) else {
                continue;
            };
            match key {
                "title" => patch.title = Some(parse_title(reject_null(value, "title")?)?),
                "description" => patch.description = Some(parse_text(value, "description")?),
                "subject" => patch.subject = Some(parse_subject(reject_null(value, "subject")?)?),
                "topic" => patch.topic = Some(parse_text(value, "topic")?),
                "effort_type" => {
                    patch.effort_type =
                        Some(parse_effort_type(reject_null(value, "effort_type")?)?);
                }
                "studied_minutes" => {
                    patch.studied_minutes =
                        Some(parse_studied_minutes(reject_null(value, "studied_minutes")?)?);
                }
                "suggested_minutes" => {
                    patch.suggested_minutes =
                        Some(parse_suggested_minutes(reject_null(value, "suggested_minutes")?)?);
                }
                "deadline" => {
                    patch.deadline = Some(parse_deadline(reject_null(value, "deadline")?)?);
                }
                "visibility" => {
                    patch.visibility = Some(parse_visibility(reject_null(value, "visibility")?)?);
                }
                _ => patch.status = Some(parse_status(reject_null(value, "status")?)?),
            }
        }
        if patch.is_empty() {
            return Err(QuestValidationError::NoUpdatableFields);
        }
        Ok(patch)
    }

    /// Names of the fields this patch sets, in allow-list order.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let set = [
            self.title.is_some(),
            self.description.is_some(),
            self.subject.is_some(),
            self.topic.is_some(),
            self.effort_type.is_some(),
            self.studied_minutes.is_some(),
            self.suggested_minutes.is_some(),
            self.deadline.is_some(),
            self.visibility.is_some(),
            self.status.is_some(),
        ];
        UPDATABLE_FIELDS
            .into_iter()
            .zip(set)
            .filter_map(|(name, is_set)| is_set.then_some(name))
            .collect()
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }

    /// Apply the changes to `quest`, leaving identity fields untouched.
    ///
    /// MongoDB applies patches server-side with `$set`; this copy serves the
    /// in-memory repositories used in tests.
    #[cfg(test)]
    pub(crate) fn apply_to(&self, mut quest: Quest) -> Quest {
        let draft = quest.draft_mut();
        if let Some(title) = &self.title {
            draft.title = title.clone();
        }
        if let Some(description) = &self.description {
            draft.description = description.clone();
        }
        if let Some(subject) = &self.subject {
            draft.subject = subject.clone();
        }
        if let Some(topic) = &self.topic {
            draft.topic = topic.clone();
        }
        if let Some(effort_type) = &self.effort_type {
            draft.effort_type = effort_type.clone();
        }
        if let Some(minutes) = self.studied_minutes {
            draft.studied_minutes = minutes;
        }
        if let Some(minutes) = self.suggested_minutes {
            draft.suggested_minutes = minutes;
        }
        if let Some(deadline) = self.deadline {
            draft.deadline = deadline;
        }
        if let Some(visibility) = self.visibility {
            draft.visibility = visibility;
        }
        if let Some(status) = self.status {
            draft.status = status;
        }
        quest
    }
}
