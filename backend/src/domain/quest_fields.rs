//! Parsing of client-supplied quest fields.
//!
//! Request bodies arrive as loosely typed JSON objects. These helpers turn
//! individual values into validated quest value types; creation and patching
//! share them so both paths enforce the same rules.

use serde_json::{Map, Value};

use super::quest::{
    CalendarDate, EffortType, Quest, QuestDraft, QuestId, QuestStatus, QuestTitle,
    QuestValidationError, StudiedMinutes, Subject, SuggestedMinutes, Visibility,
};

/// Fields a create request must carry.
pub const REQUIRED_FIELDS: [&str; 4] = ["title", "subject", "suggested_minutes", "deadline"];

fn as_str<'a>(value: &'a Value, field: &'static str) -> Result<&'a str, QuestValidationError> {
    value.as_str().ok_or(QuestValidationError::WrongType {
        field,
        expected: "a string",
    })
}

/// Integer minutes from a JSON number or an integer-valued string.
fn as_minutes(value: &Value, field: &'static str) -> Result<i64, QuestValidationError> {
    let wrong_type = QuestValidationError::WrongType {
        field,
        expected: "an integer",
    };
    match value {
        Value::Number(number) => match (number.as_i64(), number.as_u64()) {
            (Some(whole), _) => Ok(whole),
            (None, Some(_)) => Err(QuestValidationError::MinutesOutOfRange { field }),
            (None, None) => Err(wrong_type),
        },
        Value::String(text) => text.trim().parse::<i64>().map_err(|_| wrong_type),
        _ => Err(wrong_type),
    }
}

pub(crate) fn parse_title(value: &Value) -> Result<QuestTitle, QuestValidationError> {
    QuestTitle::new(as_str(value, "title")?)
}

pub(crate) fn parse_subject(value: &Value) -> Result<Subject, QuestValidationError> {
    Subject::new(as_str(value, "subject")?)
}

/// Free text that `null` clears.
pub(crate) fn parse_text(value: &Value, field: &'static str) -> Result<String, QuestValidationError> {
    match value {
        Value::Null => Ok(String::new()),
        other => as_str(other, field).map(str::to_owned),
    }
}

pub(crate) fn parse_effort_type(value: &Value) -> Result<EffortType, QuestValidationError> {
    as_str(value, "effort_type")?.parse()
}

pub(crate) fn parse_studied_minutes(value: &Value) -> Result<StudiedMinutes, QuestValidationError> {
    StudiedMinutes::new(as_minutes(value, "studied_minutes")?)
}

pub(crate) fn parse_suggested_minutes(
    value: &Value,
) -> Result<SuggestedMinutes, QuestValidationError> {
    SuggestedMinutes::new(as_minutes(value, "suggested_minutes")?)
}

pub(crate) fn parse_deadline(value: &Value) -> Result<CalendarDate, QuestValidationError> {
    CalendarDate::parse(as_str(value, "deadline")?, "deadline")
}

pub(crate) fn parse_visibility(value: &Value) -> Result<Visibility, QuestValidationError> {
    as_str(value, "visibility")?.parse()
}

pub(crate) fn parse_status(value: &Value) -> Result<QuestStatus, QuestValidationError> {
    as_str(value, "status")?.parse()
}

/// Treats `null` and empty strings like an absent key.
fn present<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    match fields.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) if text.is_empty() => None,
        Some(value) => Some(value),
    }
}

/// Validated content of a create request, before an id is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuest {
    pub title: QuestTitle,
    pub description: String,
    pub subject: Subject,
    pub topic: String,
    pub effort_type: EffortType,
    pub studied_minutes: StudiedMinutes,
    pub suggested_minutes: SuggestedMinutes,
    pub deadline: CalendarDate,
    pub visibility: Visibility,
    pub status: QuestStatus,
}

impl NewQuest {
    /// Validate a create payload. Unknown keys, including client-supplied
    /// `id` and `created_at`, are ignored.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, QuestValidationError> {
        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .into_iter()
            .filter(|key| present(fields, key).is_none())
            .collect();
        let (Some(title), Some(subject), Some(suggested), Some(deadline)) = (
            present(fields, "title"),
            present(fields, "subject"),
            present(fields, "suggested_minutes"),
            present(fields, "deadline"),
        ) else {
            return Err(QuestValidationError::MissingFields(missing));
        };

        Ok(Self {
            title: parse_title(title)?,
            description: present(fields, "description")
                .map(|value| parse_text(value, "description"))
                .transpose()?
                .unwrap_or_default(),
            subject: parse_subject(subject)?,
            topic: present(fields, "topic")
                .map(|value| parse_text(value, "topic"))
                .transpose()?
                .unwrap_or_default(),
            effort_type: present(fields, "effort_type")
                .map(parse_effort_type)
                .transpose()?
                .unwrap_or_default(),
            studied_minutes: fields
                .get("studied_minutes")
                .filter(|value| !value.is_null())
                .map(parse_studied_minutes)
                .transpose()?
                .unwrap_or_default(),
            suggested_minutes: parse_suggested_minutes(suggested)?,
            deadline: parse_deadline(deadline)?,
            visibility: fields
                .get("visibility")
                .filter(|value| !value.is_null())
                .map(parse_visibility)
                .transpose()?
                .unwrap_or_default(),
            status: fields
                .get("status")
                .filter(|value| !value.is_null())
                .map(parse_status)
                .transpose()?
                .unwrap_or_default(),
        })
    }

    /// Complete the quest with its server-assigned identity and date.
    pub fn into_quest(self, id: QuestId, created_at: CalendarDate) -> Quest {
        Quest::new(QuestDraft {
            id,
            title: self.title,
            description: self.description,
            subject: self.subject,
            topic: self.topic,
            effort_type: self.effort_type,
            studied_minutes: self.studied_minutes,
            suggested_minutes: self.suggested_minutes,
            deadline: self.deadline,
            visibility: self.visibility,
            status: self.status,
            created_at,
        })
    }
}
