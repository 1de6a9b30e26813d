//! Quest aggregate and its value types.
//!
//! A quest is a study task with a deadline, a target duration and a
//! lifecycle status. Every field is a validated value type so adapters can
//! only persist quests that satisfy the collection validator.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::json;

use crate::domain::Error;

/// Prefix carried by every quest identifier.
pub const QUEST_ID_PREFIX: &str = "quest_";
/// Maximum title length in characters.
pub const TITLE_MAX: usize = 200;
/// Smallest accepted `suggested_minutes` value.
pub const SUGGESTED_MINUTES_MIN: i32 = 1;

/// Validation failures for quest fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("quest id must start with '{QUEST_ID_PREFIX}'")]
    InvalidId,
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("subject must not be empty")]
    EmptySubject,
    #[error("effort_type must not be empty")]
    EmptyEffortType,
    #[error("status must be one of prepare, active, done")]
    InvalidStatus(String),
    #[error("visibility must be one of private, shared")]
    InvalidVisibility(String),
    #[error("studied_minutes must be at least 0")]
    NegativeStudiedMinutes,
    #[error("suggested_minutes must be at least {SUGGESTED_MINUTES_MIN}")]
    SuggestedMinutesTooSmall,
    #[error("{field} must be at most {}", i32::MAX)]
    MinutesOutOfRange { field: &'static str },
    #[error("{field} must be a date in YYYY-MM-DD format")]
    InvalidDate { field: &'static str, value: String },
    #[error("{field} must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("No valid fields to update")]
    NoUpdatableFields,
}

impl QuestValidationError {
    /// Field the failure refers to, when it concerns a single field.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingFields(_) | Self::NoUpdatableFields => None,
            Self::InvalidId => Some("id"),
            Self::EmptyTitle | Self::TitleTooLong { .. } => Some("title"),
            Self::EmptySubject => Some("subject"),
            Self::EmptyEffortType => Some("effort_type"),
            Self::InvalidStatus(_) => Some("status"),
            Self::InvalidVisibility(_) => Some("visibility"),
            Self::NegativeStudiedMinutes => Some("studied_minutes"),
            Self::SuggestedMinutesTooSmall => Some("suggested_minutes"),
            Self::MinutesOutOfRange { field }
            | Self::InvalidDate { field, .. }
            | Self::WrongType { field, .. } => Some(field),
        }
    }

    /// Stable machine-readable code for the failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingFields(_) => "missing_fields",
            Self::InvalidId => "invalid_id",
            Self::EmptyTitle | Self::EmptySubject | Self::EmptyEffortType => "empty_value",
            Self::TitleTooLong { .. } => "too_long",
            Self::InvalidStatus(_) | Self::InvalidVisibility(_) => "invalid_enum_value",
            Self::NegativeStudiedMinutes
            | Self::SuggestedMinutesTooSmall
            | Self::MinutesOutOfRange { .. } => "out_of_range",
            Self::InvalidDate { .. } => "invalid_date",
            Self::WrongType { .. } => "wrong_type",
            Self::NoUpdatableFields => "no_updatable_fields",
        }
    }
}

impl From<QuestValidationError> for Error {
    fn from(value: QuestValidationError) -> Self {
        let details = match (&value, value.field()) {
            (QuestValidationError::MissingFields(fields), _) => {
                json!({ "fields": fields, "code": value.code() })
            }
            (_, Some(field)) => json!({ "field": field, "code": value.code() }),
            (_, None) => json!({ "code": value.code() }),
        };
        Error::invalid_request(value.to_string()).with_details(details)
    }
}

/// Server-generated quest identifier (`quest_...`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuestId(String);

impl QuestId {
    /// Validate an identifier carrying the `quest_` prefix.
    pub fn new(id: impl Into<String>) -> Result<Self, QuestValidationError> {
        let id = id.into();
        match id.strip_prefix(QUEST_ID_PREFIX) {
            Some(rest) if !rest.is_empty() && id.trim() == id => Ok(Self(id)),
            _ => Err(QuestValidationError::InvalidId),
        }
    }

    /// Prefix a generated, non-empty suffix.
    pub(crate) fn from_suffix(suffix: &str) -> Self {
        Self(format!("{QUEST_ID_PREFIX}{suffix}"))
    }
}

impl AsRef<str> for QuestId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for QuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Quest title, 1 to [`TITLE_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestTitle(String);

impl QuestTitle {
    /// Validate a title.
    pub fn new(title: impl Into<String>) -> Result<Self, QuestValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(QuestValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(QuestValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(title))
    }
}

impl AsRef<str> for QuestTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Subject area such as `Math`; never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject(String);

impl Subject {
    /// Validate a subject.
    pub fn new(subject: impl Into<String>) -> Result<Self, QuestValidationError> {
        let subject = subject.into();
        if subject.trim().is_empty() {
            return Err(QuestValidationError::EmptySubject);
        }
        Ok(Self(subject))
    }
}

impl AsRef<str> for Subject {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Lifecycle status of a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuestStatus {
    /// Planned but not started.
    #[default]
    Prepare,
    /// In progress.
    Active,
    /// Finished.
    Done,
}

impl QuestStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Prepare, Self::Active, Self::Done];

    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prepare => "prepare",
            Self::Active => "active",
            Self::Done => "done",
        }
    }
}

impl FromStr for QuestStatus {
    type Err = QuestValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prepare" => Ok(Self::Prepare),
            "active" => Ok(Self::Active),
            "done" => Ok(Self::Done),
            other => Err(QuestValidationError::InvalidStatus(other.to_owned())),
        }
    }
}

impl fmt::Display for QuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who may see a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Visible to the owner only.
    Private,
    /// Visible to linked parents.
    #[default]
    Shared,
}

impl Visibility {
    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Shared => "shared",
        }
    }
}

impl FromStr for Visibility {
    type Err = QuestValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Self::Private),
            "shared" => Ok(Self::Shared),
            other => Err(QuestValidationError::InvalidVisibility(other.to_owned())),
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of effort a quest asks for.
///
/// The four named kinds are the ones clients offer; stored data may carry
/// other labels (for example `practice`), which round-trip through
/// [`EffortType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum EffortType {
    #[default]
    FocusTime,
    ProblemSet,
    Reading,
    Custom,
    Other(String),
}

impl EffortType {
    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::FocusTime => "focus_time",
            Self::ProblemSet => "problem_set",
            Self::Reading => "reading",
            Self::Custom => "custom",
            Self::Other(label) => label.as_str(),
        }
    }
}

impl FromStr for EffortType {
    type Err = QuestValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "focus_time" => Ok(Self::FocusTime),
            "problem_set" => Ok(Self::ProblemSet),
            "reading" => Ok(Self::Reading),
            "custom" => Ok(Self::Custom),
            other if other.trim().is_empty() => Err(QuestValidationError::EmptyEffortType),
            other => Ok(Self::Other(other.to_owned())),
        }
    }
}

impl fmt::Display for EffortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn minutes_in_range(value: i64, field: &'static str) -> Result<i32, QuestValidationError> {
    i32::try_from(value).map_err(|_| QuestValidationError::MinutesOutOfRange { field })
}

/// Minutes already spent on a quest (≥ 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct StudiedMinutes(i32);

impl StudiedMinutes {
    /// Validate a studied-minutes value.
    pub fn new(value: i64) -> Result<Self, QuestValidationError> {
        if value < 0 {
            return Err(QuestValidationError::NegativeStudiedMinutes);
        }
        minutes_in_range(value, "studied_minutes").map(Self)
    }

    /// Raw minute count.
    pub fn get(self) -> i32 {
        self.0
    }
}

/// Target duration of a quest in minutes (≥ 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SuggestedMinutes(i32);

impl SuggestedMinutes {
    /// Validate a suggested-minutes value.
    pub fn new(value: i64) -> Result<Self, QuestValidationError> {
        if value < i64::from(SUGGESTED_MINUTES_MIN) {
            return Err(QuestValidationError::SuggestedMinutesTooSmall);
        }
        minutes_in_range(value, "suggested_minutes").map(Self)
    }

    /// Raw minute count.
    pub fn get(self) -> i32 {
        self.0
    }
}

static DATE_RE: OnceLock<Regex> = OnceLock::new();

fn date_regex() -> &'static Regex {
    DATE_RE.get_or_init(|| {
        Regex::new("^[0-9]{4}-[0-9]{2}-[0-9]{2}$")
            .unwrap_or_else(|error| panic!("date regex failed to compile: {error}"))
    })
}

/// Calendar date stored as `YYYY-MM-DD`.
///
/// The textual form sorts chronologically, which range filters rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Parse a strict `YYYY-MM-DD` string naming a real date.
    pub fn parse(value: &str, field: &'static str) -> Result<Self, QuestValidationError> {
        let invalid = || QuestValidationError::InvalidDate {
            field,
            value: value.to_owned(),
        };
        if !date_regex().is_match(value) {
            return Err(invalid());
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| invalid())
    }

    /// Wrap an already valid date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Underlying date.
    pub fn date(self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Validated components of a quest.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestDraft {
    pub id: QuestId,
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
    pub created_at: CalendarDate,
}

/// Study quest.
///
/// ## Invariants
/// - `id` starts with `quest_` and never changes.
/// - `created_at` is set once at creation.
/// - `storage_id` is the document identity assigned by the store; it is
///   absent until the quest has been persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Quest {
    storage_id: Option<String>,
    draft: QuestDraft,
}

impl Quest {
    /// Build a quest that has not been stored yet.
    pub fn new(draft: QuestDraft) -> Self {
        Self {
            storage_id: None,
            draft,
        }
    }

    /// Attach the storage-assigned identity.
    pub fn with_storage_id(mut self, storage_id: impl Into<String>) -> Self {
        self.storage_id = Some(storage_id.into());
        self
    }

    pub fn storage_id(&self) -> Option<&str> {
        self.storage_id.as_deref()
    }

    pub fn id(&self) -> &QuestId {
        &self.draft.id
    }

    pub fn title(&self) -> &QuestTitle {
        &self.draft.title
    }

    pub fn description(&self) -> &str {
        &self.draft.description
    }

    pub fn subject(&self) -> &Subject {
        &self.draft.subject
    }

    pub fn topic(&self) -> &str {
        &self.draft.topic
    }

    pub fn effort_type(&self) -> &EffortType {
        &self.draft.effort_type
    }

    pub fn studied_minutes(&self) -> StudiedMinutes {
        self.draft.studied_minutes
    }

    pub fn suggested_minutes(&self) -> SuggestedMinutes {
        self.draft.suggested_minutes
    }

    pub fn deadline(&self) -> CalendarDate {
        self.draft.deadline
    }

    pub fn visibility(&self) -> Visibility {
        self.draft.visibility
    }

    pub fn status(&self) -> QuestStatus {
        self.draft.status
    }

    pub fn created_at(&self) -> CalendarDate {
        self.draft.created_at
    }

    /// Mutable view used when applying an allow-listed patch.
    #[cfg(test)]
    pub(crate) fn draft_mut(&mut self) -> &mut QuestDraft {
        &mut self.draft
    }
}

#[cfg(test)]
mod tests;
