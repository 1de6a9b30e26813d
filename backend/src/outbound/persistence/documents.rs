//! BSON document shapes for the `users` and `quests` collections.
//!
//! These structs are internal to the adapter. Conversions into domain types
//! re-run domain validation so a hand-edited document surfaces as a query
//! error rather than an invalid [`Quest`] or [`User`].

use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::domain::{
    CalendarDate, EffortType, Email, Quest, QuestDraft, QuestId, QuestStatus, QuestTitle,
    QuestValidationError, StudiedMinutes, Subject, SuggestedMinutes, User, UserId, UserName,
    UserRole, UserValidationError, Visibility,
};

/// Stored quest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct QuestDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub(crate) object_id: Option<ObjectId>,
    pub(crate) id: String,
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: String,
    pub(crate) subject: String,
    #[serde(default)]
    pub(crate) topic: String,
    #[serde(default = "default_effort_type")]
    pub(crate) effort_type: String,
    #[serde(default)]
    pub(crate) studied_minutes: i32,
    pub(crate) suggested_minutes: i32,
    pub(crate) deadline: String,
    #[serde(default = "default_visibility")]
    pub(crate) visibility: String,
    #[serde(default = "default_status")]
    pub(crate) status: String,
    pub(crate) created_at: String,
}

fn default_effort_type() -> String {
    EffortType::default().as_str().to_owned()
}

fn default_visibility() -> String {
    Visibility::default().as_str().to_owned()
}

fn default_status() -> String {
    QuestStatus::default().as_str().to_owned()
}

impl From<&Quest> for QuestDocument {
    fn from(quest: &Quest) -> Self {
        Self {
            object_id: quest
                .storage_id()
                .and_then(|hex| ObjectId::parse_str(hex).ok()),
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

impl TryFrom<QuestDocument> for Quest {
    type Error = QuestValidationError;

    fn try_from(doc: QuestDocument) -> Result<Self, Self::Error> {
        let draft = QuestDraft {
            id: QuestId::new(doc.id)?,
            title: QuestTitle::new(doc.title)?,
            description: doc.description,
            subject: Subject::new(doc.subject)?,
            topic: doc.topic,
            effort_type: EffortType::from_str(&doc.effort_type)?,
            studied_minutes: StudiedMinutes::new(i64::from(doc.studied_minutes))?,
            suggested_minutes: SuggestedMinutes::new(i64::from(doc.suggested_minutes))?,
            deadline: CalendarDate::parse(&doc.deadline, "deadline")?,
            visibility: Visibility::from_str(&doc.visibility)?,
            status: QuestStatus::from_str(&doc.status)?,
            created_at: CalendarDate::parse(&doc.created_at, "created_at")?,
        };
        let quest = Quest::new(draft);
        Ok(match doc.object_id {
            Some(oid) => quest.with_storage_id(oid.to_hex()),
            None => quest,
        })
    }
}

/// Stored user, minus the password hash which is never read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct UserDocument {
    #[serde(rename = "_id")]
    pub(crate) object_id: ObjectId,
    pub(crate) email: String,
    pub(crate) name: String,
    pub(crate) role: String,
    pub(crate) created_at: String,
}

/// Failure converting a stored user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum UserDocumentError {
    #[error(transparent)]
    User(#[from] UserValidationError),
    #[error(transparent)]
    Date(#[from] QuestValidationError),
}

impl TryFrom<UserDocument> for User {
    type Error = UserDocumentError;

    fn try_from(doc: UserDocument) -> Result<Self, Self::Error> {
        Ok(User::new(
            UserId::new(doc.object_id.to_hex())?,
            Email::new(doc.email)?,
            UserName::new(doc.name)?,
            UserRole::from_str(&doc.role)?,
            CalendarDate::parse(&doc.created_at, "created_at")?,
        ))
    }
}
