//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed quest and user entities plus the services
//! implementing the driving ports. Nothing here knows about HTTP or MongoDB.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Quest and its value types, QuestPatch, QuestFilter, QuestStats.
//! - User and its value types.
//! - QuestService / UserService: driving-port implementations.

pub mod error;
pub mod ports;
pub mod quest;
pub mod quest_fields;
pub mod quest_filter;
pub mod quest_id;
pub mod quest_patch;
pub mod quest_service;
pub mod quest_stats;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::quest::{
    CalendarDate, EffortType, Quest, QuestDraft, QuestId, QuestStatus, QuestTitle,
    QuestValidationError, StudiedMinutes, Subject, SuggestedMinutes, Visibility,
};
pub use self::quest_fields::NewQuest;
pub use self::quest_filter::{QuestFilter, RawQuestFilter};
pub use self::quest_id::{QuestIdGenerator, TimeRandomQuestIdGenerator};
pub use self::quest_patch::{QuestPatch, UPDATABLE_FIELDS};
pub use self::quest_service::QuestService;
pub use self::quest_stats::{QuestStats, QuestTotals};
pub use self::trace_id::TraceId;
pub use self::user::{Email, User, UserId, UserName, UserRole, UserValidationError};
pub use self::user_service::UserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use effortee::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<()> {
///     Err(Error::not_found("Quest not found"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
