//! Shared MongoDB error mapping for the quest and user repositories.

use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use tracing::debug;

use crate::domain::ports::{QuestRepositoryError, UserPersistenceError};

/// Server error code for a unique index violation.
pub(crate) const DUPLICATE_KEY_CODE: i32 = 11000;

/// Coarse failure class shared by every repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailureClass {
    Connection,
    Duplicate,
    Query,
}

/// Numeric server error code carried by write and command failures.
pub(crate) fn server_code(kind: &ErrorKind) -> Option<i32> {
    match kind {
        ErrorKind::Write(WriteFailure::WriteError(write)) => Some(write.code),
        ErrorKind::Command(command) => Some(command.code),
        _ => None,
    }
}

/// Classify a driver error.
pub(crate) fn classify(error: &MongoError) -> FailureClass {
    let kind = error.kind.as_ref();
    if server_code(kind) == Some(DUPLICATE_KEY_CODE) {
        return FailureClass::Duplicate;
    }
    match kind {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::DnsResolve { .. } => FailureClass::Connection,
        _ => FailureClass::Query,
    }
}

/// Map a driver error into [`QuestRepositoryError`].
pub(crate) fn quest_error(error: MongoError) -> QuestRepositoryError {
    let class = classify(&error);
    debug!(?class, %error, "quest collection operation failed");
    let message = error.to_string();
    match class {
        FailureClass::Connection => QuestRepositoryError::connection(message),
        FailureClass::Duplicate => QuestRepositoryError::duplicate(message),
        FailureClass::Query => QuestRepositoryError::query(message),
    }
}

/// Map a driver error into [`UserPersistenceError`]. Users are never
/// written through the API, so duplicates count as query failures.
pub(crate) fn user_error(error: MongoError) -> UserPersistenceError {
    let class = classify(&error);
    debug!(?class, %error, "users collection operation failed");
    let message = error.to_string();
    match class {
        FailureClass::Connection => UserPersistenceError::connection(message),
        FailureClass::Duplicate | FailureClass::Query => UserPersistenceError::query(message),
    }
}
