//! Driving port for user-facing queries.
//!
//! Inbound adapters (HTTP handlers) use this port to fetch user profiles
//! without importing outbound persistence concerns. Profiles never carry
//! password hashes.

use async_trait::async_trait;

use crate::domain::{CalendarDate, Email, Error, User, UserId, UserName, UserRole};

/// Domain use-case port for reading users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Every user profile.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// One profile by storage identity. Malformed identifiers are a
    /// validation error.
    async fn get_user(&self, user_id: &str) -> Result<User, Error>;
}

/// Users query serving the seeded sample student.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUsersQuery;

const FIXTURE_ID: &str = "65b2f0c1a4e5d6f7a8b9c0d1";

fn fixture_user() -> Result<User, Error> {
    // These values are compile-time constants; surface invalid data as an
    // internal error so automated checks catch accidental regressions.
    let invalid = |err: crate::domain::UserValidationError| {
        Error::internal(format!("invalid fixture user: {err}"))
    };
    let created_at = CalendarDate::parse("2025-01-15", "created_at")
        .map_err(|err| Error::internal(format!("invalid fixture date: {err}")))?;
    Ok(User::new(
        UserId::new(FIXTURE_ID).map_err(invalid)?,
        Email::new("student1@effortee.com").map_err(invalid)?,
        UserName::new("Alice Student").map_err(invalid)?,
        UserRole::Student,
        created_at,
    ))
}

#[async_trait]
impl UsersQuery for FixtureUsersQuery {
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        Ok(vec![fixture_user()?])
    }

    async fn get_user(&self, user_id: &str) -> Result<User, Error> {
        let id = UserId::new(user_id)?;
        let user = fixture_user()?;
        if user.id() == &id {
            Ok(user)
        } else {
            Err(Error::not_found("User not found"))
        }
    }
}
