//! Read-only user service implementing [`UsersQuery`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use crate::domain::ports::{UserPersistenceError, UserRepository, UsersQuery};
use crate::domain::{Error, User, UserId};

/// User service backed by a [`UserRepository`].
#[derive(Clone)]
pub struct UserService<R> {
    repo: Arc<R>,
}

impl<R> UserService<R> {
    /// Create a service over `repo`.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

fn map_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            error!(%message, "user repository unavailable");
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            error!(%message, "user repository failure");
            Error::persistence(message)
        }
    }
}

#[async_trait]
impl<R> UsersQuery for UserService<R>
where
    R: UserRepository,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.repo.list().await.map_err(map_repository_error)
    }

    async fn get_user(&self, user_id: &str) -> Result<User, Error> {
        let id = UserId::new(user_id)?;
        self.repo
            .find_by_id(&id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::{CalendarDate, Email, ErrorCode, UserName, UserRole};
    use rstest::{fixture, rstest};

    const ALICE: &str = "65b2f0c1a4e5d6f7a8b9c0d1";

    #[fixture]
    fn alice() -> User {
        User::new(
            UserId::new(ALICE).expect("valid id"),
            Email::new("student1@effortee.com").expect("valid email"),
            UserName::new("Alice Student").expect("valid name"),
            UserRole::Student,
            CalendarDate::parse("2025-01-15", "created_at").expect("valid date"),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn list_returns_repository_users(alice: User) {
        let mut repo = MockUserRepository::new();
        repo.expect_list()
            .times(1)
            .return_once(move || Ok(vec![alice]));
        let users = UserService::new(Arc::new(repo))
            .list_users()
            .await
            .expect("users");
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email().as_ref(), "student1@effortee.com");
    }

    #[rstest]
    #[tokio::test]
    async fn get_finds_user(alice: User) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .withf(|id| id.as_ref() == ALICE)
            .times(1)
            .return_once(move |_| Ok(Some(alice)));
        let user = UserService::new(Arc::new(repo))
            .get_user(ALICE)
            .await
            .expect("user");
        assert_eq!(user.name().as_ref(), "Alice Student");
    }

    #[rstest]
    #[tokio::test]
    async fn get_reports_missing_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().times(1).return_once(|_| Ok(None));
        let err = UserService::new(Arc::new(repo))
            .get_user(ALICE)
            .await
            .expect_err("not found");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "User not found");
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_id_never_reaches_repository() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().never();
        let err = UserService::new(Arc::new(repo))
            .get_user("12345")
            .await
            .expect_err("validation");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case(UserPersistenceError::connection("timeout"), ErrorCode::ServiceUnavailable)]
    #[case(UserPersistenceError::query("cursor killed"), ErrorCode::PersistenceError)]
    #[tokio::test]
    async fn repository_errors_are_mapped(
        #[case] failure: UserPersistenceError,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockUserRepository::new();
        repo.expect_list().times(1).return_once(move || Err(failure));
        let err = UserService::new(Arc::new(repo))
            .list_users()
            .await
            .expect_err("failure");
        assert_eq!(err.code(), expected);
    }
}
