//! User data model.
//!
//! Users are created by the seeding path of the setup tool and are read-only
//! through the service. The stored password hash never enters the domain.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::json;

use super::quest::CalendarDate;
use crate::domain::Error;

/// Validation errors returned by the user value types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    InvalidEmail,
    EmptyName,
    InvalidRole(String),
}

impl UserValidationError {
    fn field(&self) -> &'static str {
        match self {
            Self::EmptyId | Self::InvalidId => "id",
            Self::InvalidEmail => "email",
            Self::EmptyName => "name",
            Self::InvalidRole(_) => "role",
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::EmptyId | Self::EmptyName => "empty_value",
            Self::InvalidId => "invalid_id",
            Self::InvalidEmail => "invalid_format",
            Self::InvalidRole(_) => "invalid_enum_value",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "Invalid user ID format"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::InvalidRole(role) => {
                write!(f, "role must be student, parent, or admin (got {role})")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

impl From<UserValidationError> for Error {
    fn from(value: UserValidationError) -> Self {
        let details = json!({ "field": value.field(), "code": value.code() });
        Error::invalid_request(value.to_string()).with_details(details)
    }
}

/// Length of a storage identity in hexadecimal characters.
pub const USER_ID_LEN: usize = 24;

/// Storage identity of a user: 24 hexadecimal characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.len() != USER_ID_LEN || !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(id.to_ascii_lowercase()))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address in the format the `users` collection validator accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// Validate an address.
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        if !email_regex().is_match(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Display name; never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    /// Validate a name.
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserRole {
    Student,
    Parent,
    Admin,
}

impl UserRole {
    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Parent => "parent",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for UserRole {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "parent" => Ok(Self::Parent),
            "admin" => Ok(Self::Admin),
            other => Err(UserValidationError::InvalidRole(other.to_owned())),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application user as exposed to clients.
///
/// ## Invariants
/// - `id` is a 24-character hexadecimal storage identity.
/// - There is no password field; hashes stay in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    name: UserName,
    role: UserRole,
    created_at: CalendarDate,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub fn new(
        id: UserId,
        email: Email,
        name: UserName,
        role: UserRole,
        created_at: CalendarDate,
    ) -> Self {
        Self {
            id,
            email,
            name,
            role,
            created_at,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn created_at(&self) -> CalendarDate {
        self.created_at
    }
}
