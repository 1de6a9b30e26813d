//! Database preparation: collection validators, indexes, an optional admin
//! account and sample data.
//!
//! Every step is idempotent. Collections are only created when absent,
//! index creation is a no-op for existing identical indexes, an existing
//! admin account is left alone, and sample data is only inserted into empty
//! collections.

use std::fmt;

use mongodb::bson::{Document, doc};
use mongodb::options::IndexOptions;
use mongodb::{Collection, IndexModel};
use thiserror::Error;
use tracing::info;
use zeroize::Zeroizing;

use super::connection::{MongoStore, QUESTS_COLLECTION, USERS_COLLECTION};
use super::error_mapping::server_code;

/// Server error code returned by `createUser` for an existing account.
const USER_EXISTS_CODE: i32 = 51003;

/// Errors raised while preparing the database.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Listing or creating a collection failed.
    #[error("failed to create collection `{collection}`: {source}")]
    Collection {
        collection: &'static str,
        #[source]
        source: mongodb::error::Error,
    },
    /// Index creation failed.
    #[error("failed to create indexes on `{collection}`: {source}")]
    Index {
        collection: &'static str,
        #[source]
        source: mongodb::error::Error,
    },
    /// Counting or inserting sample documents failed.
    #[error("failed to seed `{collection}`: {source}")]
    Seed {
        collection: &'static str,
        #[source]
        source: mongodb::error::Error,
    },
    /// `createUser` failed for a reason other than the account existing.
    #[error("failed to create database user `{user}`: {source}")]
    Admin {
        user: String,
        #[source]
        source: mongodb::error::Error,
    },
}

/// Database account granted `readWrite` and `dbAdmin` on the Effortee
/// database.
pub struct AdminAccount {
    user: String,
    password: Zeroizing<String>,
}

impl AdminAccount {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

impl fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminAccount")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// What [`prepare_database`] should do beyond collections and indexes.
#[derive(Debug, Default)]
pub struct SetupOptions {
    /// Insert sample users and quests into empty collections.
    pub seed: bool,
    /// Create this database account unless it already exists.
    pub admin: Option<AdminAccount>,
}

/// Result of the admin account step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdminOutcome {
    #[default]
    NotRequested,
    Created,
    AlreadyExists,
}

impl fmt::Display for AdminOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotRequested => "not requested",
            Self::Created => "created",
            Self::AlreadyExists => "already exists",
        })
    }
}

/// Outcome of [`prepare_database`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupSummary {
    /// Collections created by this run.
    pub created_collections: Vec<&'static str>,
    /// Admin account step.
    pub admin: AdminOutcome,
    /// Index names reported by the server.
    pub indexes: Vec<String>,
    /// Users inserted by this run.
    pub seeded_users: usize,
    /// Quests inserted by this run.
    pub seeded_quests: usize,
    /// Users stored after the run.
    pub user_count: u64,
    /// Quests stored after the run.
    pub quest_count: u64,
}

const DATE_PATTERN: &str = "^[0-9]{4}-[0-9]{2}-[0-9]{2}$";
const EMAIL_PATTERN: &str = "^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\\.[a-zA-Z]{2,}$";

/// `$jsonSchema` validator for `users`.
pub fn users_validator() -> Document {
    doc! {
        "$jsonSchema": {
            "bsonType": "object",
            "required": ["email", "name", "role", "created_at"],
            "properties": {
                "email": { "bsonType": "string", "pattern": EMAIL_PATTERN },
                "name": { "bsonType": "string", "minLength": 1 },
                "role": { "enum": ["student", "parent", "admin"] },
                "password": { "bsonType": "string" },
                "created_at": { "bsonType": "string", "pattern": DATE_PATTERN },
            }
        }
    }
}

/// `$jsonSchema` validator for `quests`.
pub fn quests_validator() -> Document {
    doc! {
        "$jsonSchema": {
            "bsonType": "object",
            "required": [
                "id", "title", "subject", "suggested_minutes", "deadline", "status", "created_at"
            ],
            "properties": {
                "id": { "bsonType": "string", "pattern": "^quest_" },
                "title": { "bsonType": "string", "minLength": 1, "maxLength": 200 },
                "description": { "bsonType": "string" },
                "subject": { "bsonType": "string" },
                "topic": { "bsonType": "string" },
                "effort_type": { "bsonType": "string" },
                "studied_minutes": { "bsonType": "int", "minimum": 0 },
                "suggested_minutes": { "bsonType": "int", "minimum": 1 },
                "deadline": { "bsonType": "string", "pattern": DATE_PATTERN },
                "visibility": { "enum": ["private", "shared"] },
                "status": { "enum": ["prepare", "active", "done"] },
                "created_at": { "bsonType": "string", "pattern": DATE_PATTERN },
            }
        }
    }
}

fn index(keys: Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn unique_index(keys: Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

/// Indexes on `users`.
pub fn user_indexes() -> Vec<IndexModel> {
    vec![unique_index(doc! { "email": 1 }), index(doc! { "role": 1 })]
}

/// Indexes on `quests`.
pub fn quest_indexes() -> Vec<IndexModel> {
    vec![
        unique_index(doc! { "id": 1 }),
        index(doc! { "status": 1 }),
        index(doc! { "subject": 1 }),
        index(doc! { "deadline": 1 }),
        index(doc! { "created_at": -1 }),
        index(doc! { "status": 1, "deadline": 1 }),
    ]
}

/// Sample users. Passwords are placeholders; nothing reads them.
pub fn sample_users() -> Vec<Document> {
    vec![
        doc! {
            "email": "student1@effortee.com",
            "name": "Alice Student",
            "role": "student",
            "password": "hashed_password_here",
            "created_at": "2025-01-15",
        },
        doc! {
            "email": "parent1@effortee.com",
            "name": "Bob Parent",
            "role": "parent",
            "password": "hashed_password_here",
            "created_at": "2025-01-15",
        },
    ]
}

/// Sample quests covering every status but `done`, both visibilities and a
/// free-form effort type.
pub fn sample_quests() -> Vec<Document> {
    vec![
        doc! {
            "id": "quest_001",
            "title": "Just get started",
            "description": "Spend a short focused time. It doesn't have to be perfect.",
            "subject": "Math",
            "topic": "Algebra basics",
            "effort_type": "focus_time",
            "studied_minutes": 10,
            "suggested_minutes": 20,
            "deadline": "2025-02-20",
            "visibility": "shared",
            "status": "active",
            "created_at": "2025-02-18",
        },
        doc! {
            "id": "quest_002",
            "title": "Complete Chapter 3",
            "description": "Read and take notes on Chapter 3",
            "subject": "Science",
            "topic": "Biology - Cell Structure",
            "effort_type": "reading",
            "studied_minutes": 0,
            "suggested_minutes": 45,
            "deadline": "2025-02-25",
            "visibility": "shared",
            "status": "prepare",
            "created_at": "2025-02-18",
        },
        doc! {
            "id": "quest_003",
            "title": "Practice Problems",
            "description": "Complete 20 practice problems from workbook",
            "subject": "Math",
            "topic": "Quadratic Equations",
            "effort_type": "practice",
            "studied_minutes": 30,
            "suggested_minutes": 60,
            "deadline": "2025-02-22",
            "visibility": "private",
            "status": "active",
            "created_at": "2025-02-17",
        },
    ]
}

/// `createUser` command for `account` scoped to `database`.
pub fn create_user_command(database: &str, account: &AdminAccount) -> Document {
    doc! {
        "createUser": account.user(),
        "pwd": account.password.as_str(),
        "roles": [
            { "role": "readWrite", "db": database },
            { "role": "dbAdmin", "db": database },
        ],
    }
}

async fn ensure_admin(
    store: &MongoStore,
    account: &AdminAccount,
) -> Result<AdminOutcome, SetupError> {
    let database = store.database();
    match database
        .run_command(create_user_command(database.name(), account))
        .await
    {
        Ok(_) => {
            info!(user = account.user(), "database user created");
            Ok(AdminOutcome::Created)
        }
        Err(err) if server_code(err.kind.as_ref()) == Some(USER_EXISTS_CODE) => {
            info!(user = account.user(), "database user already exists");
            Ok(AdminOutcome::AlreadyExists)
        }
        Err(source) => Err(SetupError::Admin {
            user: account.user().to_owned(),
            source,
        }),
    }
}

async fn ensure_collection(
    store: &MongoStore,
    existing: &[String],
    name: &'static str,
    validator: Document,
) -> Result<bool, SetupError> {
    if existing.iter().any(|collection| collection == name) {
        info!(collection = name, "collection already exists");
        return Ok(false);
    }
    store
        .database()
        .create_collection(name)
        .validator(validator)
        .await
        .map_err(|source| SetupError::Collection {
            collection: name,
            source,
        })?;
    info!(collection = name, "collection created");
    Ok(true)
}

async fn ensure_indexes(
    collection: &Collection<Document>,
    name: &'static str,
    models: Vec<IndexModel>,
) -> Result<Vec<String>, SetupError> {
    let result = collection
        .create_indexes(models)
        .await
        .map_err(|source| SetupError::Index {
            collection: name,
            source,
        })?;
    info!(collection = name, count = result.index_names.len(), "indexes ensured");
    Ok(result.index_names)
}

async fn count(collection: &Collection<Document>, name: &'static str) -> Result<u64, SetupError> {
    collection
        .count_documents(doc! {})
        .await
        .map_err(|source| SetupError::Seed {
            collection: name,
            source,
        })
}

async fn seed_if_empty(
    collection: &Collection<Document>,
    name: &'static str,
    documents: Vec<Document>,
) -> Result<usize, SetupError> {
    if count(collection, name).await? > 0 {
        info!(collection = name, "collection not empty; seeding skipped");
        return Ok(0);
    }
    let result = collection
        .insert_many(documents)
        .await
        .map_err(|source| SetupError::Seed {
            collection: name,
            source,
        })?;
    let inserted = result.inserted_ids.len();
    info!(collection = name, inserted, "sample data inserted");
    Ok(inserted)
}

/// Create collections and indexes, then optionally create the admin account
/// and insert sample data.
///
/// # Errors
///
/// Returns [`SetupError`] naming the collection or account whose step failed.
pub async fn prepare_database(
    store: &MongoStore,
    options: &SetupOptions,
) -> Result<SetupSummary, SetupError> {
    let existing = store
        .database()
        .list_collection_names()
        .await
        .map_err(|source| SetupError::Collection {
            collection: USERS_COLLECTION,
            source,
        })?;

    let mut summary = SetupSummary::default();
    for (name, validator) in [
        (USERS_COLLECTION, users_validator()),
        (QUESTS_COLLECTION, quests_validator()),
    ] {
        if ensure_collection(store, &existing, name, validator).await? {
            summary.created_collections.push(name);
        }
    }

    let users = store.database().collection::<Document>(USERS_COLLECTION);
    let quests = store.database().collection::<Document>(QUESTS_COLLECTION);
    summary
        .indexes
        .extend(ensure_indexes(&users, USERS_COLLECTION, user_indexes()).await?);
    summary
        .indexes
        .extend(ensure_indexes(&quests, QUESTS_COLLECTION, quest_indexes()).await?);

    if let Some(account) = &options.admin {
        summary.admin = ensure_admin(store, account).await?;
    }

    if options.seed {
        summary.seeded_users = seed_if_empty(&users, USERS_COLLECTION, sample_users()).await?;
        summary.seeded_quests = seed_if_empty(&quests, QUESTS_COLLECTION, sample_quests()).await?;
    }

    summary.user_count = count(&users, USERS_COLLECTION).await?;
    summary.quest_count = count(&quests, QUESTS_COLLECTION).await?;
    Ok(summary)
}
