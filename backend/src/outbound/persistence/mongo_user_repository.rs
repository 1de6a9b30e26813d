//! MongoDB-backed [`UserRepository`] adapter.
//!
//! Reads project the `password` field away so hashes never leave the store.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Document, doc};
use tracing::error;

use super::connection::MongoStore;
use super::documents::UserDocument;
use super::error_mapping::user_error;
use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserId};

/// User repository over a shared [`MongoStore`].
#[derive(Clone, Debug)]
pub struct MongoUserRepository {
    store: MongoStore,
}

impl MongoUserRepository {
    pub fn new(store: MongoStore) -> Self {
        Self { store }
    }
}

fn without_password() -> Document {
    doc! { "password": 0 }
}

fn to_domain(doc: UserDocument) -> Result<User, UserPersistenceError> {
    let id = doc.object_id.to_hex();
    User::try_from(doc).map_err(|err| {
        error!(user_id = %id, error = %err, "stored user failed validation");
        UserPersistenceError::query(format!("stored user {id} is invalid: {err}"))
    })
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let docs: Vec<UserDocument> = self
            .store
            .users()
            .find(doc! {})
            .projection(without_password())
            .await
            .map_err(user_error)?
            .try_collect()
            .await
            .map_err(user_error)?;
        docs.into_iter().map(to_domain).collect()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        // UserId guarantees 24 hex characters, which always parse.
        let oid = ObjectId::parse_str(id.as_ref())
            .map_err(|err| UserPersistenceError::query(err.to_string()))?;
        self.store
            .users()
            .find_one(doc! { "_id": oid })
            .projection(without_password())
            .await
            .map_err(user_error)?
            .map(to_domain)
            .transpose()
    }
}
