//! MongoDB-backed [`QuestRepository`] adapter.
//!
//! Each method issues exactly one driver call against the `quests`
//! collection. Documents are converted through [`QuestDocument`] so that the
//! domain never sees BSON.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::ReturnDocument;
use tracing::{debug, error};

use super::connection::MongoStore;
use super::documents::QuestDocument;
use super::error_mapping::quest_error;
use super::queries::{
    by_quest_id, filter_document, newest_first, set_document, totals_from_group, totals_pipeline,
};
use crate::domain::ports::{QuestRepository, QuestRepositoryError};
use crate::domain::{Quest, QuestFilter, QuestId, QuestPatch, QuestTotals};

/// Quest repository over a shared [`MongoStore`].
#[derive(Clone, Debug)]
pub struct MongoQuestRepository {
    store: MongoStore,
}

impl MongoQuestRepository {
    pub fn new(store: MongoStore) -> Self {
        Self { store }
    }
}

fn to_domain(doc: QuestDocument) -> Result<Quest, QuestRepositoryError> {
    let id = doc.id.clone();
    Quest::try_from(doc).map_err(|err| {
        error!(quest_id = %id, error = %err, "stored quest failed validation");
        QuestRepositoryError::query(format!("stored quest {id} is invalid: {err}"))
    })
}

#[async_trait]
impl QuestRepository for MongoQuestRepository {
    async fn insert(&self, quest: &Quest) -> Result<Quest, QuestRepositoryError> {
        let doc = QuestDocument::from(quest);
        let result = self
            .store
            .quests()
            .insert_one(&doc)
            .await
            .map_err(quest_error)?;
        let stored = match result.inserted_id {
            Bson::ObjectId(oid) => quest.clone().with_storage_id(oid.to_hex()),
            other => {
                debug!(inserted_id = %other, "store assigned a non-ObjectId identity");
                quest.clone().with_storage_id(other.to_string())
            }
        };
        Ok(stored)
    }

    async fn list(&self, filter: &QuestFilter) -> Result<Vec<Quest>, QuestRepositoryError> {
        let docs: Vec<QuestDocument> = self
            .store
            .quests()
            .find(filter_document(filter))
            .sort(newest_first())
            .await
            .map_err(quest_error)?
            .try_collect()
            .await
            .map_err(quest_error)?;
        docs.into_iter().map(to_domain).collect()
    }

    async fn find_by_id(&self, id: &QuestId) -> Result<Option<Quest>, QuestRepositoryError> {
        self.store
            .quests()
            .find_one(by_quest_id(id))
            .await
            .map_err(quest_error)?
            .map(to_domain)
            .transpose()
    }

    async fn update(
        &self,
        id: &QuestId,
        patch: &QuestPatch,
    ) -> Result<Option<Quest>, QuestRepositoryError> {
        self.store
            .quests()
            .find_one_and_update(by_quest_id(id), doc! { "$set": set_document(patch) })
            .return_document(ReturnDocument::After)
            .await
            .map_err(quest_error)?
            .map(to_domain)
            .transpose()
    }

    async fn delete(&self, id: &QuestId) -> Result<bool, QuestRepositoryError> {
        let result = self
            .store
            .quests()
            .delete_one(by_quest_id(id))
            .await
            .map_err(quest_error)?;
        Ok(result.deleted_count > 0)
    }

    async fn totals(&self) -> Result<QuestTotals, QuestRepositoryError> {
        let groups: Vec<Document> = self
            .store
            .quests()
            .aggregate(totals_pipeline())
            .await
            .map_err(quest_error)?
            .try_collect()
            .await
            .map_err(quest_error)?;
        totals_from_group(groups.first())
            .map_err(|err| QuestRepositoryError::query(err.to_string()))
    }
}
