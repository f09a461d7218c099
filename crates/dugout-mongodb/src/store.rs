//! CRUD operations over one collection
//!
//! Every call runs under the store's operations budget, so a slow server
//! eventually fails the whole sequence with `Timeout` instead of hanging.

use crate::budget::Budget;
use crate::cursor::RecordCursor;
use crate::query::FindQuery;
use crate::record::{Record, RecordDocument};
use bson::{Bson, Document as BsonDocument};
use dugout_common::{DugoutError, Result};
use mongodb::Collection;
use std::marker::PhantomData;
use tracing::debug;

/// Result of an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// Typed view over a collection of `T` records
pub struct RecordStore<T: Record> {
    collection: Collection<BsonDocument>,
    budget: Budget,
    _record: PhantomData<T>,
}

impl<T: Record> RecordStore<T> {
    pub fn new(collection: Collection<BsonDocument>, budget: Budget) -> Self {
        Self {
            collection,
            budget,
            _record: PhantomData,
        }
    }

    pub fn collection_name(&self) -> &str {
        self.collection.name()
    }

    pub fn budget(&self) -> &Budget {
        &self.budget
    }

    /// Insert a single typed or generic document, returning its assigned id
    pub async fn insert_one(&self, document: impl Into<RecordDocument<T>>) -> Result<Bson> {
        let document = document.into();
        let kind = document.kind();
        let bson_doc = document.to_bson()?;

        let result = self
            .budget
            .run("insert_one", async {
                self.collection.insert_one(bson_doc).await.map_err(DugoutError::from)
            })
            .await?;

        debug!(collection = %self.collection_name(), kind, id = %result.inserted_id, "Inserted document");
        Ok(result.inserted_id)
    }

    /// Insert a typed record and store the assigned ObjectId back on it
    pub async fn insert_record(&self, record: &mut T) -> Result<Bson> {
        let bson_doc = record.to_bson()?;
        let result = self
            .budget
            .run("insert_one", async {
                self.collection.insert_one(bson_doc).await.map_err(DugoutError::from)
            })
            .await?;

        if let Some(id) = result.inserted_id.as_object_id() {
            record.set_id(id);
        }
        Ok(result.inserted_id)
    }

    /// Insert a batch, returning the assigned ids in submission order
    pub async fn insert_many(&self, documents: Vec<RecordDocument<T>>) -> Result<Vec<Bson>> {
        let bson_docs = documents
            .iter()
            .map(RecordDocument::to_bson)
            .collect::<Result<Vec<_>>>()?;
        let submitted = bson_docs.len();

        let result = self
            .budget
            .run("insert_many", async {
                self.collection.insert_many(bson_docs).await.map_err(DugoutError::from)
            })
            .await?;

        let mut indexed: Vec<(usize, Bson)> = result.inserted_ids.into_iter().collect();
        indexed.sort_by_key(|(index, _)| *index);
        let ids: Vec<Bson> = indexed.into_iter().map(|(_, id)| id).collect();

        if ids.len() != submitted {
            return Err(DugoutError::Write(format!(
                "Submitted {} documents but {} were acknowledged",
                submitted,
                ids.len()
            )));
        }

        debug!(collection = %self.collection_name(), count = ids.len(), "Inserted documents");
        Ok(ids)
    }

    /// First record matching `filter`, if any
    pub async fn find_one(&self, filter: BsonDocument) -> Result<Option<T>> {
        let found = self
            .budget
            .run("find_one", async {
                self.collection.find_one(filter).await.map_err(DugoutError::from)
            })
            .await?;

        found.map(T::from_bson).transpose()
    }

    /// First record matching `filter`; absence is `NotFound`
    pub async fn get_one(&self, filter: BsonDocument) -> Result<T> {
        let description = filter.to_string();
        self.find_one(filter).await?.ok_or_else(|| {
            DugoutError::NotFound(format!(
                "no document in '{}' matches {}",
                self.collection_name(),
                description
            ))
        })
    }

    /// Open a forward-only cursor over the records matching `query`
    pub async fn find(&self, query: FindQuery) -> Result<RecordCursor<T>> {
        let (filter, options) = query.into_parts();
        debug!(collection = %self.collection_name(), %filter, limit = ?options.limit, "Opening cursor");

        let cursor = self
            .budget
            .run("find", async {
                self.collection.find(filter).with_options(options).await.map_err(DugoutError::from)
            })
            .await?;

        Ok(RecordCursor::new(cursor, self.budget.clone()))
    }

    /// Apply `update` to the first document matching `filter`
    pub async fn update_one(&self, filter: BsonDocument, update: BsonDocument) -> Result<UpdateOutcome> {
        let result = self
            .budget
            .run("update_one", async {
                self.collection.update_one(filter, update).await.map_err(DugoutError::from)
            })
            .await?;

        let outcome = UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        };
        debug!(collection = %self.collection_name(), ?outcome, "Updated document");
        Ok(outcome)
    }

    /// Delete the first document matching `filter`, returning the deleted count (0 or 1)
    pub async fn delete_one(&self, filter: BsonDocument) -> Result<u64> {
        let result = self
            .budget
            .run("delete_one", async {
                self.collection.delete_one(filter).await.map_err(DugoutError::from)
            })
            .await?;

        Ok(result.deleted_count)
    }

    /// Delete every document matching `filter`, returning the deleted count
    pub async fn delete_many(&self, filter: BsonDocument) -> Result<u64> {
        let result = self
            .budget
            .run("delete_many", async {
                self.collection.delete_many(filter).await.map_err(DugoutError::from)
            })
            .await?;

        debug!(collection = %self.collection_name(), deleted = result.deleted_count, "Deleted documents");
        Ok(result.deleted_count)
    }

    /// Count documents matching `filter`
    pub async fn count(&self, filter: BsonDocument) -> Result<u64> {
        self.budget
            .run("count_documents", async {
                self.collection.count_documents(filter).await.map_err(DugoutError::from)
            })
            .await
    }

    /// Drop the whole collection
    pub async fn drop_collection(&self) -> Result<()> {
        self.budget
            .run("drop", async { self.collection.drop().await.map_err(DugoutError::from) })
            .await
    }
}
