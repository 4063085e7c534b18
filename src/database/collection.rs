use super::store::DocumentStore;
use crate::models::{Model, ModelRegistry, ModelType};
use crate::utils::error::AppError;
use mongodb::bson::{doc, Bson, Document};
use std::sync::Arc;

/// A single collection plus the registry used to materialize its documents.
#[derive(Clone)]
pub struct MongoCollection {
    database_name: String,
    collection_name: String,
    collection: Arc<dyn DocumentStore>,
    registry: Arc<ModelRegistry>,
}

impl MongoCollection {
    pub fn new(
        database_name: impl Into<String>,
        collection_name: impl Into<String>,
        collection: Arc<dyn DocumentStore>,
        registry: Arc<ModelRegistry>,
    ) -> Self {
        Self {
            database_name: database_name.into(),
            collection_name: collection_name.into(),
            collection,
            registry,
        }
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// Raw `find_one` against the underlying collection.
    pub async fn find_one_raw(&self, filter: Document) -> Result<Option<Document>, AppError> {
        self.collection.find_one(filter).await
    }

    /// Inserts `model` and returns the stored document as the same concrete type.
    pub async fn insert_document(&self, model: &dyn Model) -> Result<Box<dyn Model>, AppError> {
        let inserted_id = self.insert_fields(model).await?;

        let mut result = model.empty();
        result
            .get_mongo_document(self, doc! { "_id": inserted_id })
            .await?;

        Ok(result)
    }

    /// Applies `update` to the first document matching `filter` and returns
    /// that same document, re-read by its `_id`, as `model_type`.
    ///
    /// The type tag is resolved before anything is written.
    pub async fn update_document(
        &self,
        filter: Document,
        update: Document,
        model_type: &str,
    ) -> Result<Box<dyn Model>, AppError> {
        let mut result = self.registry.create(model_type)?;

        log::debug!(
            "✏️  find_one_and_update on {}.{}: {}",
            self.database_name,
            self.collection_name,
            filter
        );
        let updated = self
            .collection
            .find_one_and_update(filter.clone(), update)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "no document in {}.{} matches {}",
                    self.database_name, self.collection_name, filter
                ))
            })?;

        let id = updated.get("_id").cloned().ok_or_else(|| {
            AppError::DatabaseError(format!(
                "updated document in {}.{} has no _id",
                self.database_name, self.collection_name
            ))
        })?;

        result.get_mongo_document(self, doc! { "_id": id }).await?;
        Ok(result)
    }

    /// First document matching `filter`, built as `model_type`.
    pub async fn find_document(
        &self,
        filter: Document,
        model_type: &str,
    ) -> Result<Box<dyn Model>, AppError> {
        let mut result = self.registry.create(model_type)?;
        result.get_mongo_document(self, filter).await?;
        Ok(result)
    }

    /// Deletes at most one document. Matching nothing is not an error.
    pub async fn delete_document(&self, filter: Document, model_type: &str) -> Result<(), AppError> {
        if !self.registry.contains(model_type) {
            return Err(AppError::InvalidModelType(model_type.to_string()));
        }

        let deleted = self.collection.delete_one(filter).await?;
        log::debug!(
            "🗑️  delete_one on {}.{} removed {} document(s)",
            self.database_name,
            self.collection_name,
            deleted
        );

        Ok(())
    }

    /// Typed variant of [`insert_document`](Self::insert_document).
    pub async fn insert_as<M: ModelType>(&self, model: &M) -> Result<M, AppError> {
        let inserted_id = self.insert_fields(model).await?;

        let mut result = M::default();
        result
            .get_mongo_document(self, doc! { "_id": inserted_id })
            .await?;

        Ok(result)
    }

    /// Typed variant of [`find_document`](Self::find_document).
    pub async fn find_as<M: ModelType>(&self, filter: Document) -> Result<M, AppError> {
        let mut result = M::default();
        result.get_mongo_document(self, filter).await?;
        Ok(result)
    }

    /// One round trip to the backing collection.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.collection.ping().await
    }

    async fn insert_fields(&self, model: &dyn Model) -> Result<Bson, AppError> {
        let mut content = Document::new();
        for key in model.keys() {
            content.insert(*key, model.value(key)?);
        }

        log::debug!(
            "➕ insert_one on {}.{} ({} fields)",
            self.database_name,
            self.collection_name,
            content.len()
        );
        self.collection.insert_one(content).await
    }
}
