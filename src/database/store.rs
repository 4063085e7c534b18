use crate::utils::error::AppError;
use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use mongodb::options::ReturnDocument;
use mongodb::Collection;

/// Single-document primitives the collection wrapper needs from the driver.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts `document` and returns the `_id` it was stored under.
    async fn insert_one(&self, document: Document) -> Result<Bson, AppError>;

    /// Applies `update` to the first document matching `filter` and returns
    /// that document as it is after the update, or `None` if nothing matched.
    async fn find_one_and_update(
        &self,
        filter: Document,
        update: Document,
    ) -> Result<Option<Document>, AppError>;

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, AppError>;

    /// Returns how many documents were removed (0 or 1).
    async fn delete_one(&self, filter: Document) -> Result<u64, AppError>;

    /// One round trip to the server.
    async fn ping(&self) -> Result<(), AppError>;
}

#[async_trait]
impl DocumentStore for Collection<Document> {
    async fn insert_one(&self, document: Document) -> Result<Bson, AppError> {
        let result = Collection::insert_one(self, document).await?;
        Ok(result.inserted_id)
    }

    async fn find_one_and_update(
        &self,
        filter: Document,
        update: Document,
    ) -> Result<Option<Document>, AppError> {
        Ok(Collection::find_one_and_update(self, filter, update)
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, AppError> {
        Ok(Collection::find_one(self, filter).await?)
    }

    async fn delete_one(&self, filter: Document) -> Result<u64, AppError> {
        let result = Collection::delete_one(self, filter).await?;
        Ok(result.deleted_count)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Collection::estimated_document_count(self).await?;
        Ok(())
    }
}
