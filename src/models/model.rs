use crate::database::MongoCollection;
use crate::utils::error::AppError;
use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use std::any::Any;
use std::fmt;

/// Downcasting support for boxed models.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A domain object that can export itself as key/value pairs and repopulate
/// itself from a stored document.
#[async_trait]
pub trait Model: AsAny + fmt::Debug + Send + Sync {
    /// Field names persisted on insert, in document order.
    fn keys(&self) -> &'static [&'static str];

    /// Value of a single persisted field.
    fn value(&self, key: &str) -> Result<Bson, AppError>;

    /// Overwrites every field from a stored document.
    fn populate(&mut self, document: Document) -> Result<(), AppError>;

    /// A fresh zero value of the same concrete type.
    fn empty(&self) -> Box<dyn Model>;

    /// Loads the first document in `collection` matching `filter` into `self`.
    async fn get_mongo_document(
        &mut self,
        collection: &MongoCollection,
        filter: Document,
    ) -> Result<(), AppError> {
        let document = collection
            .find_one_raw(filter.clone())
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "no document in {}.{} matches {}",
                    collection.database_name(),
                    collection.collection_name(),
                    filter
                ))
            })?;

        self.populate(document)
    }
}

/// A model that can be registered by name and built from nothing.
pub trait ModelType: Model + Default {
    const MODEL_TYPE: &'static str;
}

impl dyn Model {
    pub fn as_model<M: Model>(&self) -> Option<&M> {
        <dyn Model as AsAny>::as_any(self).downcast_ref::<M>()
    }

    pub fn into_model<M: Model>(self: Box<Self>) -> Result<M, AppError> {
        <dyn Model as AsAny>::into_any(self)
            .downcast::<M>()
            .map(|model| *model)
            .map_err(|_| {
                AppError::InvalidModelType(std::any::type_name::<M>().to_string())
            })
    }
}
