//! In-memory `DocumentStore` used by the unit tests.
//!
//! Filters match on top-level equality only; updates understand `$set` and
//! `$unset`. That is all the wrapper and the auth service ever send.

use super::store::DocumentStore;
use crate::utils::error::AppError;
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<Vec<Document>>,
    writes: AtomicUsize,
    offline: AtomicBool,
    unique_key: Option<&'static str>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects inserts that repeat an existing value of `key`, like a unique index.
    pub fn with_unique_key(key: &'static str) -> Self {
        Self {
            unique_key: Some(key),
            ..Self::default()
        }
    }

    /// Number of insert/update/delete calls that reached the store.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.documents.lock().map(|docs| docs.len()).unwrap_or(0)
    }

    /// Makes every later call fail with a database error.
    pub fn set_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), AppError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError("server unreachable".to_string()));
        }
        Ok(())
    }

    fn begin_write(&self) -> Result<(), AppError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check_online()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Document>>, AppError> {
        self.documents
            .lock()
            .map_err(|_| AppError::DatabaseError("store poisoned".to_string()))
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

fn apply_update(document: &mut Document, update: &Document) -> Result<(), AppError> {
    for (operator, fields) in update {
        let fields = fields
            .as_document()
            .ok_or_else(|| AppError::InvalidRequest(format!("{} expects a document", operator)))?;
        match operator.as_str() {
            "$set" => {
                for (key, value) in fields {
                    document.insert(key.clone(), value.clone());
                }
            }
            "$unset" => {
                for (key, _) in fields {
                    document.remove(key);
                }
            }
            other => {
                return Err(AppError::InvalidRequest(format!("unsupported operator {}", other)));
            }
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(&self, mut document: Document) -> Result<Bson, AppError> {
        self.begin_write()?;
        let mut docs = self.lock()?;

        if let Some(key) = self.unique_key {
            if let Some(value) = document.get(key) {
                if docs.iter().any(|doc| doc.get(key) == Some(value)) {
                    return Err(AppError::DuplicateKey(format!("dup key: {{ {}: {} }}", key, value)));
                }
            }
        }

        let id = match document.get("_id") {
            Some(id) => id.clone(),
            None => {
                let id = Bson::ObjectId(ObjectId::new());
                document.insert("_id", id.clone());
                id
            }
        };
        docs.push(document);
        Ok(id)
    }

    async fn find_one_and_update(
        &self,
        filter: Document,
        update: Document,
    ) -> Result<Option<Document>, AppError> {
        self.begin_write()?;
        let mut docs = self.lock()?;
        match docs.iter_mut().find(|doc| matches(doc, &filter)) {
            Some(doc) => {
                apply_update(doc, &update)?;
                Ok(Some(doc.clone()))
            }
            None => Ok(None),
        }
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, AppError> {
        self.check_online()?;
        Ok(self.lock()?.iter().find(|doc| matches(doc, &filter)).cloned())
    }

    async fn delete_one(&self, filter: Document) -> Result<u64, AppError> {
        self.begin_write()?;
        let mut docs = self.lock()?;
        match docs.iter().position(|doc| matches(doc, &filter)) {
            Some(index) => {
                docs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_online()
    }
}
