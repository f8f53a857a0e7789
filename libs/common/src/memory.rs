//! In-process document store
//!
//! Collections are insertion-ordered vectors behind an async `RwLock`. Selected
//! with a `memory://` database URL; the test suites run against it as well.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use serde_json::{Number, Value};
use tokio::sync::RwLock;

use crate::{
    error::{StoreError, StoreResult},
    store::{
        DeleteOutcome, Document, DocumentId, DocumentStore, Filter, FindQuery, ID_FIELD,
        InsertOutcome, Update, UpdateOutcome,
    },
};

/// Memory-backed document store
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

/// Apply an update in place; returns whether the document changed
fn apply_update(document: &mut Document, update: &Update) -> StoreResult<bool> {
    match update {
        Update::Set(fields) => {
            let mut changed = false;
            for (key, value) in fields {
                if document.get(key) != Some(value) {
                    document.insert(key.clone(), value.clone());
                    changed = true;
                }
            }
            Ok(changed)
        }
        Update::Increment { field, by } => {
            let next = match document.get(field) {
                None => Value::from(*by),
                Some(Value::Number(n)) => match n.as_i64() {
                    Some(current) => current
                        .checked_add(*by)
                        .map(Value::from)
                        .ok_or_else(|| {
                            StoreError::InvalidInput(format!("Increment overflows field '{}'", field))
                        })?,
                    None => n
                        .as_f64()
                        .and_then(|current| Number::from_f64(current + *by as f64))
                        .map(Value::Number)
                        .ok_or_else(|| {
                            StoreError::InvalidInput(format!("Field '{}' is not finite", field))
                        })?,
                },
                Some(_) => {
                    return Err(StoreError::InvalidInput(format!(
                        "Cannot apply increment to non-numeric field '{}'",
                        field
                    )));
                }
            };
            document.insert(field.clone(), next);
            Ok(*by != 0)
        }
    }
}

fn id_of(document: &Document) -> Option<&str> {
    document.get(ID_FIELD).and_then(Value::as_str)
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: &str, query: FindQuery) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let limit = query
            .limit
            .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);
        let skip = usize::try_from(query.skip).unwrap_or(usize::MAX);

        Ok(documents
            .iter()
            .filter(|doc| query.filter.matches(doc))
            .skip(skip)
            .take(limit)
            .map(|doc| match &query.projection {
                Some(projection) => projection.apply(doc),
                None => doc.clone(),
            })
            .collect())
    }

    async fn find_one(&self, collection: &str, filter: Filter) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.iter().find(|doc| filter.matches(doc)))
            .cloned())
    }

    async fn insert_one(
        &self,
        collection: &str,
        mut document: Document,
    ) -> StoreResult<InsertOutcome> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();

        let inserted_id = match document.get(ID_FIELD) {
            Some(Value::String(id)) => id.clone(),
            Some(other) => other.to_string(),
            None => {
                let id = DocumentId::new().to_hex();
                document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
                id
            }
        };

        if documents.iter().any(|doc| id_of(doc) == Some(inserted_id.as_str())) {
            return Err(StoreError::Conflict(format!(
                "Duplicate _id '{}' in {}",
                inserted_id, collection
            )));
        }

        documents.push(document);

        Ok(InsertOutcome {
            acknowledged: true,
            inserted_id,
        })
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Filter,
        update: Update,
        upsert: bool,
    ) -> StoreResult<UpdateOutcome> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();

        if let Some(document) = documents.iter_mut().find(|doc| filter.matches(doc)) {
            let changed = apply_update(document, &update)?;
            return Ok(UpdateOutcome {
                acknowledged: true,
                matched_count: 1,
                modified_count: u64::from(changed),
                upserted_count: 0,
                upserted_id: None,
            });
        }

        if !upsert {
            return Ok(UpdateOutcome {
                acknowledged: true,
                matched_count: 0,
                modified_count: 0,
                upserted_count: 0,
                upserted_id: None,
            });
        }

        let mut document = Document::new();
        filter.seed(&mut document);
        let id = match id_of(&document) {
            Some(id) => id.to_string(),
            None => {
                let id = DocumentId::new().to_hex();
                document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
                id
            }
        };

        // The filter missed, so an existing document with this id belongs to
        // someone else.
        if documents.iter().any(|doc| id_of(doc) == Some(id.as_str())) {
            return Err(StoreError::Conflict(format!(
                "Duplicate _id '{}' in {}",
                id, collection
            )));
        }

        apply_update(&mut document, &update)?;
        documents.push(document);

        Ok(UpdateOutcome {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 1,
            upserted_id: Some(id),
        })
    }

    async fn delete_one(&self, collection: &str, filter: Filter) -> StoreResult<DeleteOutcome> {
        let mut collections = self.collections.write().await;
        let deleted_count = match collections.get_mut(collection) {
            Some(documents) => match documents.iter().position(|doc| filter.matches(doc)) {
                Some(index) => {
                    documents.remove(index);
                    1
                }
                None => 0,
            },
            None => 0,
        };

        Ok(DeleteOutcome {
            acknowledged: true,
            deleted_count,
        })
    }

    async fn estimated_count(&self, collection: &str) -> StoreResult<u64> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|documents| documents.len() as u64)
            .unwrap_or(0))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
