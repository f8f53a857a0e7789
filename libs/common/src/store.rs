//! Document store abstraction
//!
//! Collections are addressed by name and hold schema-free JSON objects keyed by
//! an `_id`. The operation set covers what the HTTP layer uses.

use std::{fmt, str::FromStr};

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};

/// A stored document: a JSON object
pub type Document = Map<String, Value>;

/// Name of the identifier field every document carries
pub const ID_FIELD: &str = "_id";

/// Store-assigned document identifier (12-byte object id, 24 hex chars on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(ObjectId);

impl DocumentId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// Hex rendering used in JSON documents and URLs
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for DocumentId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|_| StoreError::InvalidId(s.to_string()))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Query filter
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document
    All,
    /// `_id` equality
    Id(DocumentId),
    /// String field equality
    Eq { field: String, value: String },
    /// Case-insensitive literal substring match on a string field
    ContainsIgnoreCase { field: String, term: String },
    /// Every inner filter must match
    And(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn contains_ignore_case(field: impl Into<String>, term: impl Into<String>) -> Self {
        Filter::ContainsIgnoreCase {
            field: field.into(),
            term: term.into(),
        }
    }

    /// Conjunction of `self` and `other`, flattening nested conjunctions
    pub fn and(self, other: Filter) -> Self {
        match (self, other) {
            (Filter::All, f) | (f, Filter::All) => f,
            (Filter::And(mut left), Filter::And(right)) => {
                left.extend(right);
                Filter::And(left)
            }
            (Filter::And(mut left), f) => {
                left.push(f);
                Filter::And(left)
            }
            (f, Filter::And(mut right)) => {
                right.insert(0, f);
                Filter::And(right)
            }
            (a, b) => Filter::And(vec![a, b]),
        }
    }

    /// Evaluate the filter against a JSON document
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Id(id) => {
                document.get(ID_FIELD).and_then(Value::as_str) == Some(id.to_hex().as_str())
            }
            Filter::Eq { field, value } => {
                document.get(field).and_then(Value::as_str) == Some(value.as_str())
            }
            Filter::ContainsIgnoreCase { field, term } => document
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|s| s.to_lowercase().contains(&term.to_lowercase())),
            Filter::And(filters) => filters.iter().all(|f| f.matches(document)),
        }
    }

    /// Copy the equality terms of the filter into a document being upserted
    pub fn seed(&self, document: &mut Document) {
        match self {
            Filter::Id(id) => {
                document.insert(ID_FIELD.to_string(), Value::String(id.to_hex()));
            }
            Filter::Eq { field, value } => {
                document.insert(field.clone(), Value::String(value.clone()));
            }
            Filter::And(filters) => filters.iter().for_each(|f| f.seed(document)),
            Filter::All | Filter::ContainsIgnoreCase { .. } => {}
        }
    }
}

/// Update applied by `update_one`
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Overwrite the given fields
    Set(Document),
    /// Add `by` to a numeric field, treating a missing field as zero
    Increment { field: String, by: i64 },
}

/// Field allow-list; `_id` is always returned
#[derive(Debug, Clone, PartialEq)]
pub struct Projection(Vec<String>);

impl Projection {
    pub fn fields(fields: &[&str]) -> Self {
        Self(fields.iter().map(|f| f.to_string()).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn apply(&self, document: &Document) -> Document {
        document
            .iter()
            .filter(|(key, _)| key.as_str() == ID_FIELD || self.0.contains(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// Parameters of a `find` call
#[derive(Debug, Clone, PartialEq)]
pub struct FindQuery {
    pub filter: Filter,
    pub projection: Option<Projection>,
    pub skip: u64,
    /// `None` returns every remaining document
    pub limit: Option<u64>,
}

impl FindQuery {
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            projection: None,
            skip: 0,
            limit: None,
        }
    }

    pub fn project(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    pub fn limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }
}

/// Result of `insert_one`, shaped like the driver's acknowledgement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub acknowledged: bool,
    pub inserted_id: String,
}

/// Result of `update_one`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}

/// Result of `delete_one`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Operations every document store backend provides
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents matching the query, in store order
    async fn find(&self, collection: &str, query: FindQuery) -> StoreResult<Vec<Document>>;

    /// First document matching the filter
    async fn find_one(&self, collection: &str, filter: Filter) -> StoreResult<Option<Document>>;

    /// Insert a document, assigning an `_id` when it has none
    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<InsertOutcome>;

    /// Apply `update` to the first matching document, inserting one when `upsert`
    /// is set and nothing matches
    async fn update_one(
        &self,
        collection: &str,
        filter: Filter,
        update: Update,
        upsert: bool,
    ) -> StoreResult<UpdateOutcome>;

    /// Remove the first matching document
    async fn delete_one(&self, collection: &str, filter: Filter) -> StoreResult<DeleteOutcome>;

    /// Collection size from metadata
    async fn estimated_count(&self, collection: &str) -> StoreResult<u64>;

    /// Round trip to the backend
    async fn ping(&self) -> StoreResult<()>;
}
