//! MongoDB-backed document store
//!
//! Translates the store's filter, update and projection types into BSON and
//! renders results back as JSON. Top-level `_id` object ids are rendered as their
//! hex string so clients can put them straight into URLs.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Client, Collection, Database,
    bson::{self, Bson, Document as BsonDocument, doc},
    error::{Error as DriverError, ErrorKind, WriteFailure},
    options::{ClientOptions, FindOptions, UpdateOptions},
};
use serde_json::Value;
use tracing::{error, info};

use crate::{
    database::DatabaseConfig,
    error::{StoreError, StoreResult},
    store::{
        DeleteOutcome, Document, DocumentStore, Filter, FindQuery, ID_FIELD, InsertOutcome,
        Projection, Update, UpdateOutcome,
    },
};

/// Server error code for unique index violations
const DUPLICATE_KEY: i32 = 11000;

/// MongoDB document store
#[derive(Clone)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Connect to the configured deployment
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(&config.database_url)
            .await
            .map_err(|e| StoreError::Configuration(format!("Invalid database URL: {}", e)))?;
        options.app_name = Some("dishdynamo-api".to_string());

        let client = Client::with_options(options).map_err(StoreError::Unavailable)?;
        info!("MongoDB client initialized for database: {}", config.database_name);

        Ok(Self {
            database: client.database(&config.database_name),
        })
    }

    fn collection(&self, name: &str) -> Collection<BsonDocument> {
        self.database.collection(name)
    }
}

fn filter_to_bson(filter: &Filter) -> BsonDocument {
    match filter {
        Filter::All => BsonDocument::new(),
        Filter::Id(id) => doc! { "_id": id.object_id() },
        Filter::Eq { field, value } => {
            let mut document = BsonDocument::new();
            document.insert(field.as_str(), value.as_str());
            document
        }
        Filter::ContainsIgnoreCase { field, term } => {
            let mut document = BsonDocument::new();
            document.insert(
                field.as_str(),
                doc! { "$regex": regex::escape(term), "$options": "i" },
            );
            document
        }
        Filter::And(filters) if filters.is_empty() => BsonDocument::new(),
        Filter::And(filters) => {
            let clauses: Vec<Bson> = filters
                .iter()
                .map(|f| Bson::Document(filter_to_bson(f)))
                .collect();
            doc! { "$and": clauses }
        }
    }
}

fn projection_to_bson(projection: &Projection) -> BsonDocument {
    projection.iter().fold(BsonDocument::new(), |mut document, field| {
        document.insert(field, 1);
        document
    })
}

fn update_to_bson(update: Update) -> StoreResult<BsonDocument> {
    match update {
        Update::Set(fields) => Ok(doc! { "$set": to_bson_document(&fields)? }),
        Update::Increment { field, by } => {
            let mut increment = BsonDocument::new();
            increment.insert(field, by);
            Ok(doc! { "$inc": increment })
        }
    }
}

/// Values BSON cannot hold, such as integers above `i64::MAX`, are invalid input
fn to_bson_document(document: &Document) -> StoreResult<BsonDocument> {
    bson::to_document(document).map_err(|e| StoreError::InvalidInput(e.to_string()))
}

fn from_bson_document(mut document: BsonDocument) -> Document {
    if let Ok(id) = document.get_object_id(ID_FIELD) {
        document.insert(ID_FIELD, id.to_hex());
    }

    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}

fn id_to_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s,
        other => other.to_string(),
    }
}

fn map_driver_error(err: DriverError) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY => {
            StoreError::Conflict(write.message.clone())
        }
        ErrorKind::Write(WriteFailure::WriteError(write)) => {
            StoreError::InvalidInput(write.message.clone())
        }
        ErrorKind::InvalidArgument { message, .. } => StoreError::InvalidInput(message.clone()),
        _ => {
            error!("MongoDB driver error: {}", err);
            StoreError::Unavailable(err)
        }
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find(&self, collection: &str, query: FindQuery) -> StoreResult<Vec<Document>> {
        let options = FindOptions::builder()
            .projection(query.projection.as_ref().map(projection_to_bson))
            .skip(Some(query.skip).filter(|skip| *skip > 0))
            .limit(query.limit.map(|limit| i64::try_from(limit).unwrap_or(i64::MAX)))
            .build();

        let cursor = self
            .collection(collection)
            .find(filter_to_bson(&query.filter), options)
            .await
            .map_err(map_driver_error)?;

        let documents: Vec<BsonDocument> = cursor.try_collect().await.map_err(map_driver_error)?;

        Ok(documents.into_iter().map(from_bson_document).collect())
    }

    async fn find_one(&self, collection: &str, filter: Filter) -> StoreResult<Option<Document>> {
        let document = self
            .collection(collection)
            .find_one(filter_to_bson(&filter), None)
            .await
            .map_err(map_driver_error)?;

        Ok(document.map(from_bson_document))
    }

    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<InsertOutcome> {
        let result = self
            .collection(collection)
            .insert_one(to_bson_document(&document)?, None)
            .await
            .map_err(map_driver_error)?;

        Ok(InsertOutcome {
            acknowledged: true,
            inserted_id: id_to_string(result.inserted_id),
        })
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Filter,
        update: Update,
        upsert: bool,
    ) -> StoreResult<UpdateOutcome> {
        let options = UpdateOptions::builder().upsert(upsert).build();
        let result = self
            .collection(collection)
            .update_one(filter_to_bson(&filter), update_to_bson(update)?, options)
            .await
            .map_err(map_driver_error)?;

        let upserted_id = result.upserted_id.map(id_to_string);
        Ok(UpdateOutcome {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(upserted_id.is_some()),
            upserted_id,
        })
    }

    async fn delete_one(&self, collection: &str, filter: Filter) -> StoreResult<DeleteOutcome> {
        let result = self
            .collection(collection)
            .delete_one(filter_to_bson(&filter), None)
            .await
            .map_err(map_driver_error)?;

        Ok(DeleteOutcome {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }

    async fn estimated_count(&self, collection: &str) -> StoreResult<u64> {
        self.collection(collection)
            .estimated_document_count(None)
            .await
            .map_err(map_driver_error)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(map_driver_error)?;
        Ok(())
    }
}
