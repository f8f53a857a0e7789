//! Food repository for catalog and listing operations

use common::{
    Document, DocumentId, Filter, FindQuery, Projection, StoreError, StoreResult, Update,
    store::{InsertOutcome, UpdateOutcome},
};
use serde_json::Value;

use super::{FOODS, SharedStore};
use crate::{
    models::food::{FoodListing, ORDERS, OWNER_EMAIL, OWNER_LISTING_FIELDS, QUANTITY},
    pagination::{CatalogQuery, top_foods_query},
};

/// Food repository for document store operations
#[derive(Clone)]
pub struct FoodRepository {
    store: SharedStore,
}

impl FoodRepository {
    /// Create a new food repository
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Fixed top-items window
    pub async fn top_picks(&self) -> StoreResult<Vec<Document>> {
        self.store.find(FOODS, top_foods_query()).await
    }

    /// Paginated, optionally searched catalog page
    pub async fn catalog(&self, query: &CatalogQuery) -> StoreResult<Vec<Document>> {
        self.store.find(FOODS, query.find_query()).await
    }

    pub async fn count(&self) -> StoreResult<u64> {
        self.store.estimated_count(FOODS).await
    }

    /// Find a food item by ID
    pub async fn find_by_id(&self, id: DocumentId) -> StoreResult<Document> {
        self.store
            .find_one(FOODS, Filter::Id(id))
            .await?
            .ok_or(StoreError::NotFound)
    }

    /// Listings submitted by `email`
    pub async fn list_by_owner(&self, email: &str) -> StoreResult<Vec<Document>> {
        let query = FindQuery::new(Filter::eq(OWNER_EMAIL, email))
            .project(Projection::fields(OWNER_LISTING_FIELDS));
        self.store.find(FOODS, query).await
    }

    /// Insert a new listing with no orders yet
    pub async fn create(&self, listing: &FoodListing) -> StoreResult<InsertOutcome> {
        let mut document = listing.to_document()?;
        document.insert(ORDERS.to_string(), Value::from(0));
        self.store.insert_one(FOODS, document).await
    }

    /// Overwrite the available quantity
    pub async fn set_quantity(&self, id: DocumentId, quantity: i64) -> StoreResult<UpdateOutcome> {
        let mut fields = Document::new();
        fields.insert(QUANTITY.to_string(), Value::from(quantity));
        self.store
            .update_one(FOODS, Filter::Id(id), Update::Set(fields), false)
            .await
    }

    /// Count one more order, creating the document if it does not exist
    pub async fn record_order(&self, id: DocumentId) -> StoreResult<UpdateOutcome> {
        let update = Update::Increment {
            field: ORDERS.to_string(),
            by: 1,
        };
        self.store.update_one(FOODS, Filter::Id(id), update, true).await
    }

    /// Replace the listing fields of the owner's document, creating it when the id is unused
    pub async fn replace_listing(
        &self,
        id: DocumentId,
        listing: &FoodListing,
    ) -> StoreResult<UpdateOutcome> {
        let filter = Filter::Id(id).and(Filter::eq(OWNER_EMAIL, listing.user_email.as_str()));
        self.store
            .update_one(FOODS, filter, Update::Set(listing.to_document()?), true)
            .await
    }
}
