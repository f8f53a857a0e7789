//! Order repository for document store operations

use common::{
    Document, DocumentId, Filter, FindQuery, StoreResult,
    store::{DeleteOutcome, InsertOutcome},
};

use super::{ORDERS, SharedStore};
use crate::models::{food::OWNER_EMAIL, order::NewOrder};

/// Order repository for document store operations
#[derive(Clone)]
pub struct OrderRepository {
    store: SharedStore,
}

impl OrderRepository {
    /// Create a new order repository
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Orders placed by `email`
    pub async fn list_by_owner(&self, email: &str) -> StoreResult<Vec<Document>> {
        self.store
            .find(ORDERS, FindQuery::new(Filter::eq(OWNER_EMAIL, email)))
            .await
    }

    pub async fn create(&self, order: &NewOrder) -> StoreResult<InsertOutcome> {
        self.store.insert_one(ORDERS, order.to_document()?).await
    }

    /// Delete an order, provided it belongs to `email`
    pub async fn delete_owned(&self, id: DocumentId, email: &str) -> StoreResult<DeleteOutcome> {
        let filter = Filter::Id(id).and(Filter::eq(OWNER_EMAIL, email));
        self.store.delete_one(ORDERS, filter).await
    }
}
