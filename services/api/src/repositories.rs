//! Repositories for document store operations

use std::sync::Arc;

use common::{
    Document, DocumentId, DocumentStore, Filter, FindQuery, StoreError, StoreResult,
    store::InsertOutcome,
};

pub mod food;
pub mod order;

/// Collection names
pub const FOODS: &str = "foods";
pub const BLOGS: &str = "blogData";
pub const USERS: &str = "user";
pub const ORDERS: &str = "order";

/// Store handle shared by every repository
pub type SharedStore = Arc<dyn DocumentStore>;

/// User repository for profile records
#[derive(Clone)]
pub struct UserRepository {
    store: SharedStore,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Store a profile as submitted; identifiers are always store-assigned
    pub async fn create(&self, mut profile: Document) -> StoreResult<InsertOutcome> {
        profile.remove(common::store::ID_FIELD);
        self.store.insert_one(USERS, profile).await
    }
}

/// Blog repository, read only
#[derive(Clone)]
pub struct BlogRepository {
    store: SharedStore,
}

impl BlogRepository {
    /// Create a new blog repository
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Get all blog posts
    pub async fn get_all(&self) -> StoreResult<Vec<Document>> {
        self.store.find(BLOGS, FindQuery::new(Filter::All)).await
    }

    /// Find a blog post by ID
    pub async fn find_by_id(&self, id: DocumentId) -> StoreResult<Document> {
        self.store
            .find_one(BLOGS, Filter::Id(id))
            .await?
            .ok_or(StoreError::NotFound)
    }
}
