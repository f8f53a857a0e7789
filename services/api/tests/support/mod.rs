//! Shared harness for the HTTP tests: the real router over a memory store that
//! counts how often it is touched.
#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use api::{AppState, cookie::CookiePolicy, create_router, jwt::IdentityClaims, jwt::JwtService};
use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use common::{
    Document, DocumentStore, Filter, FindQuery, StoreError, StoreResult, Update,
    memory::MemoryStore,
    store::{DeleteOutcome, InsertOutcome, UpdateOutcome},
};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret";

/// Memory store that records every read and write
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    reads: AtomicUsize,
    writes: AtomicUsize,
    offline: AtomicBool,
}

impl CountingStore {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make pings fail from now on
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    fn read(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }

    fn write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn find(&self, collection: &str, query: FindQuery) -> StoreResult<Vec<Document>> {
        self.read();
        self.inner.find(collection, query).await
    }

    async fn find_one(&self, collection: &str, filter: Filter) -> StoreResult<Option<Document>> {
        self.read();
        self.inner.find_one(collection, filter).await
    }

    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<InsertOutcome> {
        self.write();
        self.inner.insert_one(collection, document).await
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Filter,
        update: Update,
        upsert: bool,
    ) -> StoreResult<UpdateOutcome> {
        self.write();
        self.inner.update_one(collection, filter, update, upsert).await
    }

    async fn delete_one(&self, collection: &str, filter: Filter) -> StoreResult<DeleteOutcome> {
        self.write();
        self.inner.delete_one(collection, filter).await
    }

    async fn estimated_count(&self, collection: &str) -> StoreResult<u64> {
        self.read();
        self.inner.estimated_count(collection).await
    }

    async fn ping(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Configuration("store offline".to_string()));
        }
        self.inner.ping().await
    }
}

/// Response pieces the tests assert on
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn set_cookie(&self) -> String {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<CountingStore>,
    pub jwt: JwtService,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_router(|router| router)
    }

    /// Build the app, letting the caller wrap the router in extra layers
    pub fn with_router(wrap: impl FnOnce(Router) -> Router) -> Self {
        let store = Arc::new(CountingStore::default());
        let jwt = JwtService::new(SECRET);
        let state = AppState::new(
            store.clone(),
            jwt.clone(),
            CookiePolicy::for_environment(false),
        );

        Self {
            router: wrap(create_router(state)),
            store,
            jwt,
        }
    }

    pub fn token_for(&self, email: &str) -> String {
        self.jwt
            .issue(&IdentityClaims::new(email))
            .expect("token issued")
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("token={}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request builds");

        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, None).await
    }

    /// Insert a document straight into the store, returning its id
    pub async fn seed(&self, collection: &str, document: Value) -> String {
        let Value::Object(document) = document else {
            panic!("seed documents must be objects");
        };
        self.store
            .insert_one(collection, document)
            .await
            .expect("seed insert")
            .inserted_id
    }

    pub async fn seed_food(&self, name: &str, owner: &str) -> String {
        self.seed("foods", food_listing(name, owner)).await
    }
}

/// Complete listing body as the front end posts it
pub fn food_listing(name: &str, owner: &str) -> Value {
    json!({
        "foodName": name,
        "foodImageUrl": format!("https://img.example/{}.jpg", name.to_lowercase().replace(' ', "-")),
        "foodCategory": "Mains",
        "foodOrigin": "Somewhere",
        "price": 10.0,
        "quantity": 12,
        "description": format!("{} made fresh", name),
        "userName": "Chef",
        "userEmail": owner
    })
}
