//! Application state shared across handlers

use crate::{
    cookie::CookiePolicy,
    jwt::JwtService,
    repositories::{
        BlogRepository, SharedStore, UserRepository, food::FoodRepository, order::OrderRepository,
    },
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub jwt_service: JwtService,
    pub cookie_policy: CookiePolicy,
    pub food_repository: FoodRepository,
    pub order_repository: OrderRepository,
    pub blog_repository: BlogRepository,
    pub user_repository: UserRepository,
}

impl AppState {
    pub fn new(store: SharedStore, jwt_service: JwtService, cookie_policy: CookiePolicy) -> Self {
        Self {
            food_repository: FoodRepository::new(store.clone()),
            order_repository: OrderRepository::new(store.clone()),
            blog_repository: BlogRepository::new(store.clone()),
            user_repository: UserRepository::new(store.clone()),
            store,
            jwt_service,
            cookie_policy,
        }
    }
}
