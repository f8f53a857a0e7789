//! API service routes

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use axum_extra::extract::CookieJar;
use common::{Document, DocumentId, database::health_check};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::{
    error::{ApiError, ApiResult},
    jwt::IdentityClaims,
    middleware::{AuthUser, OwnerScope, auth_middleware},
    models::{
        CountResponse, HealthResponse, JsonBody, StatusResponse,
        food::{FoodListing, QuantityUpdate},
        order::NewOrder,
    },
    pagination::CatalogParams,
    state::AppState,
    validation::validate_email,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let guard = middleware::from_fn_with_state(state.clone(), auth_middleware);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/jwt", post(issue_token))
        .route("/logOut", post(log_out))
        .route("/foods", get(get_top_foods))
        .route("/allFoods", get(get_all_foods))
        .route("/foodsCount", get(get_foods_count))
        .route(
            "/foods/:id",
            get(get_food).patch(update_quantity).put(record_order),
        )
        .route(
            "/usersfood",
            get(get_user_foods)
                .post(create_user_food)
                .route_layer(guard.clone()),
        )
        .route(
            "/usersfood/:id",
            get(get_food).merge(put(replace_user_food).route_layer(guard.clone())),
        )
        .route(
            "/orderingfoods",
            get(get_orders).post(create_order).route_layer(guard.clone()),
        )
        .route("/orderFoods", get(get_orders).route_layer(guard.clone()))
        .route("/orderFoods/:id", delete(delete_order).route_layer(guard))
        .route("/blogs", get(get_blogs))
        .route("/blogs/:id", get(get_blog))
        .route("/users", post(create_user))
        .with_state(state)
}

/// CORS policy for the configured front-end origins, credentials included
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]))
}

fn parse_id(raw: &str) -> ApiResult<DocumentId> {
    Ok(raw.parse::<DocumentId>()?)
}

/// Liveness banner
pub async fn root() -> &'static str {
    "DishDynamo is Running"
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let database = match health_check(state.store.as_ref()).await {
        Ok(healthy) => healthy,
        Err(e) => {
            warn!("Health check failed: {}", e);
            false
        }
    };
    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if database { "ok" } else { "degraded" },
            service: "dishdynamo-api",
            database,
        }),
    )
}

/// Issue a token for the posted identity and set it as a cookie
pub async fn issue_token(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(identity): JsonBody<IdentityClaims>,
) -> ApiResult<impl IntoResponse> {
    validate_email(&identity.email).map_err(ApiError::BadRequest)?;

    let token = state.jwt_service.issue(&identity)?;
    info!("Issued token for {}", identity.email);

    Ok((
        jar.add(state.cookie_policy.session_cookie(token)),
        Json(StatusResponse { status: true }),
    ))
}

/// Clear the token cookie; the token itself stays valid until it expires
pub async fn log_out(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    (
        jar.add(state.cookie_policy.removal_cookie()),
        Json(StatusResponse { status: true }),
    )
}

/// Fixed top-items window
pub async fn get_top_foods(State(state): State<AppState>) -> ApiResult<Json<Vec<Document>>> {
    Ok(Json(state.food_repository.top_picks().await?))
}

/// Paginated, searchable catalog
pub async fn get_all_foods(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> ApiResult<Json<Vec<Document>>> {
    let query = params.validate().map_err(ApiError::BadRequest)?;
    Ok(Json(state.food_repository.catalog(&query).await?))
}

pub async fn get_foods_count(State(state): State<AppState>) -> ApiResult<Json<CountResponse>> {
    let count = state.food_repository.count().await?;
    Ok(Json(CountResponse { count }))
}

/// Get a food item by ID
pub async fn get_food(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Document>> {
    Ok(Json(state.food_repository.find_by_id(parse_id(&id)?).await?))
}

/// Listings of the authenticated user
pub async fn get_user_foods(
    State(state): State<AppState>,
    OwnerScope(user): OwnerScope,
) -> ApiResult<Json<Vec<Document>>> {
    Ok(Json(state.food_repository.list_by_owner(&user.email).await?))
}

/// Submit a new listing owned by the authenticated user
pub async fn create_user_food(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(listing): JsonBody<FoodListing>,
) -> ApiResult<impl IntoResponse> {
    user.ensure_owner(&listing.user_email)?;
    listing.validate().map_err(ApiError::BadRequest)?;

    let outcome = state.food_repository.create(&listing).await?;
    info!("Food {} listed by {}", outcome.inserted_id, user.email);

    Ok(Json(outcome))
}

/// Replace the listing fields of one of the user's listings
pub async fn replace_user_food(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(listing): JsonBody<FoodListing>,
) -> ApiResult<impl IntoResponse> {
    user.ensure_owner(&listing.user_email)?;
    listing.validate().map_err(ApiError::BadRequest)?;

    let outcome = state
        .food_repository
        .replace_listing(parse_id(&id)?, &listing)
        .await?;

    Ok(Json(outcome))
}

/// Set the available quantity after a purchase
pub async fn update_quantity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<QuantityUpdate>,
) -> ApiResult<impl IntoResponse> {
    update.validate().map_err(ApiError::BadRequest)?;

    let id = parse_id(&id)?;
    info!("Setting quantity of food {} to {}", id, update.quantity);
    let outcome = state.food_repository.set_quantity(id, update.quantity).await?;

    Ok(Json(outcome))
}

/// Increment the order counter of a food item
pub async fn record_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let outcome = state.food_repository.record_order(parse_id(&id)?).await?;
    Ok(Json(outcome))
}

/// Orders placed by the authenticated user
pub async fn get_orders(
    State(state): State<AppState>,
    OwnerScope(user): OwnerScope,
) -> ApiResult<Json<Vec<Document>>> {
    Ok(Json(state.order_repository.list_by_owner(&user.email).await?))
}

/// Record a purchase by the authenticated user
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(order): JsonBody<NewOrder>,
) -> ApiResult<impl IntoResponse> {
    user.ensure_owner(&order.user_email)?;
    order.validate().map_err(ApiError::BadRequest)?;

    let outcome = state.order_repository.create(&order).await?;
    info!("Order {} placed by {}", outcome.inserted_id, user.email);

    Ok(Json(outcome))
}

/// Delete one of the authenticated user's orders
pub async fn delete_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let outcome = state
        .order_repository
        .delete_owned(parse_id(&id)?, &user.email)
        .await?;

    Ok(Json(outcome))
}

/// Get all blog posts
pub async fn get_blogs(State(state): State<AppState>) -> ApiResult<Json<Vec<Document>>> {
    Ok(Json(state.blog_repository.get_all().await?))
}

/// Get a blog post by ID
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Document>> {
    Ok(Json(state.blog_repository.find_by_id(parse_id(&id)?).await?))
}

/// Create a new user
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(profile): JsonBody<Document>,
) -> ApiResult<impl IntoResponse> {
    if profile.is_empty() {
        return Err(ApiError::BadRequest("User profile is empty".to_string()));
    }

    let outcome = state.user_repository.create(profile).await?;
    info!("User {} registered", outcome.inserted_id);

    Ok(Json(outcome))
}
