//! Authentication middleware for cookie token validation

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, Query, State},
    http::{Request, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use tracing::warn;

use crate::{
    cookie::TOKEN_COOKIE,
    error::ApiError,
    jwt::{AuthError, IdentityClaims},
    state::AppState,
};

/// Authenticated user information
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
    pub claims: IdentityClaims,
}

impl AuthUser {
    /// Reject with 403 unless `requested` is the authenticated email
    pub fn ensure_owner(&self, requested: &str) -> Result<(), ApiError> {
        if self.email != requested {
            warn!(
                "Forbidden: {} requested records of {}",
                self.email, requested
            );
            return Err(ApiError::Forbidden);
        }

        Ok(())
    }
}

/// Authentication middleware
///
/// Verifies the `token` cookie and attaches the [`AuthUser`] to the request.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar.get(TOKEN_COOKIE).map(|cookie| cookie.value()).ok_or_else(|| {
        warn!("Rejected {}: no token cookie", req.uri().path());
        AuthError::Missing
    })?;

    let claims = state.jwt_service.verify(token).map_err(|e| {
        warn!("Rejected {}: {}", req.uri().path(), e);
        e
    })?;

    let user = AuthUser {
        email: claims.email.clone(),
        claims,
    };

    // Insert the user into the request extensions
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}

#[derive(Debug, Deserialize)]
struct OwnerQuery {
    email: Option<String>,
}

/// Authenticated user whose `?email=` query parameter names themselves
///
/// Extraction fails with 403 before the handler runs when the query names
/// anybody else, or nobody.
#[derive(Debug, Clone)]
pub struct OwnerScope(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for OwnerScope
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let Query(query) = Query::<OwnerQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        user.ensure_owner(query.email.as_deref().unwrap_or_default())?;

        Ok(OwnerScope(user))
    }
}
