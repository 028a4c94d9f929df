use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{domain::models::UserId, routes::ApiError};

/// Header carrying the id of the user authenticated by the upstream gateway.
pub const USER_ID_HEADER: &str = "x-user-id";

/// A custom Axum extractor that yields the authenticated user's id.
///
/// Authentication happens in front of this service; the gateway forwards the
/// user id in [`USER_ID_HEADER`]. Requests without a usable id are rejected
/// with 401 Unauthorized.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: UserId,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<UserId>().ok())
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

        Ok(AuthUser { id })
    }
}
