//! Acting user extraction
//!
//! Authentication happens upstream; the gateway forwards the verified
//! account id in the `X-User-Id` header.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

use kura::UserId;

/// Header carrying the acting user's id
pub const USER_ID_HEADER: &str = "x-user-id";

/// The user on whose behalf a request is made
#[derive(Debug, Clone)]
pub struct ActingUser(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = match parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
        {
            Some(raw) => raw,
            None => {
                tracing::warn!("Missing X-User-Id header");
                return Err((
                    StatusCode::UNAUTHORIZED,
                    "Missing X-User-Id header".to_string(),
                ));
            }
        };

        UserId::new(raw).map(ActingUser).map_err(|e| {
            tracing::warn!("Invalid X-User-Id header: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string())
        })
    }
}
