use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::UserId;

/// Session issuance lives upstream; requests arrive with the
/// authenticated user id in this header.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub UserId);

#[derive(Serialize)]
pub struct AuthErrorResponse {
    pub error: String,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<AuthErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok());

        match user_id {
            Some(uuid) => Ok(AuthenticatedUser(UserId::from_uuid(uuid))),
            None => Err((
                StatusCode::UNAUTHORIZED,
                Json(AuthErrorResponse {
                    error: "Missing or invalid user identity".to_string(),
                }),
            )),
        }
    }
}
