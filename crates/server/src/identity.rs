//! Caller identity.
//!
//! Authentication happens at the gateway, which forwards the resolved user id
//! in `x-user-id`. Handlers take [`AuthUser`] and pass the identity on
//! explicitly.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use service::address_book::CurrentUser;

use crate::errors::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub CurrentUser);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| ApiError::Unauthorized(format!("missing {USER_ID_HEADER} header")))?;
        let text = raw
            .to_str()
            .map_err(|_| ApiError::Unauthorized(format!("{USER_ID_HEADER} is not valid text")))?;
        let user_id = Uuid::parse_str(text.trim())
            .map_err(|_| ApiError::Unauthorized(format!("{USER_ID_HEADER} is not a uuid")))?;
        Ok(AuthUser(CurrentUser::new(user_id)))
    }
}
