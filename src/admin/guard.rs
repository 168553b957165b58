use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{error::ApiError, state::AppState};

/// Machine-to-machine admin guard: the `X-Admin-Key` header must exactly
/// match the configured `ADMIN_API_KEY`. Absent or wrong key reads the same
/// to the caller.
pub struct AdminKey;

#[async_trait]
impl FromRequestParts<AppState> for AdminKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get("x-admin-key")
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        if presented != state.config.admin_api_key {
            return Err(ApiError::Unauthorized);
        }
        Ok(AdminKey)
    }
}
