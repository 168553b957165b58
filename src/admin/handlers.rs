use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    ads::dto::AdUnitUpsertRequest,
    ads::repo::AdUnit,
    auth::{dto::StatusResponse, password, repo::AdminUser},
    error::ApiError,
    state::AppState,
};

use super::dto::{AdminLoginRequest, AdminRegisterRequest, AdminUserResponse, UpsertResultResponse};
use super::guard::AdminKey;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/auth/register", post(register_admin))
        .route("/admin/auth/login", post(login_admin))
        .route("/admin/ad_units/upsert", post(upsert_ad_unit))
}

/// Bootstrap-once: the very first admin can be created (behind the API
/// key), after that registration is closed for good.
#[instrument(skip_all)]
pub async fn register_admin(
    State(state): State<AppState>,
    _key: AdminKey,
    Json(payload): Json<AdminRegisterRequest>,
) -> Result<Json<AdminUserResponse>, ApiError> {
    if payload.username.is_empty() || payload.password.len() < 6 {
        return Err(ApiError::bad_request("Invalid username or password"));
    }

    let password = payload.password;
    let hash = tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(e.into()))?
        .map_err(ApiError::Internal)?;

    // The insert is guarded on an empty table, so two racing bootstrap
    // attempts cannot both succeed.
    let Some(admin) = AdminUser::create_first(&state.db, &payload.username, &hash).await? else {
        warn!("admin registration attempted after bootstrap");
        return Err(ApiError::conflict("Admin already registered"));
    };

    info!(admin_id = admin.id, "admin user bootstrapped");
    Ok(Json(AdminUserResponse {
        id: admin.id,
        username: admin.username,
    }))
}

#[instrument(skip_all)]
pub async fn login_admin(
    State(state): State<AppState>,
    Json(payload): Json<AdminLoginRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let admin = AdminUser::find_by_username(&state.db, &payload.username).await?;
    let Some(admin) = admin else {
        return Err(ApiError::InvalidCredentials);
    };

    let hash = admin.password_hash.clone();
    let ok = tokio::task::spawn_blocking(move || password::verify_password(&payload.password, &hash))
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    if !ok {
        warn!(admin_id = admin.id, "admin login with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    info!(admin_id = admin.id, "admin logged in");
    Ok(Json(StatusResponse { status: "ok" }))
}

#[instrument(skip_all)]
pub async fn upsert_ad_unit(
    State(state): State<AppState>,
    _key: AdminKey,
    Json(payload): Json<AdUnitUpsertRequest>,
) -> Result<Json<UpsertResultResponse>, ApiError> {
    if payload.network.is_empty() || payload.placement.is_empty() {
        return Err(ApiError::bad_request("network and placement are required"));
    }
    let created = AdUnit::upsert(
        &state.db,
        &payload.network,
        &payload.placement,
        &payload.ad_unit_id,
        payload.enabled,
        payload.android_min_version,
        payload.android_max_version,
    )
    .await?;

    Ok(Json(UpsertResultResponse {
        status: if created { "created" } else { "updated" },
    }))
}
