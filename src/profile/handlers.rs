use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{auth::jwt::AuthUser, error::ApiError, state::AppState};

use super::dto::{ProfileRequest, ProfileResponse, UserSettingsRequest, UserSettingsResponse};
use super::repo::{Profile, UserSettings};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile/me", get(get_profile).put(upsert_profile))
        .route("/user_settings/me", get(get_settings).put(upsert_settings))
}

fn profile_response(p: Profile) -> ProfileResponse {
    ProfileResponse {
        id: p.id,
        user_id: p.user_id,
        height_cm: p.height_cm,
        weight_kg: p.weight_kg,
        age: p.age,
        sex: p.sex,
        created_at: p.created_at,
        updated_at: p.updated_at,
    }
}

fn settings_response(s: UserSettings) -> UserSettingsResponse {
    UserSettingsResponse {
        id: s.id,
        user_id: s.user_id,
        calorie_mode: s.calorie_mode,
        step_goal: s.step_goal,
        calorie_goal_override: s.calorie_goal_override,
        reminders_enabled: s.reminders_enabled,
        updated_at: s.updated_at,
    }
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = Profile::find_by_user(&state.db, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;
    Ok(Json(profile_response(profile)))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn upsert_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    if payload.height_cm <= 0.0 || payload.weight_kg <= 0.0 || payload.age <= 0 {
        return Err(ApiError::bad_request("Invalid profile values"));
    }
    let profile = Profile::upsert(
        &state.db,
        user.id,
        payload.height_cm,
        payload.weight_kg,
        payload.age,
        &payload.sex,
    )
    .await?;
    Ok(Json(profile_response(profile)))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn get_settings(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<UserSettingsResponse>, ApiError> {
    let settings = UserSettings::find_by_user(&state.db, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User settings not found"))?;
    Ok(Json(settings_response(settings)))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn upsert_settings(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<UserSettingsRequest>,
) -> Result<Json<UserSettingsResponse>, ApiError> {
    if payload.step_goal <= 0 {
        return Err(ApiError::bad_request("step_goal must be positive"));
    }
    let settings = UserSettings::upsert(
        &state.db,
        user.id,
        &payload.calorie_mode,
        payload.step_goal,
        payload.calorie_goal_override,
        payload.reminders_enabled,
    )
    .await?;
    Ok(Json(settings_response(settings)))
}
