use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{auth::jwt::AuthUser, error::ApiError, state::AppState};

use super::dto::{
    AchievementResponse, UnlockAchievementRequest, XpEventRequest, XpEventResponse,
    XpSummaryResponse,
};
use super::repo;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/xp/events", post(record_event))
        .route("/xp/summary", get(summary))
        .route("/xp/achievements", get(list_achievements))
        .route("/xp/achievements/unlock", post(unlock_achievement))
}

/// `total_points // 100`, then integer square root.
pub fn level_for_points(total_points: i64) -> i64 {
    let base = total_points.max(0) / 100;
    (base as f64).sqrt().floor() as i64
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn record_event(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<XpEventRequest>,
) -> Result<Json<XpEventResponse>, ApiError> {
    if payload.kind.is_empty() || payload.kind.len() > 64 {
        return Err(ApiError::bad_request("Invalid event type"));
    }
    if payload.points < 0 {
        return Err(ApiError::bad_request("points must be non-negative"));
    }

    let event = repo::record_event(
        &state.db,
        user.id,
        payload.date_epoch_day,
        &payload.kind,
        payload.points,
        &payload.note,
    )
    .await?;

    Ok(Json(XpEventResponse {
        id: event.id,
        date_epoch_day: event.date_epoch_day,
        kind: event.kind,
        points: event.points,
        note: event.note,
        created_at: event.created_at,
    }))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn summary(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<XpSummaryResponse>, ApiError> {
    let total_points = repo::total_points(&state.db, user.id).await?;
    Ok(Json(XpSummaryResponse {
        total_points,
        level: level_for_points(total_points),
    }))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn unlock_achievement(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<UnlockAchievementRequest>,
) -> Result<Json<AchievementResponse>, ApiError> {
    if payload.code.is_empty() || payload.code.len() > 128 {
        return Err(ApiError::bad_request("Invalid achievement code"));
    }
    let achievement = repo::unlock_achievement(&state.db, user.id, &payload.code).await?;
    Ok(Json(AchievementResponse {
        code: achievement.code,
        created_at: achievement.created_at,
    }))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn list_achievements(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<AchievementResponse>>, ApiError> {
    let achievements = repo::list_achievements(&state.db, user.id).await?;
    Ok(Json(
        achievements
            .into_iter()
            .map(|a| AchievementResponse {
                code: a.code,
                created_at: a.created_at,
            })
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::level_for_points;

    #[test]
    fn level_formula_boundaries() {
        assert_eq!(level_for_points(0), 0);
        assert_eq!(level_for_points(99), 0);
        assert_eq!(level_for_points(100), 1);
        assert_eq!(level_for_points(399), 1);
        assert_eq!(level_for_points(400), 2);
        assert_eq!(level_for_points(10_000), 10);
    }

    #[test]
    fn level_never_negative() {
        assert_eq!(level_for_points(-500), 0);
    }
}
