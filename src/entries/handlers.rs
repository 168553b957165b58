use axum::{
    extract::{Query, State},
    routing::{post, put},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    state::AppState,
};

use super::dto::{
    AddWaterRequest, DayRangeQuery, StepEntryResponse, UpsertStepsRequest, UpsertWeightRequest,
    WaterDayQuery, WaterDayResponse, WaterEntryResponse, WeightEntryResponse,
};
use super::repo;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/entries/steps", put(upsert_steps).get(list_steps))
        .route("/entries/water", post(add_water).get(water_day))
        .route("/entries/weight", put(upsert_weight).get(list_weight))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn upsert_steps(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<UpsertStepsRequest>,
) -> Result<Json<StepEntryResponse>, ApiError> {
    if payload.steps < 0 {
        return Err(ApiError::bad_request("steps must be non-negative"));
    }
    let entry =
        repo::upsert_steps(&state.db, user.id, payload.date_epoch_day, payload.steps).await?;
    Ok(Json(StepEntryResponse {
        date_epoch_day: entry.date_epoch_day,
        steps: entry.steps,
        updated_at: entry.updated_at,
    }))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn list_steps(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(range): Query<DayRangeQuery>,
) -> Result<Json<Vec<StepEntryResponse>>, ApiError> {
    let entries = repo::list_steps(&state.db, user.id, range.from, range.to).await?;
    Ok(Json(
        entries
            .into_iter()
            .map(|e| StepEntryResponse {
                date_epoch_day: e.date_epoch_day,
                steps: e.steps,
                updated_at: e.updated_at,
            })
            .collect(),
    ))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn add_water(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<AddWaterRequest>,
) -> Result<Json<WaterEntryResponse>, ApiError> {
    if payload.amount_ml <= 0 {
        return Err(ApiError::bad_request("amount_ml must be positive"));
    }
    let entry =
        repo::add_water(&state.db, user.id, payload.date_epoch_day, payload.amount_ml).await?;
    Ok(Json(WaterEntryResponse {
        id: entry.id,
        date_epoch_day: entry.date_epoch_day,
        amount_ml: entry.amount_ml,
        created_at: entry.created_at,
    }))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn water_day(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(q): Query<WaterDayQuery>,
) -> Result<Json<WaterDayResponse>, ApiError> {
    let entries = repo::list_water_for_day(&state.db, user.id, q.date_epoch_day).await?;
    let total_ml = entries.iter().map(|e| e.amount_ml as i64).sum();
    Ok(Json(WaterDayResponse {
        date_epoch_day: q.date_epoch_day,
        total_ml,
        entries: entries
            .into_iter()
            .map(|e| WaterEntryResponse {
                id: e.id,
                date_epoch_day: e.date_epoch_day,
                amount_ml: e.amount_ml,
                created_at: e.created_at,
            })
            .collect(),
    }))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn upsert_weight(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<UpsertWeightRequest>,
) -> Result<Json<WeightEntryResponse>, ApiError> {
    if !payload.weight_kg.is_finite() || payload.weight_kg <= 0.0 {
        return Err(ApiError::bad_request("weight_kg must be positive"));
    }
    let entry =
        repo::upsert_weight(&state.db, user.id, payload.date_epoch_day, payload.weight_kg).await?;
    Ok(Json(WeightEntryResponse {
        date_epoch_day: entry.date_epoch_day,
        weight_kg: entry.weight_kg,
        updated_at: entry.updated_at,
    }))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn list_weight(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(range): Query<DayRangeQuery>,
) -> Result<Json<Vec<WeightEntryResponse>>, ApiError> {
    let entries = repo::list_weight(&state.db, user.id, range.from, range.to).await?;
    Ok(Json(
        entries
            .into_iter()
            .map(|e| WeightEntryResponse {
                date_epoch_day: e.date_epoch_day,
                weight_kg: e.weight_kg,
                updated_at: e.updated_at,
            })
            .collect(),
    ))
}
