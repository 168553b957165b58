use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::{auth::jwt::AuthUser, entries::repo as entries, error::ApiError, state::AppState};

use super::dto::{
    SyncAction, SyncBatchRequest, SyncBatchResponse, SyncEntity, SyncItem, SyncItemResult,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/sync/batch", post(sync_batch))
}

#[derive(Debug, Deserialize)]
struct StepsPayload {
    date_epoch_day: i32,
    steps: i32,
}

#[derive(Debug, Deserialize)]
struct WaterPayload {
    date_epoch_day: i32,
    amount_ml: i32,
}

#[derive(Debug, Deserialize)]
struct WeightPayload {
    date_epoch_day: i32,
    weight_kg: f64,
}

#[derive(Debug, Deserialize)]
struct DeletePayload {
    date_epoch_day: i32,
}

/// The operations a batch item can resolve to. The `(entity, action)` pair
/// is mapped here exactly once; the match below is exhaustive, so adding a
/// variant without handling it is a compile error.
#[derive(Debug)]
enum SyncOp {
    UpsertSteps(StepsPayload),
    DeleteSteps(DeletePayload),
    AddWater(WaterPayload),
    DeleteWaterDay(DeletePayload),
    UpsertWeight(WeightPayload),
    DeleteWeight(DeletePayload),
}

impl SyncOp {
    fn resolve(item: SyncItem) -> Result<Self, serde_json::Error> {
        let SyncItem {
            entity,
            action,
            payload,
        } = item;
        Ok(match (entity, action) {
            (SyncEntity::Steps, SyncAction::Upsert) => {
                Self::UpsertSteps(serde_json::from_value(payload)?)
            }
            (SyncEntity::Steps, SyncAction::Delete) => {
                Self::DeleteSteps(serde_json::from_value(payload)?)
            }
            (SyncEntity::Water, SyncAction::Upsert) => {
                Self::AddWater(serde_json::from_value(payload)?)
            }
            (SyncEntity::Water, SyncAction::Delete) => {
                Self::DeleteWaterDay(serde_json::from_value(payload)?)
            }
            (SyncEntity::Weight, SyncAction::Upsert) => {
                Self::UpsertWeight(serde_json::from_value(payload)?)
            }
            (SyncEntity::Weight, SyncAction::Delete) => {
                Self::DeleteWeight(serde_json::from_value(payload)?)
            }
        })
    }

    async fn apply(self, state: &AppState, user_id: i64) -> Result<(), String> {
        let db = &state.db;
        let res = match self {
            Self::UpsertSteps(p) => {
                if p.steps < 0 {
                    return Err("steps must be non-negative".into());
                }
                entries::upsert_steps(db, user_id, p.date_epoch_day, p.steps)
                    .await
                    .map(|_| ())
            }
            Self::DeleteSteps(p) => entries::delete_steps(db, user_id, p.date_epoch_day).await,
            Self::AddWater(p) => {
                if p.amount_ml <= 0 {
                    return Err("amount_ml must be positive".into());
                }
                entries::add_water(db, user_id, p.date_epoch_day, p.amount_ml)
                    .await
                    .map(|_| ())
            }
            Self::DeleteWaterDay(p) => {
                entries::delete_water_for_day(db, user_id, p.date_epoch_day).await
            }
            Self::UpsertWeight(p) => {
                if !p.weight_kg.is_finite() || p.weight_kg <= 0.0 {
                    return Err("weight_kg must be positive".into());
                }
                entries::upsert_weight(db, user_id, p.date_epoch_day, p.weight_kg)
                    .await
                    .map(|_| ())
            }
            Self::DeleteWeight(p) => entries::delete_weight(db, user_id, p.date_epoch_day).await,
        };
        res.map_err(|e| {
            warn!(error = %e, "sync item failed against database");
            "storage error".to_string()
        })
    }
}

/// Apply a batch of offline changes in order. One bad item does not abort
/// the batch; the response reports per-item outcomes.
#[instrument(skip_all, fields(user_id = user.id, items = payload.items.len()))]
pub async fn sync_batch(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<SyncBatchRequest>,
) -> Result<Json<SyncBatchResponse>, ApiError> {
    if payload.items.len() > 500 {
        return Err(ApiError::bad_request("Batch too large"));
    }

    let mut results = Vec::with_capacity(payload.items.len());
    for (index, item) in payload.items.into_iter().enumerate() {
        let outcome = match SyncOp::resolve(item) {
            Ok(op) => op.apply(&state, user.id).await,
            Err(e) => Err(format!("bad payload: {e}")),
        };
        results.push(match outcome {
            Ok(()) => SyncItemResult {
                index,
                status: "applied",
                error: None,
            },
            Err(msg) => SyncItemResult {
                index,
                status: "error",
                error: Some(msg),
            },
        });
    }

    Ok(Json(SyncBatchResponse { results }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_maps_each_pair_to_an_op() {
        let op = SyncOp::resolve(SyncItem {
            entity: SyncEntity::Weight,
            action: SyncAction::Upsert,
            payload: serde_json::json!({"date_epoch_day": 20500, "weight_kg": 81.5}),
        })
        .unwrap();
        assert!(matches!(op, SyncOp::UpsertWeight(_)));

        let op = SyncOp::resolve(SyncItem {
            entity: SyncEntity::Water,
            action: SyncAction::Delete,
            payload: serde_json::json!({"date_epoch_day": 20500}),
        })
        .unwrap();
        assert!(matches!(op, SyncOp::DeleteWaterDay(_)));
    }

    #[test]
    fn resolve_rejects_mismatched_payload() {
        let res = SyncOp::resolve(SyncItem {
            entity: SyncEntity::Steps,
            action: SyncAction::Upsert,
            payload: serde_json::json!({"weight_kg": 81.5}),
        });
        assert!(res.is_err());
    }
}
