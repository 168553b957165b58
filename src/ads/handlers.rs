use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{error::ApiError, state::AppState};

use super::dto::{AdsConfigQuery, AdsConfigResponse};
use super::repo::AdUnit;

pub fn routes() -> Router<AppState> {
    Router::new().route("/ads/config", get(ads_config))
}

/// Public, unauthenticated: the client fetches ad placements at startup.
#[instrument(skip(state))]
pub async fn ads_config(
    State(state): State<AppState>,
    Query(q): Query<AdsConfigQuery>,
) -> Result<Json<AdsConfigResponse>, ApiError> {
    // platform reserved for future use
    let _ = &q.platform;

    let units = AdUnit::list_enabled(&state.db, &q.network).await?;
    let units: BTreeMap<String, String> = units
        .into_iter()
        .filter(|u| u.matches_version(q.app_version))
        .map(|u| (u.placement, u.ad_unit_id))
        .collect();

    Ok(Json(AdsConfigResponse {
        network: q.network,
        units,
    }))
}
