use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Deserialize)]
pub struct UpsertStepsRequest {
    pub date_epoch_day: i32,
    pub steps: i32,
}

#[derive(Debug, Deserialize)]
pub struct AddWaterRequest {
    pub date_epoch_day: i32,
    pub amount_ml: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpsertWeightRequest {
    pub date_epoch_day: i32,
    pub weight_kg: f64,
}

/// Inclusive day range for list queries.
#[derive(Debug, Deserialize)]
pub struct DayRangeQuery {
    pub from: i32,
    pub to: i32,
}

#[derive(Debug, Deserialize)]
pub struct WaterDayQuery {
    pub date_epoch_day: i32,
}

#[derive(Debug, Serialize)]
pub struct StepEntryResponse {
    pub date_epoch_day: i32,
    pub steps: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct WaterEntryResponse {
    pub id: i64,
    pub date_epoch_day: i32,
    pub amount_ml: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct WaterDayResponse {
    pub date_epoch_day: i32,
    pub total_ml: i64,
    pub entries: Vec<WaterEntryResponse>,
}

#[derive(Debug, Serialize)]
pub struct WeightEntryResponse {
    pub date_epoch_day: i32,
    pub weight_kg: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
