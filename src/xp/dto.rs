use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Deserialize)]
pub struct XpEventRequest {
    pub date_epoch_day: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub points: i32,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Serialize)]
pub struct XpEventResponse {
    pub id: i64,
    pub date_epoch_day: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub points: i32,
    pub note: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct XpSummaryResponse {
    pub total_points: i64,
    pub level: i64,
}

#[derive(Debug, Deserialize)]
pub struct UnlockAchievementRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct AchievementResponse {
    pub code: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
