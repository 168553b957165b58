use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age: i32,
    pub sex: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: i64,
    pub user_id: i64,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age: i32,
    pub sex: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct UserSettingsRequest {
    pub calorie_mode: String,
    pub step_goal: i32,
    pub calorie_goal_override: Option<i32>,
    pub reminders_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct UserSettingsResponse {
    pub id: i64,
    pub user_id: i64,
    pub calorie_mode: String,
    pub step_goal: i32,
    pub calorie_goal_override: Option<i32>,
    pub reminders_enabled: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
