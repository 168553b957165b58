use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AdsConfigQuery {
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(rename = "appVersion", default = "default_app_version")]
    pub app_version: i32,
    #[serde(default = "default_network")]
    pub network: String,
}

fn default_platform() -> String {
    "android".into()
}

fn default_app_version() -> i32 {
    1
}

fn default_network() -> String {
    "yandex".into()
}

/// `units` maps placement -> ad unit id for everything enabled and within
/// the caller's app-version window.
#[derive(Debug, Serialize)]
pub struct AdsConfigResponse {
    pub network: String,
    pub units: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct AdUnitUpsertRequest {
    pub network: String,
    pub placement: String,
    pub ad_unit_id: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub android_min_version: Option<i32>,
    pub android_max_version: Option<i32>,
}

fn default_enabled() -> bool {
    true
}
