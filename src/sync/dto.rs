use serde::{Deserialize, Serialize};

/// Entities an offline client may sync. Closed set: an unknown entity fails
/// deserialization instead of falling through string matching.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SyncEntity {
    Steps,
    Water,
    Weight,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    Upsert,
    Delete,
}

#[derive(Debug, Deserialize)]
pub struct SyncItem {
    pub entity: SyncEntity,
    pub action: SyncAction,
    pub payload: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct SyncBatchRequest {
    pub items: Vec<SyncItem>,
}

#[derive(Debug, Serialize)]
pub struct SyncItemResult {
    pub index: usize,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SyncBatchResponse {
    pub results: Vec<SyncItemResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_pairs_deserialize() {
        let item: SyncItem = serde_json::from_value(serde_json::json!({
            "entity": "steps",
            "action": "upsert",
            "payload": {"date_epoch_day": 20500, "steps": 8000}
        }))
        .unwrap();
        assert_eq!(item.entity, SyncEntity::Steps);
        assert_eq!(item.action, SyncAction::Upsert);
    }

    #[test]
    fn unknown_entity_is_rejected_at_parse_time() {
        let res: Result<SyncItem, _> = serde_json::from_value(serde_json::json!({
            "entity": "moods",
            "action": "upsert",
            "payload": {}
        }));
        assert!(res.is_err());
    }

    #[test]
    fn unknown_action_is_rejected_at_parse_time() {
        let res: Result<SyncItem, _> = serde_json::from_value(serde_json::json!({
            "entity": "steps",
            "action": "merge",
            "payload": {}
        }));
        assert!(res.is_err());
    }
}
