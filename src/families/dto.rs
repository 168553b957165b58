use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Deserialize)]
pub struct CreateFamilyRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinFamilyRequest {
    pub family_name: String,
}

#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub login: String,
}

#[derive(Debug, Serialize)]
pub struct FamilyMemberResponse {
    pub user_id: i64,
    pub login: String,
    #[serde(with = "time::serde::rfc3339")]
    pub joined_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct FamilyResponse {
    pub id: i64,
    pub name: String,
    pub admin_user_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub members: Vec<FamilyMemberResponse>,
}
