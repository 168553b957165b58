use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{dto::StatusResponse, jwt::AuthUser, repo::User},
    error::ApiError,
    state::AppState,
};

use super::dto::{
    CreateFamilyRequest, FamilyMemberResponse, FamilyResponse, InviteRequest, JoinFamilyRequest,
};
use super::repo::{Family, FamilyMember};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/families", post(create_family))
        .route("/families/me", get(my_family))
        .route("/families/me/members", get(my_family_members))
        .route("/families/me/invite", post(invite))
        .route("/families/join", post(join_family))
        .route("/families/leave", post(leave_family))
}

async fn family_response(state: &AppState, family: Family) -> Result<FamilyResponse, ApiError> {
    let members = FamilyMember::list_with_logins(&state.db, family.id).await?;
    Ok(FamilyResponse {
        id: family.id,
        name: family.name,
        admin_user_id: family.admin_user_id,
        created_at: family.created_at,
        members: members
            .into_iter()
            .map(|m| FamilyMemberResponse {
                user_id: m.user_id,
                login: m.login,
                joined_at: m.joined_at,
            })
            .collect(),
    })
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn create_family(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateFamilyRequest>,
) -> Result<Json<FamilyResponse>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("Family name must not be empty"));
    }
    if Family::find_by_name(&state.db, &payload.name).await?.is_some() {
        return Err(ApiError::conflict("Family with this name already exists"));
    }
    if FamilyMember::find_by_user(&state.db, user.id).await?.is_some() {
        return Err(ApiError::conflict("User is already in a family"));
    }

    // The unique constraint on name decides creation races.
    let family = match Family::create_with_admin(&state.db, &payload.name, user.id).await {
        Ok(f) => f,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(ApiError::conflict("Family with this name already exists"))
        }
        Err(e) => return Err(e.into()),
    };
    info!(family_id = family.id, "family created");
    Ok(Json(family_response(&state, family).await?))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn my_family(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<FamilyResponse>, ApiError> {
    let member = FamilyMember::find_by_user(&state.db, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User is not in a family"))?;
    let family = Family::find_by_id(&state.db, member.family_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Family not found"))?;
    Ok(Json(family_response(&state, family).await?))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn my_family_members(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<FamilyMemberResponse>>, ApiError> {
    let member = FamilyMember::find_by_user(&state.db, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User is not in a family"))?;
    let members = FamilyMember::list_with_logins(&state.db, member.family_id).await?;
    Ok(Json(
        members
            .into_iter()
            .map(|m| FamilyMemberResponse {
                user_id: m.user_id,
                login: m.login,
                joined_at: m.joined_at,
            })
            .collect(),
    ))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn join_family(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<JoinFamilyRequest>,
) -> Result<Json<FamilyResponse>, ApiError> {
    if FamilyMember::find_by_user(&state.db, user.id).await?.is_some() {
        return Err(ApiError::conflict("User is already in a family"));
    }
    let family = Family::find_by_name(&state.db, &payload.family_name)
        .await?
        .ok_or_else(|| ApiError::not_found("Family not found"))?;

    match FamilyMember::add(&state.db, family.id, user.id).await {
        Ok(_) => {}
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(ApiError::conflict("User is already in a family"))
        }
        Err(e) => return Err(e.into()),
    }
    info!(family_id = family.id, "user joined family");
    Ok(Json(family_response(&state, family).await?))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn leave_family(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<StatusResponse>, ApiError> {
    let member = FamilyMember::find_by_user(&state.db, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User is not in a family"))?;
    let family = Family::find_by_id(&state.db, member.family_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Family not found"))?;

    let members = FamilyMember::list_with_logins(&state.db, family.id).await?;
    if members.len() == 1 {
        Family::delete(&state.db, family.id).await?;
        info!(family_id = family.id, "last member left, family deleted");
        return Ok(Json(StatusResponse { status: "left" }));
    }

    let new_admin = if family.admin_user_id == user.id {
        // Oldest remaining member inherits the admin role.
        let successor = members
            .iter()
            .find(|m| m.user_id != user.id)
            .ok_or_else(|| ApiError::bad_request("Cannot leave family as the sole admin"))?;
        Some(successor.user_id)
    } else {
        None
    };

    FamilyMember::leave_with_handover(&state.db, family.id, user.id, new_admin).await?;
    info!(family_id = family.id, "user left family");
    Ok(Json(StatusResponse { status: "left" }))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn invite(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<InviteRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let family = Family::find_by_admin(&state.db, user.id)
        .await?
        .ok_or_else(|| ApiError::forbidden("User is not an admin of any family"))?;

    let target = User::find_by_login(&state.db, &payload.login)
        .await?
        .ok_or_else(|| ApiError::not_found("Target user not found"))?;

    if FamilyMember::find_by_user(&state.db, target.id).await?.is_some() {
        return Err(ApiError::conflict("Target user is already in a family"));
    }

    FamilyMember::add(&state.db, family.id, target.id).await?;
    info!(family_id = family.id, target_user_id = target.id, "user invited");
    Ok(Json(StatusResponse { status: "invited" }))
}
