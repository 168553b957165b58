use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            is_valid_login, is_valid_password, LoginRequest, LogoutRequest, RefreshRequest,
            RegisterRequest, StatusResponse, TokenPair, UserMeResponse,
        },
        jwt::{AuthUser, JwtKeys},
        password,
        repo::{CreateUserError, User},
        session::{self, RotateError},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/users/me", get(get_me))
}

/// Argon2 is deliberately slow; keep it off the async workers.
async fn hash_blocking(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(e.into()))?
        .map_err(ApiError::Internal)
}

async fn verify_blocking(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
        .await
        .map_err(|e| ApiError::Internal(e.into()))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<UserMeResponse>, ApiError> {
    if !is_valid_login(&payload.login) {
        warn!("invalid login format");
        return Err(ApiError::bad_request("Invalid login"));
    }
    if !is_valid_password(&payload.password) {
        warn!("invalid password length");
        return Err(ApiError::bad_request("Invalid password"));
    }

    let hash = hash_blocking(payload.password).await?;

    // The unique constraint decides races; a pre-check would only soften
    // the common case without making it atomic.
    let user = match User::create(&state.db, &payload.login, &hash).await {
        Ok(u) => u,
        Err(CreateUserError::LoginTaken) => {
            warn!(login = %payload.login, "login already exists");
            return Err(ApiError::LoginTaken);
        }
        Err(CreateUserError::Db(e)) => return Err(e.into()),
    };

    info!(user_id = user.id, login = %user.login, "user registered");
    Ok(Json(UserMeResponse {
        id: user.id,
        login: user.login,
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let user = User::find_by_login(&state.db, &payload.login).await?;

    // Unknown login and wrong password take the same exit: one 401 body,
    // no user enumeration.
    let Some(user) = user else {
        warn!("login attempt for unknown login");
        return Err(ApiError::InvalidCredentials);
    };
    if !verify_blocking(payload.password, user.password_hash.clone()).await? {
        warn!(user_id = user.id, "login attempt with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let (refresh_token, _session) = session::issue(
        &state.db,
        user.id,
        payload.device_id.as_deref(),
        state.config.jwt.refresh_ttl_seconds,
    )
    .await?;

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(user.id).map_err(ApiError::Internal)?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(TokenPair {
        access_token,
        refresh_token,
    }))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let rotated = session::rotate(
        &state.db,
        &payload.refresh_token,
        payload.device_id.as_deref(),
        state.config.jwt.refresh_ttl_seconds,
    )
    .await;

    let (refresh_token, new_session) = match rotated {
        Ok(pair) => pair,
        // Expired and invalid are distinct inside the manager but must be
        // the same 401 on the wire.
        Err(RotateError::Invalid) | Err(RotateError::Expired) => {
            return Err(ApiError::InvalidRefresh)
        }
        Err(RotateError::Db(e)) => return Err(e.into()),
    };

    // Rotation succeeds only for a session whose owner still exists, so
    // the subject can be signed directly.
    let keys = JwtKeys::from_ref(&state);
    let access_token = keys
        .sign_access(new_session.user_id)
        .map_err(ApiError::Internal)?;

    Ok(Json(TokenPair {
        access_token,
        refresh_token,
    }))
}

#[instrument(skip(state, payload))]
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    // Always "ok", whether or not the token matched anything.
    session::revoke(&state.db, &payload.refresh_token).await?;
    Ok(Json(StatusResponse { status: "ok" }))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<UserMeResponse> {
    Json(UserMeResponse {
        id: user.id,
        login: user.login,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_pair_serializes_both_fields() {
        let pair = TokenPair {
            access_token: "aaa.bbb.ccc".into(),
            refresh_token: "opaque".into(),
        };
        let json = serde_json::to_value(&pair).unwrap();
        assert_eq!(json["access_token"], "aaa.bbb.ccc");
        assert_eq!(json["refresh_token"], "opaque");
    }

    #[test]
    fn me_response_shape() {
        let resp = UserMeResponse {
            id: 1,
            login: "alice".into(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json, serde_json::json!({"id": 1, "login": "alice"}));
    }
}
