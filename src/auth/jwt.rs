use std::time::Duration;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};

use crate::{
    auth::repo::User,
    config::JwtConfig,
    error::ApiError,
    state::AppState,
};

/// Only access tokens are JWTs; refresh tokens are opaque random strings
/// handled by the session manager. The variant is still an enum so that a
/// token carrying any other `type` fails the explicit kind check.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT payload. `sub` is the stringified numeric user id.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
    #[serde(rename = "type")]
    pub kind: TokenKind,
}

/// Signing/verification keys plus the access TTL, derived once from config.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub access_ttl: Duration,
}

impl JwtKeys {
    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            access_ttl: Duration::from_secs(cfg.access_ttl_seconds.max(0) as u64),
        }
    }

    pub fn sign_access(&self, user_id: i64) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.access_ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            kind: TokenKind::Access,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, "access token signed");
        Ok(token)
    }

    /// Verify signature, structure, expiry and token type; return the
    /// subject user id. Purely stateless.
    pub fn verify_access(&self, token: &str) -> anyhow::Result<(i64, Claims)> {
        let mut validation = Validation::default();
        // Zero leeway keeps the expiry boundary exact: a token is rejected
        // as soon as now > exp.
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        if data.claims.kind != TokenKind::Access {
            anyhow::bail!("not an access token");
        }
        let user_id: i64 = data.claims.sub.parse()?;
        debug!(user_id, "access token verified");
        Ok((user_id, data.claims))
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from_config(&state.config.jwt)
    }
}

/// Extractor behind every protected endpoint: validates the bearer token and
/// resolves the subject to an existing user row. A subject pointing at a
/// deleted user is unauthorized, not a server error.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        let keys = JwtKeys::from_ref(state);
        let (user_id, _claims) = keys.verify_access(token).map_err(|e| {
            warn!(error = %e, "invalid or expired access token");
            ApiError::Unauthorized
        })?;

        let user = User::find_by_id(&state.db, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or(ApiError::Unauthorized)?;

        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn make_keys() -> JwtKeys {
        JwtKeys::from_config(&AppConfig::for_tests().jwt)
    }

    fn sign_raw(keys: &JwtKeys, claims: &Claims) -> String {
        encode(&Header::default(), claims, &keys.encoding).expect("encode")
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = make_keys();
        let token = keys.sign_access(42).expect("sign access");
        let (user_id, claims) = keys.verify_access(&token).expect("verify");
        assert_eq!(user_id, 42);
        assert_eq!(claims.kind, TokenKind::Access);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let keys = make_keys();
        let other = JwtKeys::from_config(&crate::config::JwtConfig {
            secret: "another-secret".into(),
            access_ttl_seconds: 300,
            refresh_ttl_seconds: 3600,
        });
        let token = keys.sign_access(1).expect("sign");
        assert!(other.verify_access(&token).is_err());
    }

    #[test]
    fn verify_rejects_garbage() {
        let keys = make_keys();
        assert!(keys.verify_access("not.a.jwt").is_err());
        assert!(keys.verify_access("").is_err());
    }

    #[test]
    fn verify_rejects_refresh_kind() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        let claims = Claims {
            sub: "1".into(),
            iat: now,
            exp: now + 300,
            kind: TokenKind::Refresh,
        };
        let token = sign_raw(&keys, &claims);
        let err = keys.verify_access(&token).unwrap_err();
        assert!(err.to_string().contains("not an access token"));
    }

    #[test]
    fn token_is_valid_just_before_expiry() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        let claims = Claims {
            sub: "7".into(),
            iat: now,
            // 5s of headroom so the test is not racing the clock
            exp: now + 5,
            kind: TokenKind::Access,
        };
        let token = sign_raw(&keys, &claims);
        let (user_id, _) = keys.verify_access(&token).expect("still valid");
        assert_eq!(user_id, 7);
    }

    #[test]
    fn token_is_invalid_after_expiry() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        let claims = Claims {
            sub: "7".into(),
            iat: now.saturating_sub(10),
            exp: now.saturating_sub(2),
            kind: TokenKind::Access,
        };
        let token = sign_raw(&keys, &claims);
        assert!(keys.verify_access(&token).is_err());
    }

    #[test]
    fn verify_rejects_non_numeric_subject() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        let claims = Claims {
            sub: "alice".into(),
            iat: now,
            exp: now + 300,
            kind: TokenKind::Access,
        };
        let token = sign_raw(&keys, &claims);
        assert!(keys.verify_access(&token).is_err());
    }
}
