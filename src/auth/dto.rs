use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub login: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
    pub device_id: Option<String>,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
    pub device_id: Option<String>,
}

/// Request body for logout.
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

/// Access/refresh pair returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Public part of a user.
#[derive(Debug, Serialize)]
pub struct UserMeResponse {
    pub id: i64,
    pub login: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

pub(crate) fn is_valid_login(login: &str) -> bool {
    lazy_static! {
        static ref LOGIN_RE: Regex = Regex::new(r"^[A-Za-z0-9_.-]{3,64}$").unwrap();
    }
    LOGIN_RE.is_match(login)
}

pub(crate) fn is_valid_password(password: &str) -> bool {
    (6..=128).contains(&password.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_length_bounds() {
        assert!(!is_valid_login("ab"));
        assert!(is_valid_login("abc"));
        assert!(is_valid_login(&"a".repeat(64)));
        assert!(!is_valid_login(&"a".repeat(65)));
    }

    #[test]
    fn login_rejects_whitespace_and_unicode() {
        assert!(!is_valid_login("has space"));
        assert!(!is_valid_login("котик"));
        assert!(is_valid_login("alice_01.test-x"));
    }

    #[test]
    fn password_length_bounds() {
        assert!(!is_valid_password("12345"));
        assert!(is_valid_password("123456"));
        assert!(is_valid_password(&"p".repeat(128)));
        assert!(!is_valid_password(&"p".repeat(129)));
    }
}
