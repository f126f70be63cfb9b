//! Account sign-in, sign-up and session refresh against the hosted auth
//! service. Sessions are plain values; callers decide where they live.

use crate::client::{ApiResult, CricketApi};
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now.timestamp() >= at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    SignedIn(Session),
    /// The project requires email confirmation; no session until then.
    ConfirmationRequired { email: String },
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .or_else(|| self.expires_in.map(|secs| now.timestamp() + secs));
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Token(TokenResponse),
    User(AuthUser),
}

impl CricketApi {
    pub async fn sign_in(&self, email: &str, password: &str) -> ApiResult<Session> {
        debug!("signing in {email}");
        self.token_grant("password", json!({ "email": email, "password": password }))
            .await
    }

    pub async fn refresh_session(&self, refresh_token: &str) -> ApiResult<Session> {
        debug!("refreshing session");
        self.token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> ApiResult<SignUpOutcome> {
        let url = self.auth_url("signup");
        debug!("signing up {email}");
        let request = self
            .authorized(self.http().post(&url), None)
            .json(&json!({ "email": email, "password": password }));
        let response: SignUpResponse = self.send(request, &url).await?;
        Ok(match response {
            SignUpResponse::Token(token) => SignUpOutcome::SignedIn(token.into_session(Utc::now())),
            SignUpResponse::User(user) => SignUpOutcome::ConfirmationRequired {
                email: user.email.unwrap_or_else(|| email.to_owned()),
            },
        })
    }

    /// Revoke the session server-side. The caller clears its own copy
    /// whether or not this succeeds.
    pub async fn sign_out(&self, session: &Session) -> ApiResult<()> {
        let url = self.auth_url("logout");
        let request = self.authorized(self.http().post(&url), Some(session));
        self.execute(request, &url).await?;
        Ok(())
    }

    async fn token_grant(&self, grant_type: &str, body: serde_json::Value) -> ApiResult<Session> {
        let url = self.auth_url(&format!("token?grant_type={grant_type}"));
        let request = self.authorized(self.http().post(&url), None).json(&body);
        let token: TokenResponse = self.send(request, &url).await?;
        Ok(token.into_session(Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session(expires_at: Option<i64>) -> Session {
        Session {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_at,
            user: AuthUser { id: "u1".into(), email: None },
        }
    }

    #[test]
    fn test_session_expiry() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert!(session(Some(1_700_000_000)).is_expired(now));
        assert!(!session(Some(1_700_000_001)).is_expired(now));
        assert!(!session(None).is_expired(now));
    }

    #[test]
    fn test_token_without_expires_at_uses_expires_in() {
        let raw = r#"{"access_token":"a","refresh_token":"r","expires_in":3600,"token_type":"bearer","user":{"id":"u1","email":"x@y.z"}}"#;
        let token: TokenResponse = serde_json::from_str(raw).unwrap();
        let now = Utc.timestamp_opt(1_000, 0).unwrap();
        assert_eq!(token.into_session(now).expires_at, Some(4_600));
    }

    #[test]
    fn test_signup_without_token_needs_confirmation() {
        let raw = r#"{"id":"u9","email":"new@example.com","confirmation_sent_at":"2025-01-01T00:00:00Z"}"#;
        let parsed: SignUpResponse = serde_json::from_str(raw).unwrap();
        assert!(matches!(parsed, SignUpResponse::User(ref u) if u.id == "u9"));
    }
}
