//! Wire types for the hosted auth service's REST API (`/auth/v1`).
//!
//! Kept free of any HTTP client so the conversions can be tested natively.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Session, SignUpMetadata};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoTrueUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub app_metadata: Map<String, Value>,
    #[serde(default)]
    pub user_metadata: Map<String, Value>,
}

/// Body of a successful `/token` call (and of `/signup` when no
/// confirmation is required)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: GoTrueUser,
}

/// `/signup` answers with a full session when confirmation is disabled and
/// with the bare user otherwise
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponse {
    Session(TokenResponse),
    User(GoTrueUser),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PasswordCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub data: SignUpMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Error body; the service is not consistent about which field it fills
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GoTrueErrorBody {
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl GoTrueErrorBody {
    pub fn into_message(self) -> Option<String> {
        [self.msg, self.message, self.error_description, self.error]
            .into_iter()
            .flatten()
            .map(|m| m.trim().to_string())
            .find(|m| !m.is_empty())
    }
}

/// Tokens carried back in the URL fragment after an OAuth redirect
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RedirectTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    pub expires_at: Option<i64>,
}

/// Outcome of inspecting a location fragment
#[derive(Debug, Clone, PartialEq)]
pub enum RedirectFragment {
    Tokens(RedirectTokens),
    /// The provider reported a failure (`error_description` or `error`)
    Error(String),
}

/// Parse `#access_token=...&refresh_token=...` style fragments.
///
/// Returns `None` when the fragment carries neither tokens nor an error.
pub fn parse_redirect_fragment(fragment: &str) -> Option<RedirectFragment> {
    let raw = fragment.trim_start_matches('#');
    if raw.is_empty() {
        return None;
    }

    let params: Vec<(String, String)> = url::form_urlencoded::parse(raw.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let get = |key: &str| {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .filter(|v| !v.is_empty())
    };

    if let Some(error) = get("error_description").or_else(|| get("error")) {
        return Some(RedirectFragment::Error(error));
    }

    let access_token = get("access_token")?;
    Some(RedirectFragment::Tokens(RedirectTokens {
        access_token,
        refresh_token: get("refresh_token"),
        expires_in: get("expires_in").and_then(|v| v.parse().ok()),
        expires_at: get("expires_at").and_then(|v| v.parse().ok()),
    }))
}

/// Build the browser URL that starts a redirect-based sign-in
pub fn authorize_url(base_url: &str, provider: &str, redirect_to: &str) -> String {
    let query: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("provider", provider)
        .append_pair("redirect_to", redirect_to)
        .finish();
    format!("{}/auth/v1/authorize?{}", base_url.trim_end_matches('/'), query)
}

fn resolve_expiry(expires_at: Option<i64>, expires_in: Option<i64>, now_secs: i64) -> Option<i64> {
    expires_at.or_else(|| expires_in.map(|secs| now_secs + secs))
}

impl Session {
    /// Combine a user record with the tokens that authenticate it
    pub fn from_user(
        user: GoTrueUser,
        access_token: String,
        refresh_token: Option<String>,
        expires_at: Option<i64>,
    ) -> Session {
        let provider = user
            .app_metadata
            .get("provider")
            .and_then(Value::as_str)
            .map(str::to_string);
        Session {
            user_id: user.id,
            email: user.email.unwrap_or_default(),
            provider,
            app_metadata: user.app_metadata,
            user_metadata: user.user_metadata,
            access_token,
            refresh_token,
            expires_at,
        }
    }

    pub fn from_token_response(response: TokenResponse, now_secs: i64) -> Session {
        let expires_at = resolve_expiry(response.expires_at, response.expires_in, now_secs);
        Session::from_user(response.user, response.access_token, response.refresh_token, expires_at)
    }
}

impl RedirectTokens {
    pub fn expires_at(&self, now_secs: i64) -> Option<i64> {
        resolve_expiry(self.expires_at, self.expires_in, now_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_fragment_with_tokens() {
        let parsed = parse_redirect_fragment(
            "#access_token=abc.def&expires_in=3600&refresh_token=r1&token_type=bearer",
        );
        assert_eq!(
            parsed,
            Some(RedirectFragment::Tokens(RedirectTokens {
                access_token: "abc.def".to_string(),
                refresh_token: Some("r1".to_string()),
                expires_in: Some(3600),
                expires_at: None,
            }))
        );
    }

    #[test]
    fn test_parse_fragment_with_error() {
        let parsed = parse_redirect_fragment(
            "#error=access_denied&error_description=User+denied+access",
        );
        assert_eq!(parsed, Some(RedirectFragment::Error("User denied access".to_string())));
    }

    #[test]
    fn test_parse_fragment_without_auth_data() {
        assert_eq!(parse_redirect_fragment(""), None);
        assert_eq!(parse_redirect_fragment("#donate"), None);
    }

    #[test]
    fn test_signup_response_variants() {
        let with_session: SignUpResponse = serde_json::from_value(json!({
            "access_token": "t",
            "expires_in": 60,
            "refresh_token": "r",
            "user": {"id": "u1", "email": "a@b.com"}
        }))
        .unwrap();
        assert!(matches!(with_session, SignUpResponse::Session(_)));

        let pending: SignUpResponse = serde_json::from_value(json!({
            "id": "u1",
            "email": "a@b.com",
            "user_metadata": {"full_name": "Ada"}
        }))
        .unwrap();
        assert!(matches!(pending, SignUpResponse::User(_)));
    }

    #[test]
    fn test_session_from_token_response() {
        let response: TokenResponse = serde_json::from_value(json!({
            "access_token": "t",
            "expires_in": 60,
            "user": {
                "id": "u1",
                "email": "a@b.com",
                "app_metadata": {"provider": "github"}
            }
        }))
        .unwrap();

        let session = Session::from_token_response(response, 1_000);
        assert_eq!(session.email, "a@b.com");
        assert_eq!(session.provider_label(), "github");
        assert_eq!(session.expires_at, Some(1_060));
    }

    #[test]
    fn test_error_body_message_priority() {
        let body: GoTrueErrorBody = serde_json::from_value(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        }))
        .unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Invalid login credentials"));

        let empty: GoTrueErrorBody = serde_json::from_value(json!({"msg": " "})).unwrap();
        assert_eq!(empty.into_message(), None);
    }

    #[test]
    fn test_authorize_url_encodes_redirect() {
        let url = authorize_url("https://x.supabase.co/", "github", "http://localhost:8080/");
        assert_eq!(
            url,
            "https://x.supabase.co/auth/v1/authorize?provider=github&redirect_to=http%3A%2F%2Flocalhost%3A8080%2F"
        );
    }
}
