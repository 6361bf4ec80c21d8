//! Azure AD token acquisition
//!
//! Tokens come from the v1 `oauth2/token` endpoint of the cloud's authority,
//! using the client-credentials grant for service principals and the
//! resource-owner password grant (with the Azure CLI public client) for user
//! sign-in. A token is cached until shortly before it expires.

use crate::error::{AzureError, Result};
use armflow_cloud::AuthMode;
use armflow_cloud::credentials::PUBLIC_CLIENT_ID;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;

/// Refresh this many seconds before the token expires
const EXPIRY_MARGIN_SECS: i64 = 300;

/// Lifetime assumed when the token response omits `expires_in`
const DEFAULT_LIFETIME_SECS: i64 = 3600;

/// Tenant used for username/password sign-in
const PASSWORD_TENANT: &str = "common";

struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Bearer token source for one sign-in
pub struct TokenProvider {
    http: reqwest::Client,
    token_url: String,
    resource: String,
    mode: AuthMode,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(http: reqwest::Client, authority: &str, resource: &str, mode: AuthMode) -> Self {
        let tenant = match &mode {
            AuthMode::ServicePrincipal { tenant, .. } => tenant.as_str(),
            AuthMode::Password { .. } => PASSWORD_TENANT,
        };
        Self {
            http,
            token_url: format!("{}/{}/oauth2/token", authority.trim_end_matches('/'), tenant),
            resource: resource.to_string(),
            mode,
            cached: Mutex::new(None),
        }
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// A valid access token, fetched on first use and after expiry
    pub async fn token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref()
            && token.expires_at > Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS)
        {
            return Ok(token.access_token.clone());
        }

        let fresh = self.request_token().await?;
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access_token)
    }

    async fn request_token(&self) -> Result<CachedToken> {
        let form: Vec<(&str, &str)> = match &self.mode {
            AuthMode::ServicePrincipal {
                client_id, secret, ..
            } => vec![
                ("grant_type", "client_credentials"),
                ("client_id", client_id.as_str()),
                ("client_secret", secret.as_str()),
                ("resource", self.resource.as_str()),
            ],
            AuthMode::Password { username, password } => vec![
                ("grant_type", "password"),
                ("client_id", PUBLIC_CLIENT_ID),
                ("username", username.as_str()),
                ("password", password.as_str()),
                ("resource", self.resource.as_str()),
            ],
        };

        tracing::debug!(url = %self.token_url, "Requesting access token");

        let response = self.http.post(&self.token_url).form(&form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<TokenErrorResponse>(&body)
                .map(|e| match e.error_description {
                    Some(description) => format!("{}: {}", e.error, description),
                    None => e.error,
                })
                .unwrap_or_else(|_| format!("HTTP {}", status));
            return Err(AzureError::TokenRequest(message));
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| AzureError::InvalidResponse(format!("token response: {}", e)))?;

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: expiry(Utc::now(), token.expires_in.seconds()),
        })
    }
}

/// When a token issued at `now` expires; lifetimes out of range fall back to
/// the default
fn expiry(now: DateTime<Utc>, lifetime_secs: i64) -> DateTime<Utc> {
    Duration::try_seconds(lifetime_secs)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .or_else(|| now.checked_add_signed(Duration::seconds(DEFAULT_LIFETIME_SECS)))
        .unwrap_or(now)
}

// ============ API Types ============

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: ExpiresIn,
}

/// The v1 endpoint sends `expires_in` as a string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExpiresIn {
    Seconds(i64),
    Text(String),
}

impl Default for ExpiresIn {
    fn default() -> Self {
        ExpiresIn::Seconds(DEFAULT_LIFETIME_SECS)
    }
}

impl ExpiresIn {
    fn seconds(&self) -> i64 {
        match self {
            ExpiresIn::Seconds(secs) => *secs,
            ExpiresIn::Text(text) => text.trim().parse().unwrap_or(DEFAULT_LIFETIME_SECS),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_url_per_mode() {
        let principal = TokenProvider::new(
            reqwest::Client::new(),
            "https://login.microsoftonline.com/",
            "https://management.core.windows.net/",
            AuthMode::ServicePrincipal {
                tenant: "contoso.onmicrosoft.com".to_string(),
                client_id: "app".to_string(),
                secret: "secret".to_string(),
            },
        );
        assert_eq!(
            principal.token_url(),
            "https://login.microsoftonline.com/contoso.onmicrosoft.com/oauth2/token"
        );

        let password = TokenProvider::new(
            reqwest::Client::new(),
            "https://login.microsoftonline.com",
            "https://management.core.windows.net/",
            AuthMode::Password {
                username: "ops@example.com".to_string(),
                password: "hunter2".to_string(),
            },
        );
        assert_eq!(
            password.token_url(),
            "https://login.microsoftonline.com/common/oauth2/token"
        );
    }

    #[test]
    fn test_expires_in_accepts_string_and_number() {
        let v1: TokenResponse =
            serde_json::from_str(r#"{"access_token":"a","expires_in":"3599"}"#).unwrap();
        assert_eq!(v1.expires_in.seconds(), 3599);

        let v2: TokenResponse =
            serde_json::from_str(r#"{"access_token":"a","expires_in":1800}"#).unwrap();
        assert_eq!(v2.expires_in.seconds(), 1800);

        let missing: TokenResponse = serde_json::from_str(r#"{"access_token":"a"}"#).unwrap();
        assert_eq!(missing.expires_in.seconds(), DEFAULT_LIFETIME_SECS);
    }

    #[test]
    fn test_expiry_tolerates_huge_lifetimes() {
        let now = Utc::now();
        assert_eq!(expiry(now, 3599), now + Duration::seconds(3599));

        let huge: TokenResponse =
            serde_json::from_str(r#"{"access_token":"a","expires_in":"1000000000000000"}"#)
                .unwrap();
        assert_eq!(
            expiry(now, huge.expires_in.seconds()),
            now + Duration::seconds(DEFAULT_LIFETIME_SECS)
        );
        assert_eq!(
            expiry(now, i64::MAX),
            now + Duration::seconds(DEFAULT_LIFETIME_SECS)
        );
    }
}
