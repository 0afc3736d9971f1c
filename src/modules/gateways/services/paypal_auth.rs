use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;

use super::paypal::map_send_error;
use crate::core::{AppError, Result};

/// Tokens are treated as expired this long before PayPal says they are
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

#[derive(Debug, Deserialize)]
struct OAuthError {
    error: String,
    #[serde(default)]
    error_description: String,
}

/// Client-credentials access token for the PayPal REST API.
///
/// A token is requested when none is cached or the cached one has expired.
pub struct PaypalAuth {
    client_id: String,
    client_secret: String,
    token: RwLock<Option<AccessToken>>,
}

impl PaypalAuth {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            client_id,
            client_secret,
            token: RwLock::new(None),
        }
    }

    /// Current bearer token, requesting one from `/v1/oauth2/token` if needed
    pub async fn bearer_token(&self, client: &Client, base_url: &str) -> Result<String> {
        {
            let cached = self.token.read().await;
            if let Some(token) = cached.as_ref() {
                if token.expires_at > Utc::now() {
                    return Ok(token.value.clone());
                }
            }
        }

        let mut cached = self.token.write().await;
        // Another caller may have fetched while we waited for the write lock
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(token.value.clone());
            }
        }

        let token = self.request_token(client, base_url).await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn request_token(&self, client: &Client, base_url: &str) -> Result<AccessToken> {
        let url = format!("{}/v1/oauth2/token", base_url);

        let response = client
            .post(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header("Accept", "application/json")
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| map_send_error("oauth_token", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| map_send_error("oauth_token", e))?;

        if !status.is_success() {
            let (code, message) = match serde_json::from_str::<OAuthError>(&body) {
                Ok(err) => (err.error, err.error_description),
                Err(_) => (status.as_u16().to_string(), body),
            };
            tracing::error!(status = status.as_u16(), code = %code, "PayPal rejected credentials");
            return Err(AppError::gateway("oauth_token", code, message));
        }

        let parsed: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            AppError::gateway(
                "oauth_token",
                "INVALID_RESPONSE",
                format!("Failed to parse PayPal token response: {}", e),
            )
        })?;

        tracing::debug!(expires_in = parsed.expires_in, "Obtained PayPal access token");

        Ok(AccessToken {
            expires_at: token_expiry(Utc::now(), parsed.expires_in)?,
            value: parsed.access_token,
        })
    }
}

/// When a token issued at `now` with PayPal's `expires_in` stops being reused
fn token_expiry(now: DateTime<Utc>, expires_in: i64) -> Result<DateTime<Utc>> {
    let lifetime = expires_in.saturating_sub(EXPIRY_MARGIN_SECS).max(0);

    Duration::try_seconds(lifetime)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| {
            AppError::gateway(
                "oauth_token",
                "INVALID_RESPONSE",
                format!("Token lifetime out of range: {} seconds", expires_in),
            )
        })
}

impl std::fmt::Debug for PaypalAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaypalAuth")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}
