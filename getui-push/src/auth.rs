//! `auth_sign` token acquisition.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use url::Url;

use crate::response::lenient;
use crate::{Credentials, PushError, Result, ResultCode};

/// `expire_time` values at or above this are absolute epoch milliseconds.
const EPOCH_MS_THRESHOLD: u64 = 1_000_000_000_000;

/// Lifetime assumed when the provider omits a usable `expire_time`.
const DEFAULT_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Auth token held by the client.
#[derive(Clone)]
pub struct AuthToken {
    token: String,
    expires_at: Instant,
}

impl AuthToken {
    /// Token value sent in the `authtoken` header.
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// When the token stops being accepted.
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// `true` if the token is still valid `margin` from now.
    pub fn is_fresh(&self, margin: Duration) -> bool {
        Instant::now()
            .checked_add(margin)
            .is_some_and(|deadline| self.expires_at > deadline)
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Lowercase hex SHA-256 of `app_key + timestamp + master_secret`.
pub fn sign(app_key: &str, timestamp_ms: i64, master_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(app_key.as_bytes());
    hasher.update(timestamp_ms.to_string().as_bytes());
    hasher.update(master_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Serialize)]
struct AuthSignRequest<'a> {
    sign: String,
    timestamp: String,
    appkey: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AuthSignResponse {
    result: ResultCode,
    #[serde(deserialize_with = "lenient::string")]
    expire_time: String,
    auth_token: String,
}

/// Remaining lifetime described by an `expire_time` value.
fn token_lifetime(expire_time: &str, now_ms: i64) -> Option<Duration> {
    let value: u64 = expire_time.trim().parse().ok()?;
    if value >= EPOCH_MS_THRESHOLD {
        let now_ms = u64::try_from(now_ms).unwrap_or_default();
        Some(Duration::from_millis(value.saturating_sub(now_ms)))
    } else {
        Some(Duration::from_secs(value))
    }
}

fn into_token(response: AuthSignResponse, now_ms: i64) -> Result<AuthToken> {
    if !response.result.is_ok() {
        warn!(result = %response.result, "GeTui authentication rejected");
        return Err(PushError::Auth {
            code: response.result,
            desc: None,
        });
    }

    if response.auth_token.is_empty() {
        return Err(PushError::Auth {
            code: response.result,
            desc: Some("auth_token missing from response".to_string()),
        });
    }

    let lifetime = token_lifetime(&response.expire_time, now_ms).unwrap_or_else(|| {
        warn!(expire_time = %response.expire_time, "Unusable expire_time, assuming one day");
        DEFAULT_LIFETIME
    });

    Ok(AuthToken {
        token: response.auth_token,
        expires_at: Instant::now() + lifetime,
    })
}

fn transport_failure(err: reqwest::Error) -> PushError {
    warn!(error = %err, "auth_sign request failed");
    PushError::Auth {
        code: ResultCode::Missing,
        desc: Some(PushError::from(err).to_string()),
    }
}

/// Obtain a token from `auth_sign`.
///
/// Every failure, including transport errors, is [`PushError::Auth`].
pub(crate) async fn authenticate(http: &Client, url: Url, creds: &Credentials) -> Result<AuthToken> {
    let now_ms = chrono::Utc::now().timestamp_millis();
    let body = AuthSignRequest {
        sign: sign(&creds.app_key, now_ms, &creds.master_secret),
        timestamp: now_ms.to_string(),
        appkey: &creds.app_key,
    };

    let response = http.post(url).json(&body).send().await.map_err(transport_failure)?;
    let status = response.status();
    let text = response.text().await.map_err(transport_failure)?;

    let decoded: AuthSignResponse = serde_json::from_str(&text).map_err(|e| {
        warn!(status = status.as_u16(), "Undecodable auth_sign response");
        PushError::Auth {
            code: ResultCode::Missing,
            desc: Some(format!("HTTP {}: {}", status.as_u16(), e)),
        }
    })?;

    let token = into_token(decoded, now_ms)?;
    info!(app_id = %creds.app_id, "Obtained GeTui auth token");
    Ok(token)
}
