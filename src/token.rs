//! Access token management for WeChat API
//!
//! Handles token caching and refresh for the default requester. Callers that
//! already own a token service can plug it in through [`AccessTokenProvider`].

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;

use crate::client::WechatClient;
use crate::config::OfficialOptions;
use crate::error::WechatError;
use crate::types::AccessToken;

const TOKEN_ENDPOINT: &str = "/cgi-bin/token";
/// Upper bound on a cached token's lifetime, matching the documented 7200s.
const MAX_TOKEN_TTL: Duration = Duration::from_secs(7200);

pub type TokenFuture<'a> = Pin<Box<dyn Future<Output = Result<String, WechatError>> + Send + 'a>>;

/// Supplies access tokens for the account described by `options`.
pub trait AccessTokenProvider: Send + Sync {
    fn access_token<'a>(&'a self, options: &'a OfficialOptions) -> TokenFuture<'a>;
}

struct CachedToken {
    token: AccessToken,
    expires_at: Instant,
}

impl CachedToken {
    fn new(token: AccessToken, expires_in: u64) -> Self {
        let ttl = Duration::from_secs(expires_in).min(MAX_TOKEN_TTL);
        let now = Instant::now();
        Self {
            token,
            expires_at: now.checked_add(ttl).unwrap_or(now),
        }
    }

    fn is_expired(&self, buffer: Duration) -> bool {
        Instant::now() + buffer >= self.expires_at
    }
}

type TokenSlot = Arc<Mutex<Option<CachedToken>>>;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    expires_in: u64,
    #[serde(default)]
    errcode: i32,
    #[serde(default)]
    errmsg: String,
}

/// Manages access_token lifecycle with automatic refresh
///
/// Tokens are cached per appid, so one manager can serve several accounts.
/// Each appid has its own slot lock: a refresh for one account serializes
/// callers of that account only.
pub struct TokenManager {
    client: WechatClient,
    cache: Mutex<HashMap<String, TokenSlot>>,
    refresh_buffer: Duration,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("refresh_buffer", &self.refresh_buffer)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    pub fn new(client: WechatClient) -> Self {
        Self {
            client,
            cache: Mutex::new(HashMap::new()),
            refresh_buffer: Duration::from_secs(5 * 60),
        }
    }

    pub async fn get_token(&self, options: &OfficialOptions) -> Result<String, WechatError> {
        let slot = self.slot(options.appid()).await;
        let mut entry = slot.lock().await;

        if let Some(cached) = entry.as_ref() {
            if !cached.is_expired(self.refresh_buffer) {
                return Ok(cached.token.as_str().to_string());
            }
        }

        log::debug!(
            "[WechatOfficial] refreshing access token for {}",
            options.appid()
        );
        let response = self.fetch_token(options).await?;

        if let Err(e) = WechatError::check_api(response.errcode, &response.errmsg) {
            log::warn!("[WechatOfficial] token endpoint rejected request: {}", e);
            return Err(e);
        }

        let token = AccessToken::new(response.access_token).map_err(WechatError::Token)?;

        *entry = Some(CachedToken::new(token.clone(), response.expires_in));
        Ok(token.as_str().to_string())
    }

    async fn slot(&self, appid: &str) -> TokenSlot {
        let mut cache = self.cache.lock().await;
        Arc::clone(cache.entry(appid.to_string()).or_default())
    }

    async fn fetch_token(&self, options: &OfficialOptions) -> Result<TokenResponse, WechatError> {
        let url = options.resolve(TOKEN_ENDPOINT);
        let query = [
            ("grant_type", "client_credential"),
            ("appid", options.appid()),
            ("secret", options.secret()),
        ];

        self.client.get(&url, &query).await
    }

    /// Drop the cached token for `appid`, forcing a refresh on next use.
    pub async fn invalidate(&self, appid: &str) {
        let slot = self.cache.lock().await.get(appid).cloned();
        if let Some(slot) = slot {
            *slot.lock().await = None;
        }
    }

    #[cfg(test)]
    async fn cached_appids(&self) -> Vec<String> {
        let cache = self.cache.lock().await;
        let mut appids = Vec::new();
        for (appid, slot) in cache.iter() {
            if slot.lock().await.is_some() {
                appids.push(appid.clone());
            }
        }
        appids
    }
}

impl AccessTokenProvider for TokenManager {
    fn access_token<'a>(&'a self, options: &'a OfficialOptions) -> TokenFuture<'a> {
        Box::pin(self.get_token(options))
    }
}
