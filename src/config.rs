//! Client configuration
//!
//! [`OfficialOptions`] carries the account credentials and transport settings.
//! It is passed explicitly to the [`ApiRequester`](crate::requester::ApiRequester)
//! on every call and never mutated after construction.
//!
//! ```rust
//! use wechat_oa_sdk::config::OfficialOptions;
//! use wechat_oa_sdk::types::{AppId, AppSecret};
//!
//! let options = OfficialOptions::builder()
//!     .appid(AppId::new("wx1234567890abcdef").unwrap())
//!     .secret(AppSecret::new("your_secret").unwrap())
//!     .build()
//!     .unwrap();
//! assert_eq!(options.base_url(), "https://api.weixin.qq.com");
//! ```

use std::time::Duration;

use crate::error::WechatError;
use crate::types::{AppId, AppSecret};

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.weixin.qq.com";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

const ENV_APPID: &str = "WECHAT_OFFICIAL_APPID";
const ENV_SECRET: &str = "WECHAT_OFFICIAL_SECRET";
const ENV_BASE_URL: &str = "WECHAT_OFFICIAL_BASE_URL";
const ENV_TIMEOUT_SECS: &str = "WECHAT_OFFICIAL_TIMEOUT_SECS";

/// Official Account credentials and transport settings
#[derive(Debug, Clone)]
pub struct OfficialOptions {
    appid: AppId,
    secret: AppSecret,
    base_url: String,
    timeout: Duration,
    connect_timeout: Duration,
}

impl OfficialOptions {
    pub fn builder() -> OfficialOptionsBuilder {
        OfficialOptionsBuilder::default()
    }

    /// Load options from `WECHAT_OFFICIAL_*` environment variables.
    ///
    /// `WECHAT_OFFICIAL_APPID` and `WECHAT_OFFICIAL_SECRET` are required;
    /// `WECHAT_OFFICIAL_BASE_URL` and `WECHAT_OFFICIAL_TIMEOUT_SECS` are optional.
    pub fn from_env() -> Result<Self, WechatError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, WechatError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let appid = lookup(ENV_APPID)
            .ok_or_else(|| WechatError::Config(format!("{ENV_APPID} is not set")))?;
        let secret = lookup(ENV_SECRET)
            .ok_or_else(|| WechatError::Config(format!("{ENV_SECRET} is not set")))?;

        let mut builder = Self::builder()
            .appid(AppId::new(appid).map_err(WechatError::Config)?)
            .secret(AppSecret::new(secret).map_err(WechatError::Config)?);

        if let Some(url) = lookup(ENV_BASE_URL) {
            builder = builder.base_url(url);
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                WechatError::Config(format!("{ENV_TIMEOUT_SECS} must be an integer, got {raw}"))
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    pub fn appid(&self) -> &str {
        self.appid.as_str()
    }

    pub(crate) fn secret(&self) -> &str {
        self.secret.as_str()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Join an endpoint path onto the configured base URL.
    pub fn resolve(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }
}

/// Builder for [`OfficialOptions`]
#[must_use]
#[derive(Debug, Default)]
pub struct OfficialOptionsBuilder {
    appid: Option<AppId>,
    secret: Option<AppSecret>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl OfficialOptionsBuilder {
    /// Set the Official Account AppID
    pub fn appid(mut self, appid: AppId) -> Self {
        self.appid = Some(appid);
        self
    }

    /// Set the Official Account AppSecret
    pub fn secret(mut self, secret: AppSecret) -> Self {
        self.secret = Some(secret);
        self
    }

    /// Set the base URL for API calls
    ///
    /// Default: `<https://api.weixin.qq.com>`
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the total timeout for requests
    ///
    /// Default: 30 seconds
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout
    ///
    /// Default: 10 seconds
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Build the options
    ///
    /// # Errors
    /// Returns `WechatError::Config` if appid or secret is missing, or the
    /// base URL is not an http(s) URL.
    pub fn build(self) -> Result<OfficialOptions, WechatError> {
        let appid = self
            .appid
            .ok_or_else(|| WechatError::Config("appid is required".to_string()))?;
        let secret = self
            .secret
            .ok_or_else(|| WechatError::Config("secret is required".to_string()))?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(WechatError::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                base_url
            )));
        }

        Ok(OfficialOptions {
            appid,
            secret,
            base_url,
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            connect_timeout: self
                .connect_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)),
        })
    }
}
