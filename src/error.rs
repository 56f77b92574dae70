use thiserror::Error;

/// Transport-level failures raised while talking to the WeChat API host
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// WeChat SDK error types
#[derive(Debug, Error)]
pub enum WechatError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("WeChat API error (code={code}): {message}")]
    Api { code: i32, message: String },

    #[error("Access token error: {0}")]
    Token(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for WechatError {
    fn from(e: reqwest::Error) -> Self {
        WechatError::Http(HttpError::Reqwest(e))
    }
}

impl WechatError {
    /// Map a WeChat `errcode` / `errmsg` pair to a result.
    ///
    /// `0` is success; anything else becomes [`WechatError::Api`].
    pub fn check_api(errcode: i32, errmsg: &str) -> Result<(), WechatError> {
        if errcode == 0 {
            return Ok(());
        }
        Err(WechatError::Api {
            code: errcode,
            message: errmsg.to_string(),
        })
    }

    /// Returns the WeChat error code when this is an API error.
    pub fn api_code(&self) -> Option<i32> {
        match self {
            WechatError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
