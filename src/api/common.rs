//! Common API response primitives
//!
//! Most WeChat APIs return JSON responses with common `errcode` / `errmsg` fields.
//! This module provides:
//!
//! - [`WechatApiResponse`] trait for uniform errcode/errmsg checking
//! - [`OfficialCommonResponse`] for endpoints that return nothing else
//!
//! ## Usage
//!
//! ```rust
//! use wechat_oa_sdk::api::common::{OfficialCommonResponse, WechatApiResponse};
//!
//! let json = r#"{"errcode": 0, "errmsg": "ok"}"#;
//! let resp: OfficialCommonResponse = serde_json::from_str(json).unwrap();
//! assert!(resp.check().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::WechatError;

/// Trait for WeChat API responses that carry `errcode` / `errmsg`.
///
/// The API operations hand responses back untouched; call
/// [`check`](WechatApiResponse::check) to turn a non-zero code into an error.
pub trait WechatApiResponse {
    /// Returns the error code from the API response.
    ///
    /// `0` indicates success; any other value is an error.
    fn errcode(&self) -> i32;

    /// Returns the error message from the API response.
    fn errmsg(&self) -> &str;

    /// Returns `Ok(())` when `errcode == 0`, otherwise `WechatError::Api`.
    fn check(&self) -> Result<(), WechatError> {
        WechatError::check_api(self.errcode(), self.errmsg())
    }

    /// Returns `true` when the response indicates success (`errcode == 0`).
    fn is_success(&self) -> bool {
        self.errcode() == 0
    }
}

/// Implements [`WechatApiResponse`] for structs with `errcode` / `errmsg` fields.
macro_rules! impl_wechat_api_response {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::api::common::WechatApiResponse for $ty {
                fn errcode(&self) -> i32 {
                    self.errcode
                }

                fn errmsg(&self) -> &str {
                    &self.errmsg
                }
            }
        )+
    };
}

pub(crate) use impl_wechat_api_response;

/// Error envelope shared by operations with no richer payload.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct OfficialCommonResponse {
    /// Error code (`0` = success)
    #[serde(default)]
    pub errcode: i32,
    /// Error message
    #[serde(default)]
    pub errmsg: String,
}

impl OfficialCommonResponse {
    /// Create a success response.
    pub fn success() -> Self {
        Self {
            errcode: 0,
            errmsg: "ok".to_string(),
        }
    }

    /// Create an error response with the given code and message.
    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            errcode: code,
            errmsg: message.into(),
        }
    }
}

impl_wechat_api_response!(OfficialCommonResponse);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_response_success() {
        let resp = OfficialCommonResponse::success();
        assert!(resp.is_success());
        assert!(resp.check().is_ok());
    }

    #[test]
    fn test_common_response_deserialize_error() {
        let json = r#"{"errcode": 40037, "errmsg": "invalid template_id"}"#;
        let resp: OfficialCommonResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.is_success());
        match resp.check().unwrap_err() {
            WechatError::Api { code, message } => {
                assert_eq!(code, 40037);
                assert_eq!(message, "invalid template_id");
            }
            other => panic!("Expected WechatError::Api, got {other:?}"),
        }
    }

    #[test]
    fn test_common_response_defaults_on_missing_fields() {
        let resp: OfficialCommonResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp, OfficialCommonResponse::default());
        assert!(resp.is_success());
    }

    #[test]
    fn test_common_response_error_constructor() {
        let resp = OfficialCommonResponse::error(-1, "system error");
        assert_eq!(resp.errcode, -1);
        assert!(resp.check().is_err());
    }
}
