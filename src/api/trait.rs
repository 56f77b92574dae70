//! WeChat API trait and context
//!
//! Provides the base trait and context for all WeChat API implementations.

use std::sync::Arc;

use http::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::OfficialOptions;
use crate::error::{HttpError, WechatError};
use crate::requester::ApiRequester;

/// Context holding shared resources for WeChat API implementations.
///
/// Contains the injected requester and the account options that every
/// call forwards to it. Both are immutable for the context's lifetime.
#[derive(Clone)]
pub struct WechatContext {
    pub(crate) requester: Arc<dyn ApiRequester>,
    pub(crate) options: Arc<OfficialOptions>,
}

impl std::fmt::Debug for WechatContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WechatContext")
            .field("requester", &"ApiRequester { .. }")
            .field("options", &self.options)
            .finish()
    }
}

impl WechatContext {
    /// Create a new WechatContext
    pub fn new(requester: Arc<dyn ApiRequester>, options: Arc<OfficialOptions>) -> Self {
        Self { requester, options }
    }

    /// Get a reference to the account options.
    pub fn options(&self) -> &OfficialOptions {
        &self.options
    }

    /// Dispatch a call through the requester and decode the response as `T`.
    ///
    /// `body` is serialized before dispatch; `None` sends no body.
    pub(crate) async fn request<T, B>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&B>,
    ) -> Result<T, WechatError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = body.map(serde_json::to_value).transpose()?;

        let value = self
            .requester
            .request(endpoint, method, body, &self.options)
            .await?;

        serde_json::from_value(value).map_err(|e| HttpError::Decode(e.to_string()).into())
    }
}

/// Trait for WeChat API implementations.
///
/// All API modules should implement this trait to provide
/// access to the shared context.
pub trait WechatApi: Send + Sync {
    /// Get a reference to the WeChat context
    fn context(&self) -> &WechatContext;

    /// Get the name of this API for logging and error context.
    fn api_name(&self) -> &'static str {
        "unknown"
    }
}
