//! WeChat HTTP Client
//!
//! Provides the reqwest transport used by the default requester and the
//! token manager.

use http::Method;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tower::Service;

use crate::config::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS};
use crate::error::{HttpError, WechatError};

pub(crate) type MiddlewareFuture =
    Pin<Box<dyn Future<Output = Result<reqwest::Response, reqwest::Error>> + Send>>;
pub(crate) type MiddlewareExecutor =
    Arc<dyn Fn(reqwest::Request) -> MiddlewareFuture + Send + Sync>;

/// WeChat API Client
///
/// Reusable HTTP client for calling WeChat APIs.
/// Built with reqwest for async HTTP requests.
#[derive(Clone)]
pub struct WechatClient {
    http: Client,
    middleware_executor: Option<MiddlewareExecutor>,
}

impl std::fmt::Debug for WechatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WechatClient")
            .field(
                "middleware_executor",
                &self.middleware_executor.as_ref().map(|_| ".."),
            )
            .finish_non_exhaustive()
    }
}

impl WechatClient {
    /// Create a new client builder
    pub fn builder() -> WechatClientBuilder {
        WechatClientBuilder::default()
    }

    pub(crate) fn append_access_token(url: &str, access_token: &str) -> String {
        let encoded = utf8_percent_encode(access_token, NON_ALPHANUMERIC);

        let separator = match url.find('?') {
            Some(idx) if idx + 1 == url.len() => "",
            Some(_) => "&",
            None => "?",
        };
        format!("{url}{separator}access_token={encoded}")
    }

    /// Returns the underlying [`reqwest::Client`] for raw HTTP requests.
    ///
    /// Note: requests made through this client bypass the middleware pipeline.
    pub fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn with_middleware_executor(mut self, executor: MiddlewareExecutor) -> Self {
        self.middleware_executor = Some(executor);
        self
    }

    pub(crate) async fn send_request(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, reqwest::Error> {
        if let Some(executor) = &self.middleware_executor {
            (executor)(request).await
        } else {
            self.http.execute(request).await
        }
    }

    async fn execute(&self, request: reqwest::Request) -> Result<serde_json::Value, WechatError> {
        let response = self.send_request(request).await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("[WechatOfficial] unexpected HTTP status {}", status.as_u16());
            return Err(HttpError::Status {
                status: status.as_u16(),
            }
            .into());
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| HttpError::Decode(e.to_string()).into())
    }

    /// Make a GET request and decode the JSON body into `T`
    ///
    /// # Errors
    /// - Returns `WechatError::Http` for transport failures, non-2xx status
    ///   codes or decode failures
    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, WechatError> {
        let request = self.http.get(url).query(query).build()?;
        let value = self.execute(request).await?;
        serde_json::from_value(value).map_err(|e| HttpError::Decode(e.to_string()).into())
    }

    /// Send a request with an optional JSON body and return the raw JSON response.
    ///
    /// The `errcode` field is left for the caller to interpret.
    pub async fn send_json(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, WechatError> {
        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let request = builder.build()?;
        self.execute(request).await
    }
}

impl Service<reqwest::Request> for WechatClient {
    type Response = reqwest::Response;
    type Error = reqwest::Error;
    type Future = MiddlewareFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: reqwest::Request) -> Self::Future {
        let client = self.http.clone();
        Box::pin(async move { client.execute(req).await })
    }
}

/// Builder for WechatClient
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use wechat_oa_sdk::client::WechatClient;
///
/// let client = WechatClient::builder()
///     .timeout(Duration::from_secs(15))
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct WechatClientBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl WechatClientBuilder {
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

    /// Build the WechatClient
    pub fn build(self) -> Result<WechatClient, WechatError> {
        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let connect_timeout = self
            .connect_timeout
            .unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(WechatClient {
            http: client,
            middleware_executor: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_append_access_token_to_bare_path() {
        let url = WechatClient::append_access_token("https://h/cgi-bin/template/get_industry", "t");
        assert_eq!(url, "https://h/cgi-bin/template/get_industry?access_token=t");
    }

    #[test]
    fn test_append_access_token_after_trailing_question_mark() {
        let url = WechatClient::append_access_token("https://h/cgi-bin/message/template/send?", "t");
        assert_eq!(url, "https://h/cgi-bin/message/template/send?access_token=t");
    }

    #[test]
    fn test_append_access_token_to_existing_query() {
        let url = WechatClient::append_access_token("https://h/x?a=1", "t");
        assert_eq!(url, "https://h/x?a=1&access_token=t");
    }

    #[test]
    fn test_append_access_token_encodes_value() {
        let url = WechatClient::append_access_token("https://h/x", "a+b/c");
        assert_eq!(url, "https://h/x?access_token=a%2Bb%2Fc");
    }

    #[test]
    fn test_builder_custom_timeouts() {
        let client = WechatClient::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_send_json_post_passes_body_and_returns_value() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/cgi-bin/template/del_private_template"))
            .and(body_json(serde_json::json!({"template_id": "tpl"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "errcode": 40037,
                "errmsg": "invalid template_id"
            })))
            .mount(&mock_server)
            .await;

        let client = WechatClient::builder().build().unwrap();
        let url = format!("{}/cgi-bin/template/del_private_template", mock_server.uri());
        let body = serde_json::json!({"template_id": "tpl"});

        let value = client
            .send_json(Method::POST, &url, Some(&body))
            .await
            .unwrap();

        // errcode is passed through, not turned into an error
        assert_eq!(value["errcode"], 40037);
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cgi-bin/template/get_industry"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = WechatClient::builder().build().unwrap();
        let url = format!("{}/cgi-bin/template/get_industry", mock_server.uri());

        let err = client.send_json(Method::GET, &url, None).await.unwrap_err();
        assert!(matches!(
            err,
            WechatError::Http(HttpError::Status { status: 503 })
        ));
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cgi-bin/token"))
            .and(query_param("grant_type", "client_credential"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let client = WechatClient::builder().build().unwrap();
        let url = format!("{}/cgi-bin/token", mock_server.uri());

        let err = client
            .get::<serde_json::Value>(&url, &[("grant_type", "client_credential")])
            .await
            .unwrap_err();
        assert!(matches!(err, WechatError::Http(HttpError::Decode(_))));
    }
}
