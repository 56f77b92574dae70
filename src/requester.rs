//! Authenticated API dispatch
//!
//! Every API operation funnels through an [`ApiRequester`]: it receives the
//! endpoint, HTTP method, optional JSON body and the account options, and
//! returns the decoded JSON response. [`HttpApiRequester`] is the default
//! implementation backed by [`WechatClient`] and an [`AccessTokenProvider`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use http::Method;

use crate::client::WechatClient;
use crate::config::OfficialOptions;
use crate::error::WechatError;
use crate::token::AccessTokenProvider;
use crate::utils::redact_url;

pub type RequestFuture<'a> =
    Pin<Box<dyn Future<Output = Result<serde_json::Value, WechatError>> + Send + 'a>>;

/// Performs one API call on behalf of an operation.
///
/// Implementations own the transport concerns: access token attachment,
/// base URL resolution, timeouts, and transport errors. The JSON value is
/// returned as received; `errcode` is not interpreted here.
pub trait ApiRequester: Send + Sync {
    fn request<'a>(
        &'a self,
        endpoint: &'a str,
        method: Method,
        body: Option<serde_json::Value>,
        options: &'a OfficialOptions,
    ) -> RequestFuture<'a>;
}

/// Default requester: resolves the endpoint against `base_url`, appends
/// `access_token` and sends the call through [`WechatClient`].
pub struct HttpApiRequester {
    client: Arc<WechatClient>,
    token_provider: Arc<dyn AccessTokenProvider>,
}

impl std::fmt::Debug for HttpApiRequester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpApiRequester")
            .field("client", &self.client)
            .field("token_provider", &"AccessTokenProvider { .. }")
            .finish()
    }
}

impl HttpApiRequester {
    pub fn new(client: Arc<WechatClient>, token_provider: Arc<dyn AccessTokenProvider>) -> Self {
        Self {
            client,
            token_provider,
        }
    }

    async fn dispatch(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<serde_json::Value>,
        options: &OfficialOptions,
    ) -> Result<serde_json::Value, WechatError> {
        let token = self.token_provider.access_token(options).await?;
        let url = WechatClient::append_access_token(&options.resolve(endpoint), &token);

        log::debug!("[WechatOfficial] {} {}", method, redact_url(&url));

        self.client.send_json(method, &url, body.as_ref()).await
    }
}

impl ApiRequester for HttpApiRequester {
    fn request<'a>(
        &'a self,
        endpoint: &'a str,
        method: Method,
        body: Option<serde_json::Value>,
        options: &'a OfficialOptions,
    ) -> RequestFuture<'a> {
        Box::pin(self.dispatch(endpoint, method, body, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenFuture;
    use crate::types::{AppId, AppSecret};
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct StaticToken(&'static str);

    impl AccessTokenProvider for StaticToken {
        fn access_token<'a>(&'a self, _options: &'a OfficialOptions) -> TokenFuture<'a> {
            let token = self.0.to_string();
            Box::pin(async move { Ok(token) })
        }
    }

    struct FailingToken;

    impl AccessTokenProvider for FailingToken {
        fn access_token<'a>(&'a self, _options: &'a OfficialOptions) -> TokenFuture<'a> {
            Box::pin(async { Err(WechatError::Token("provider offline".to_string())) })
        }
    }

    fn create_test_options(base_url: &str) -> OfficialOptions {
        OfficialOptions::builder()
            .appid(AppId::new("wx1234567890abcdef").unwrap())
            .secret(AppSecret::new("secret1234567890ab").unwrap())
            .base_url(base_url)
            .build()
            .unwrap()
    }

    fn create_requester(provider: Arc<dyn AccessTokenProvider>) -> HttpApiRequester {
        HttpApiRequester::new(Arc::new(WechatClient::builder().build().unwrap()), provider)
    }

    #[tokio::test]
    async fn test_request_attaches_token_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/cgi-bin/template/api_set_industry"))
            .and(query_param("access_token", "static_token"))
            .and(body_json(serde_json::json!({
                "industry_id1": "1",
                "industry_id2": "4"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "errcode": 0,
                "errmsg": "ok"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let requester = create_requester(Arc::new(StaticToken("static_token")));
        let options = create_test_options(&mock_server.uri());

        let value = requester
            .request(
                "/cgi-bin/template/api_set_industry",
                Method::POST,
                Some(serde_json::json!({"industry_id1": "1", "industry_id2": "4"})),
                &options,
            )
            .await
            .unwrap();

        assert_eq!(value["errmsg"], "ok");
    }

    #[tokio::test]
    async fn test_request_passes_remote_errcode_through() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cgi-bin/template/get_industry"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "errcode": 48001,
                "errmsg": "api unauthorized"
            })))
            .mount(&mock_server)
            .await;

        let requester = create_requester(Arc::new(StaticToken("static_token")));
        let options = create_test_options(&mock_server.uri());

        let value = requester
            .request("/cgi-bin/template/get_industry", Method::GET, None, &options)
            .await
            .unwrap();

        assert_eq!(value["errcode"], 48001);
    }

    #[tokio::test]
    async fn test_token_failure_skips_network_call() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let requester = create_requester(Arc::new(FailingToken));
        let options = create_test_options(&mock_server.uri());

        let err = requester
            .request("/cgi-bin/template/get_industry", Method::GET, None, &options)
            .await
            .unwrap_err();

        assert!(matches!(err, WechatError::Token(_)));
    }
}
