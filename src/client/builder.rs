use std::sync::Arc;
use std::time::Duration;

use reqwest::{Request as ReqwestRequest, Response as ReqwestResponse};
use tower::layer::util::Identity;
use tower::{Layer, Service};

use crate::api::WechatContext;
use crate::config::OfficialOptions;
use crate::error::WechatError;
use crate::requester::HttpApiRequester;
use crate::token::{AccessTokenProvider, TokenManager};

use super::wechat_client::{MiddlewareExecutor, WechatClient};
use super::WechatOfficial;

#[must_use]
#[derive(Default)]
pub struct WechatOfficialBuilder<M = Identity> {
    options: Option<OfficialOptions>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    token_provider: Option<Arc<dyn AccessTokenProvider>>,
    middleware: Option<M>,
}

impl<M> std::fmt::Debug for WechatOfficialBuilder<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WechatOfficialBuilder")
            .field("options", &self.options)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("token_provider", &self.token_provider.as_ref().map(|_| ".."))
            .field("middleware", &self.middleware.as_ref().map(|_| ".."))
            .finish()
    }
}

impl<M> WechatOfficialBuilder<M> {
    pub fn options(mut self, options: OfficialOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Override the request timeout carried by the options.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the connect timeout carried by the options.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Use an external token service instead of the built-in [`TokenManager`].
    pub fn token_provider(mut self, provider: Arc<dyn AccessTokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    /// Wrap the transport in a tower layer (retry, rate limiting, tracing, ...).
    pub fn with_middleware<M2>(self, middleware: M2) -> WechatOfficialBuilder<M2>
    where
        M2: Layer<WechatClient> + Clone + Send + Sync + 'static,
    {
        WechatOfficialBuilder {
            options: self.options,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            token_provider: self.token_provider,
            middleware: Some(middleware),
        }
    }

    pub fn build(self) -> Result<WechatOfficial, WechatError>
    where
        M: Layer<WechatClient> + Clone + Send + Sync + 'static,
        M::Service: Service<ReqwestRequest, Response = ReqwestResponse, Error = reqwest::Error>
            + Clone
            + Send
            + Sync
            + 'static,
        <M::Service as Service<ReqwestRequest>>::Future: Send + 'static,
    {
        let options = self
            .options
            .ok_or_else(|| WechatError::Config("options are required".to_string()))?;

        let mut client = WechatClient::builder()
            .timeout(self.timeout.unwrap_or(options.timeout()))
            .connect_timeout(self.connect_timeout.unwrap_or(options.connect_timeout()))
            .build()?;

        if let Some(middleware) = self.middleware {
            let service = middleware.layer(client.clone());
            let executor = make_middleware_executor(service);
            client = client.with_middleware_executor(executor);
        }

        let token_provider = match self.token_provider {
            Some(provider) => provider,
            None => Arc::new(TokenManager::new(client.clone())),
        };

        let requester = Arc::new(HttpApiRequester::new(Arc::new(client), token_provider));
        let context = Arc::new(WechatContext::new(requester, Arc::new(options)));

        Ok(WechatOfficial::from(context))
    }
}

fn make_middleware_executor<S>(service: S) -> MiddlewareExecutor
where
    S: Service<ReqwestRequest, Response = ReqwestResponse, Error = reqwest::Error>
        + Clone
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
{
    let service = Arc::new(service);

    Arc::new(move |request: ReqwestRequest| {
        let mut service = (*service).clone();
        Box::pin(async move { service.call(request).await })
    })
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::{Context, Poll};

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::types::{AppId, AppSecret};

    fn create_test_options(base_url: &str) -> OfficialOptions {
        OfficialOptions::builder()
            .appid(AppId::new("wx1234567890abcdef").unwrap())
            .secret(AppSecret::new("secret1234567890ab").unwrap())
            .base_url(base_url)
            .build()
            .unwrap()
    }

    async fn mount_token(mock_server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/cgi-bin/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "test_token",
                "expires_in": 7200
            })))
            .mount(mock_server)
            .await;
    }

    #[test]
    fn test_builder_default_values() {
        let wechat = WechatOfficial::builder()
            .options(create_test_options("https://api.weixin.qq.com"))
            .build()
            .unwrap();

        assert_eq!(wechat.appid(), "wx1234567890abcdef");
    }

    #[test]
    fn test_builder_missing_options() {
        let result = WechatOfficial::builder().build();
        assert!(matches!(result, Err(WechatError::Config(_))));
    }

    #[tokio::test]
    async fn test_middleware_configured_and_executes() {
        #[derive(Clone)]
        struct CountingLayer {
            count: Arc<AtomicUsize>,
        }

        impl Layer<WechatClient> for CountingLayer {
            type Service = CountingService;

            fn layer(&self, inner: WechatClient) -> Self::Service {
                CountingService {
                    inner,
                    count: Arc::clone(&self.count),
                }
            }
        }

        #[derive(Clone)]
        struct CountingService {
            inner: WechatClient,
            count: Arc<AtomicUsize>,
        }

        impl Service<ReqwestRequest> for CountingService {
            type Response = ReqwestResponse;
            type Error = reqwest::Error;
            type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

            fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
                Poll::Ready(Ok(()))
            }

            fn call(&mut self, req: ReqwestRequest) -> Self::Future {
                self.count.fetch_add(1, Ordering::SeqCst);
                let mut inner = self.inner.clone();
                Box::pin(async move { inner.call(req).await })
            }
        }

        let mock_server = MockServer::start().await;
        mount_token(&mock_server).await;
        Mock::given(method("GET"))
            .and(path("/cgi-bin/template/get_industry"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "primary_industry": {"first_class": "IT科技", "second_class": "互联网|电子商务"},
                "secondary_industry": {"first_class": "IT科技", "second_class": "IT软件与服务"}
            })))
            .mount(&mock_server)
            .await;

        let count = Arc::new(AtomicUsize::new(0));
        let wechat = WechatOfficial::builder()
            .options(create_test_options(&mock_server.uri()))
            .with_middleware(CountingLayer {
                count: Arc::clone(&count),
            })
            .build()
            .unwrap();

        let industry = wechat.get_industry().await.unwrap();
        assert_eq!(industry.primary_industry.first_class, "IT科技");

        // token fetch + API call both go through the layer
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_external_token_provider_is_used() {
        struct FixedToken;

        impl AccessTokenProvider for FixedToken {
            fn access_token<'a>(
                &'a self,
                _options: &'a OfficialOptions,
            ) -> crate::token::TokenFuture<'a> {
                Box::pin(async { Ok("external_token".to_string()) })
            }
        }

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cgi-bin/template/get_all_private_template"))
            .and(wiremock::matchers::query_param(
                "access_token",
                "external_token",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "template_list": []
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let wechat = WechatOfficial::builder()
            .options(create_test_options(&mock_server.uri()))
            .token_provider(Arc::new(FixedToken))
            .build()
            .unwrap();

        let templates = wechat.get_all_private_template().await.unwrap();
        assert!(templates.template_list.is_empty());
    }
}
