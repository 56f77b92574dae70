//! Unified WeChat Official Account client

use std::sync::Arc;

use crate::api::template::{
    CreateTemplateResponse, GetAllPrivateTemplateResponse, GetIndustryResponse,
    MiniProgramRequest, SendMessageResponse, TemplateMessage, TemplateMessageApi,
};
use crate::api::{OfficialCommonResponse, WechatContext};
use crate::config::OfficialOptions;
use crate::error::WechatError;
use crate::requester::ApiRequester;

/// Unified WeChat Official Account client
///
/// This is the main entry point for the SDK. The builder wires the default
/// reqwest transport and token manager; [`with_requester`](Self::with_requester)
/// accepts any other [`ApiRequester`].
///
/// # Example
///
/// ```rust,ignore
/// use wechat_oa_sdk::config::OfficialOptions;
/// use wechat_oa_sdk::types::{AppId, AppSecret};
/// use wechat_oa_sdk::WechatOfficial;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let options = OfficialOptions::builder()
///         .appid(AppId::new("wx1234567890abcdef")?)
///         .secret(AppSecret::new("your_secret")?)
///         .build()?;
///     let wechat = WechatOfficial::builder().options(options).build()?;
///
///     let industry = wechat.get_industry().await?;
///     println!("{}", industry.primary_industry.first_class);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct WechatOfficial {
    context: Arc<WechatContext>,
}

impl From<Arc<WechatContext>> for WechatOfficial {
    fn from(context: Arc<WechatContext>) -> Self {
        Self { context }
    }
}

impl WechatOfficial {
    pub fn builder() -> super::builder::WechatOfficialBuilder {
        super::builder::WechatOfficialBuilder::default()
    }

    /// Build a client around a caller-supplied requester.
    pub fn with_requester(requester: Arc<dyn ApiRequester>, options: OfficialOptions) -> Self {
        Self::from(Arc::new(WechatContext::new(requester, Arc::new(options))))
    }

    pub fn appid(&self) -> &str {
        self.context.options().appid()
    }

    pub fn context(&self) -> &Arc<WechatContext> {
        &self.context
    }

    pub fn template_message(&self) -> TemplateMessageApi {
        TemplateMessageApi::new(self.context.clone())
    }

    // Template Message API

    pub async fn send_template_message(
        &self,
        open_id: &str,
        template_id: &str,
        target_url: &str,
        template_message: &TemplateMessage,
        mini_program: Option<MiniProgramRequest>,
    ) -> Result<SendMessageResponse, WechatError> {
        self.template_message()
            .send_message(
                open_id,
                template_id,
                target_url,
                template_message,
                mini_program,
            )
            .await
    }

    pub async fn send_template_message_json(
        &self,
        open_id: &str,
        template_id: &str,
        target_url: &str,
        template_message: &str,
        mini_program: Option<MiniProgramRequest>,
    ) -> Result<SendMessageResponse, WechatError> {
        self.template_message()
            .send_message_json(
                open_id,
                template_id,
                target_url,
                template_message,
                mini_program,
            )
            .await
    }

    pub async fn set_industry(
        &self,
        primary_industry: &str,
        secondary_industry: &str,
    ) -> Result<OfficialCommonResponse, WechatError> {
        self.template_message()
            .set_industry(primary_industry, secondary_industry)
            .await
    }

    pub async fn get_industry(&self) -> Result<GetIndustryResponse, WechatError> {
        self.template_message().get_industry().await
    }

    pub async fn create_template<I, S>(
        &self,
        template_short_id: &str,
        keyword_name_list: I,
    ) -> Result<CreateTemplateResponse, WechatError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.template_message()
            .create_template(template_short_id, keyword_name_list)
            .await
    }

    pub async fn get_all_private_template(
        &self,
    ) -> Result<GetAllPrivateTemplateResponse, WechatError> {
        self.template_message().get_all_private_template().await
    }

    pub async fn delete_template(
        &self,
        template_id: &str,
    ) -> Result<OfficialCommonResponse, WechatError> {
        self.template_message().delete_template(template_id).await
    }
}
