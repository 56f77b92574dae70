//! Template Message API
//!
//! Sends template messages to users and manages the account's message
//! templates and industry classification.
//!
//! # Features
//!
//! - Send template messages, optionally linked to a mini program page
//! - Set and query the account's template industry
//! - Add templates from the template library
//! - List and delete private templates
//!
//! Every method returns the decoded response as received. A non-zero
//! `errcode` is not turned into an error here; use
//! [`WechatApiResponse::check`](super::common::WechatApiResponse::check).
//!
//! # Example
//!
//! ```no_run
//! # use wechat_oa_sdk::api::template::{TemplateMessage, TemplateMessageItem};
//! # use wechat_oa_sdk::api::WechatApiResponse;
//! # use wechat_oa_sdk::WechatOfficial;
//! # async fn example(wechat: WechatOfficial) -> Result<(), Box<dyn std::error::Error>> {
//! let message = TemplateMessage::new()
//!     .with("first", TemplateMessageItem::new("Your order has shipped"))
//!     .with("keyword1", TemplateMessageItem::new("#20240101").with_color("#173177"));
//!
//! let response = wechat
//!     .template_message()
//!     .send_message("oUser123", "tpl001", "https://example.com/go", &message, None)
//!     .await?;
//! response.check()?;
//! println!("msgid: {}", response.msgid);
//! # Ok(())
//! # }
//! ```

use std::collections::btree_map::{self, BTreeMap};
use std::sync::Arc;

use http::Method;
use serde::{Deserialize, Serialize};

use super::common::{impl_wechat_api_response, OfficialCommonResponse};
use super::{WechatApi, WechatContext};
use crate::error::WechatError;

pub const SEND_URL: &str = "/cgi-bin/message/template/send";
pub const SET_INDUSTRY_URL: &str = "/cgi-bin/template/api_set_industry";
pub const GET_INDUSTRY_URL: &str = "/cgi-bin/template/get_industry";
pub const ADD_TEMPLATE_URL: &str = "/cgi-bin/template/api_add_template";
pub const GET_ALL_PRIVATE_TEMPLATE_URL: &str = "/cgi-bin/template/get_all_private_template";
pub const DEL_PRIVATE_TEMPLATE_URL: &str = "/cgi-bin/template/del_private_template";

/// One placeholder value of a template message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateMessageItem {
    pub value: String,
    /// Display color such as `#173177`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl TemplateMessageItem {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Template placeholder data, keyed by data-field name.
///
/// Serializes as the `data` object of a send request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateMessage(BTreeMap<String, TemplateMessageItem>);

impl TemplateMessage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Message with the conventional `first` header and `remark` footer fields.
    pub fn with_first_and_remark(first: impl Into<String>, remark: impl Into<String>) -> Self {
        Self::new()
            .with("first", TemplateMessageItem::new(first))
            .with("remark", TemplateMessageItem::new(remark))
    }

    pub fn with(mut self, key: impl Into<String>, item: TemplateMessageItem) -> Self {
        self.insert(key, item);
        self
    }

    /// Insert a field, returning the previous item for that key.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        item: TemplateMessageItem,
    ) -> Option<TemplateMessageItem> {
        self.0.insert(key.into(), item)
    }

    /// Insert every `(keyword, item)` pair.
    pub fn add_keywords<I, K>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = (K, TemplateMessageItem)>,
        K: Into<String>,
    {
        for (key, item) in keywords {
            self.insert(key, item);
        }
    }

    pub fn get(&self, key: &str) -> Option<&TemplateMessageItem> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, TemplateMessageItem> {
        self.0.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, TemplateMessageItem)> for TemplateMessage {
    fn from_iter<I: IntoIterator<Item = (K, TemplateMessageItem)>>(iter: I) -> Self {
        let mut message = Self::new();
        message.add_keywords(iter);
        message
    }
}

/// Mini program page opened when the user taps the message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiniProgramRequest {
    pub appid: String,
    pub pagepath: String,
}

impl MiniProgramRequest {
    pub fn new(appid: impl Into<String>, pagepath: impl Into<String>) -> Self {
        Self {
            appid: appid.into(),
            pagepath: pagepath.into(),
        }
    }
}

/// Body of `POST /cgi-bin/message/template/send`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendMessageRequest {
    pub touser: String,
    pub template_id: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub miniprogram: Option<MiniProgramRequest>,
    pub data: TemplateMessage,
}

impl SendMessageRequest {
    pub fn new(
        open_id: impl Into<String>,
        template_id: impl Into<String>,
        target_url: impl Into<String>,
        data: TemplateMessage,
        miniprogram: Option<MiniProgramRequest>,
    ) -> Self {
        Self {
            touser: open_id.into(),
            template_id: template_id.into(),
            url: target_url.into(),
            miniprogram,
            data,
        }
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SendMessageResponse {
    #[serde(default)]
    pub msgid: i64,
    #[serde(default)]
    pub errcode: i32,
    #[serde(default)]
    pub errmsg: String,
}

/// Body of `POST /cgi-bin/template/api_set_industry`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetIndustryRequest {
    pub industry_id1: String,
    pub industry_id2: String,
}

impl SetIndustryRequest {
    pub fn new(primary_industry: impl Into<String>, secondary_industry: impl Into<String>) -> Self {
        Self {
            industry_id1: primary_industry.into(),
            industry_id2: secondary_industry.into(),
        }
    }
}

/// Industry classification as returned by `get_industry`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct IndustryInfo {
    #[serde(default)]
    pub first_class: String,
    #[serde(default)]
    pub second_class: String,
}

#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GetIndustryResponse {
    #[serde(default)]
    pub primary_industry: IndustryInfo,
    #[serde(default)]
    pub secondary_industry: IndustryInfo,
    #[serde(default)]
    pub errcode: i32,
    #[serde(default)]
    pub errmsg: String,
}

/// Body of `POST /cgi-bin/template/api_add_template`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTemplateRequest {
    pub template_id_short: String,
    /// Keyword names in template order
    pub keyword_name_list: Vec<String>,
}

impl CreateTemplateRequest {
    pub fn new<I, S>(template_short_id: impl Into<String>, keyword_name_list: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            template_id_short: template_short_id.into(),
            keyword_name_list: keyword_name_list.into_iter().map(Into::into).collect(),
        }
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateTemplateResponse {
    #[serde(default)]
    pub template_id: String,
    #[serde(default)]
    pub errcode: i32,
    #[serde(default)]
    pub errmsg: String,
}

/// A template added to the account
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PrivateTemplate {
    #[serde(default)]
    pub template_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub primary_industry: String,
    #[serde(default)]
    pub deputy_industry: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub example: String,
}

#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GetAllPrivateTemplateResponse {
    #[serde(default)]
    pub template_list: Vec<PrivateTemplate>,
    #[serde(default)]
    pub errcode: i32,
    #[serde(default)]
    pub errmsg: String,
}

/// Body of `POST /cgi-bin/template/del_private_template`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteTemplateRequest {
    pub template_id: String,
}

impl DeleteTemplateRequest {
    pub fn new(template_id: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
        }
    }
}

impl_wechat_api_response!(
    SendMessageResponse,
    GetIndustryResponse,
    CreateTemplateResponse,
    GetAllPrivateTemplateResponse,
);

/// Template Message API
///
/// Holds no mutable state; clones share the same context and calls may run
/// concurrently.
#[derive(Debug, Clone)]
pub struct TemplateMessageApi {
    context: Arc<WechatContext>,
}

impl TemplateMessageApi {
    /// Create a new TemplateMessageApi instance
    pub fn new(context: Arc<WechatContext>) -> Self {
        Self { context }
    }

    /// Send a template message
    ///
    /// POST /cgi-bin/message/template/send?access_token=ACCESS_TOKEN
    ///
    /// # Arguments
    /// * `open_id` - Recipient's OpenID
    /// * `template_id` - Template to fill
    /// * `target_url` - Page opened when the user taps the message
    /// * `template_message` - Placeholder values
    /// * `mini_program` - Mini program page to open instead of `target_url` (optional)
    pub async fn send_message(
        &self,
        open_id: &str,
        template_id: &str,
        target_url: &str,
        template_message: &TemplateMessage,
        mini_program: Option<MiniProgramRequest>,
    ) -> Result<SendMessageResponse, WechatError> {
        let request = SendMessageRequest::new(
            open_id,
            template_id,
            target_url,
            template_message.clone(),
            mini_program,
        );

        self.context
            .request(SEND_URL, Method::POST, Some(&request))
            .await
    }

    /// Send a template message whose data is stored as a JSON string
    ///
    /// The string must be a JSON object of the same shape as
    /// [`TemplateMessage`], e.g. `{"first": {"value": "Hello"}}`.
    ///
    /// Parsing is strict: every item needs a string `value`. Items such as
    /// `{"first": {}}` or `{"first": {"value": 1}}` are rejected, not coerced.
    ///
    /// # Errors
    /// Returns `WechatError::Json` without dispatching anything when the
    /// string does not parse.
    pub async fn send_message_json(
        &self,
        open_id: &str,
        template_id: &str,
        target_url: &str,
        template_message: &str,
        mini_program: Option<MiniProgramRequest>,
    ) -> Result<SendMessageResponse, WechatError> {
        let template_message: TemplateMessage = serde_json::from_str(template_message)?;

        self.send_message(
            open_id,
            template_id,
            target_url,
            &template_message,
            mini_program,
        )
        .await
    }

    /// Set the account's template industry
    ///
    /// POST /cgi-bin/template/api_set_industry?access_token=ACCESS_TOKEN
    ///
    /// Industry codes are listed in the WeChat documentation; the account may
    /// change its industry once a month.
    pub async fn set_industry(
        &self,
        primary_industry: &str,
        secondary_industry: &str,
    ) -> Result<OfficialCommonResponse, WechatError> {
        let request = SetIndustryRequest::new(primary_industry, secondary_industry);

        self.context
            .request(SET_INDUSTRY_URL, Method::POST, Some(&request))
            .await
    }

    /// Get the account's template industry
    ///
    /// GET /cgi-bin/template/get_industry?access_token=ACCESS_TOKEN
    pub async fn get_industry(&self) -> Result<GetIndustryResponse, WechatError> {
        self.context
            .request::<_, ()>(GET_INDUSTRY_URL, Method::GET, None)
            .await
    }

    /// Add a template from the template library
    ///
    /// POST /cgi-bin/template/api_add_template?access_token=ACCESS_TOKEN
    ///
    /// # Arguments
    /// * `template_short_id` - Library template number, e.g. `TM00015` or `OPENTM207498902`
    /// * `keyword_name_list` - Keyword names to use, in order. WeChat answers
    ///   with errcode 40246 when the list is empty or a name is unknown.
    pub async fn create_template<I, S>(
        &self,
        template_short_id: &str,
        keyword_name_list: I,
    ) -> Result<CreateTemplateResponse, WechatError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let request = CreateTemplateRequest::new(template_short_id, keyword_name_list);

        self.context
            .request(ADD_TEMPLATE_URL, Method::POST, Some(&request))
            .await
    }

    /// List every template added to the account
    ///
    /// GET /cgi-bin/template/get_all_private_template?access_token=ACCESS_TOKEN
    pub async fn get_all_private_template(
        &self,
    ) -> Result<GetAllPrivateTemplateResponse, WechatError> {
        self.context
            .request::<_, ()>(GET_ALL_PRIVATE_TEMPLATE_URL, Method::GET, None)
            .await
    }

    /// Delete a template from the account
    ///
    /// POST /cgi-bin/template/del_private_template?access_token=ACCESS_TOKEN
    pub async fn delete_template(
        &self,
        template_id: &str,
    ) -> Result<OfficialCommonResponse, WechatError> {
        let request = DeleteTemplateRequest::new(template_id);

        self.context
            .request(DEL_PRIVATE_TEMPLATE_URL, Method::POST, Some(&request))
            .await
    }
}

impl WechatApi for TemplateMessageApi {
    fn context(&self) -> &WechatContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "template_message"
    }
}
