//! WeChat Official Account API modules
//!
//! - [`common`] - Shared `errcode` / `errmsg` response primitives
//! - [`template`] - Template messages, industry and template management
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wechat_oa_sdk::api::{TemplateMessageApi, WechatContext};
//!
//! let api = TemplateMessageApi::new(context);
//! ```

pub mod common;
pub mod template;
pub mod r#trait;

pub use common::{OfficialCommonResponse, WechatApiResponse};
pub use r#trait::{WechatApi, WechatContext};
pub use template::{
    CreateTemplateRequest, CreateTemplateResponse, DeleteTemplateRequest,
    GetAllPrivateTemplateResponse, GetIndustryResponse, IndustryInfo, MiniProgramRequest,
    PrivateTemplate, SendMessageRequest, SendMessageResponse, SetIndustryRequest,
    TemplateMessage, TemplateMessageApi, TemplateMessageItem,
};
