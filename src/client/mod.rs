//! WeChat HTTP Client module
//!
//! This module contains the WechatClient transport and the WechatOfficial facade.

mod wechat_client;
pub use wechat_client::{WechatClient, WechatClientBuilder};

mod wechat_official;
pub use wechat_official::WechatOfficial;

mod builder;
pub use builder::WechatOfficialBuilder;
