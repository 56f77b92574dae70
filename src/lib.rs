//! WeChat Official Account SDK for Rust
//!
//! A typed client for the Official Account template message API.
//!
//! ## API Coverage
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | Send template message | `POST /cgi-bin/message/template/send` |
//! | Set industry | `POST /cgi-bin/template/api_set_industry` |
//! | Get industry | `GET /cgi-bin/template/get_industry` |
//! | Add template | `POST /cgi-bin/template/api_add_template` |
//! | List private templates | `GET /cgi-bin/template/get_all_private_template` |
//! | Delete private template | `POST /cgi-bin/template/del_private_template` |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wechat_oa_sdk::api::{TemplateMessage, TemplateMessageItem, WechatApiResponse};
//! use wechat_oa_sdk::config::OfficialOptions;
//! use wechat_oa_sdk::WechatOfficial;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let wechat = WechatOfficial::builder()
//!         .options(OfficialOptions::from_env()?)
//!         .build()?;
//!
//!     let message = TemplateMessage::new()
//!         .with("first", TemplateMessageItem::new("Hello"));
//!
//!     let response = wechat
//!         .send_template_message("oUser123", "tpl001", "https://example.com/go", &message, None)
//!         .await?;
//!     response.check()?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`api`] - Template message API and shared response types
//! - [`client`] - HTTP transport and the [`WechatOfficial`] facade
//! - [`config`] - Account credentials and transport settings
//! - [`error`] - Error types
//! - [`requester`] - The [`ApiRequester`](requester::ApiRequester) seam every call goes through
//! - [`token`] - Access token management
//! - [`types`] - Validated identifiers
//!
//! ## Error Handling
//!
//! Operations return the remote response as received, including a non-zero
//! `errcode`. Transport, decode and local JSON failures surface as
//! [`WechatError`]:
//!
//! ```rust,ignore
//! use wechat_oa_sdk::WechatError;
//!
//! match result {
//!     Ok(response) if response.is_success() => { /* handle success */ }
//!     Ok(response) => eprintln!("API error: {}", response.errmsg),
//!     Err(WechatError::Http(e)) => eprintln!("HTTP error: {}", e),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod requester;
pub mod token;
pub mod types;
mod utils;

pub use client::{WechatClient, WechatClientBuilder, WechatOfficial, WechatOfficialBuilder};
pub use config::OfficialOptions;
pub use error::WechatError;
