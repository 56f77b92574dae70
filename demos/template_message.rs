//! Template message example
//!
//! Sends one template message built in code and one loaded from JSON.
//!
//! Run with: WECHAT_OFFICIAL_APPID=wx... WECHAT_OFFICIAL_SECRET=... cargo run --example template_message

use wechat_oa_sdk::api::{
    MiniProgramRequest, TemplateMessage, TemplateMessageItem, WechatApiResponse,
};
use wechat_oa_sdk::{OfficialOptions, WechatOfficial};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let wechat = WechatOfficial::builder()
        .options(OfficialOptions::from_env()?)
        .build()?;

    let mut message = TemplateMessage::with_first_and_remark("Your order has shipped", "Thanks!");
    message.add_keywords([
        ("keyword1", TemplateMessageItem::new("#20240101").with_color("#173177")),
        ("keyword2", TemplateMessageItem::new("SF Express")),
    ]);

    let response = wechat
        .send_template_message(
            "user_openid",
            "template_id",
            "https://example.com/orders/20240101",
            &message,
            None,
        )
        .await?;

    match response.check() {
        Ok(()) => println!("Template message sent, msgid {}", response.msgid),
        Err(e) => eprintln!("Failed to send: {}", e),
    }

    let stored = r##"{"first": {"value": "Reminder"}, "remark": {"value": "See you soon", "color": "#999999"}}"##;
    let response = wechat
        .send_template_message_json(
            "user_openid",
            "template_id",
            "",
            stored,
            Some(MiniProgramRequest::new("wx_miniprogram_appid", "pages/index/index")),
        )
        .await?;
    println!("errcode {}: {}", response.errcode, response.errmsg);

    Ok(())
}
