//! Industry and template management example
//!
//! Run with: WECHAT_OFFICIAL_APPID=wx... WECHAT_OFFICIAL_SECRET=... cargo run --example industry_and_templates

use wechat_oa_sdk::api::WechatApiResponse;
use wechat_oa_sdk::{OfficialOptions, WechatOfficial};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let wechat = WechatOfficial::builder()
        .options(OfficialOptions::from_env()?)
        .build()?;

    let industry = wechat.get_industry().await?;
    println!(
        "Primary industry: {} / {}",
        industry.primary_industry.first_class, industry.primary_industry.second_class
    );

    let created = wechat
        .create_template("TM00015", ["商品名称", "购买时间"])
        .await?;
    created.check()?;
    println!("Created template {}", created.template_id);

    let templates = wechat.get_all_private_template().await?;
    for template in &templates.template_list {
        println!("{} - {}", template.template_id, template.title);
    }

    wechat.delete_template(&created.template_id).await?.check()?;
    println!("Deleted template {}", created.template_id);

    Ok(())
}
