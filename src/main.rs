use anyhow::{Context, Result};
use drama_stats::{logger, App, Config, MissevanClient};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load().context("加载配置失败")?;

    // 初始化日志
    logger::init(config.verbose_logging);

    // 初始化并运行应用
    App::<MissevanClient>::initialize(config)?.run().await?;

    Ok(())
}
