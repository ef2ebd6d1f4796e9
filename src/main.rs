use anyhow::{Context, Result};
use clap::Parser;
use job_scraper::cli::Cli;
use job_scraper::{logger, App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置：默认值 < 配置文件 < 环境变量 < 命令行
    let mut config = Config::load(cli.config.as_deref()).context("加载配置失败")?;
    cli.apply_to(&mut config);

    // 初始化日志
    logger::init(config.verbose_logging);

    // 初始化并运行应用
    let app = App::initialize(config, cli.run_options())
        .await
        .context("初始化失败")?;
    app.run().await.context("抓取失败，未写出结果")?;

    Ok(())
}
