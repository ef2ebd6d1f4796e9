//! 需要真实浏览器与网络的测试
//!
//! 默认忽略，需要手动运行：cargo test -- --ignored

use job_scraper::browser::acquire_browser;
use job_scraper::config::Config;
use job_scraper::infrastructure::{ChromiumDriver, PageDriver};
use job_scraper::logger;
use job_scraper::models::{SearchQuery, Source};
use job_scraper::services::{DateRangeFilter, QuotaAllocator};
use job_scraper::sources::{JobbsafariAdapter, ScrapeCtx, SourceAdapter};
use std::sync::Arc;

#[tokio::test]
#[ignore]
async fn test_browser_connection() {
    // 初始化日志
    logger::init(true);

    // 加载配置
    let config = Config::from_env().expect("加载配置失败");

    // 测试浏览器连接 / 启动
    let result = acquire_browser(&config).await;

    assert!(result.is_ok(), "应该能够连接或启动浏览器");
}

#[tokio::test]
#[ignore]
async fn test_scrape_jobbsafari_live() {
    logger::init(true);
    let config = Config::from_env().expect("加载配置失败");

    let (browser, _) = acquire_browser(&config).await.expect("获取浏览器失败");
    let driver: Arc<dyn PageDriver> = Arc::new(ChromiumDriver::new(browser));
    let ctx = ScrapeCtx::new(driver, config.wait_policy(), DateRangeFilter::disabled());

    let adapter = JobbsafariAdapter::new(ctx);
    let mut budget = QuotaAllocator::new(2, &[Source::Jobbsafari]);
    let report = adapter
        .scrape(&SearchQuery::new("lager", "Göteborg"), 2, &mut budget)
        .await
        .expect("抓取失败");

    assert!(budget.accepted_count() <= 2);
    assert_eq!(report.accepted, budget.accepted_count());
}
