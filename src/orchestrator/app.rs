//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **资源初始化**：按配置创建页面驱动（连接 / 启动浏览器，或静态 HTTP）
//! 2. **注册来源**：用共享的运行环境构造所有适配器
//! 3. **调度**：委托 [`Orchestrator`] 依次抓取
//! 4. **持久化**：成功后一次性写出 JSON
//! 5. **清理**：关闭自行启动的浏览器

use crate::browser;
use crate::config::{Config, DriverKind};
use crate::error::AppResult;
use crate::infrastructure::{ChromiumDriver, PageDriver, StaticHtmlDriver};
use crate::models::{SearchQuery, SourceSelection};
use crate::orchestrator::runner::{Orchestrator, RunReport};
use crate::services::{DateRangeFilter, JobWriter, SitemapClient};
use crate::sources::{ScrapeCtx, SitemapSource, SourceRegistry};
use crate::utils::logging::{log_startup, print_final_stats};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 一次运行的参数（来自命令行）
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub query: SearchQuery,
    pub selection: SourceSelection,
    pub max_jobs: usize,
    pub days_back: Option<u32>,
    pub output: PathBuf,
    pub excluded_tags: Vec<String>,
    pub keep_going: bool,
}

/// 页面驱动及其所有权
enum DriverHandle {
    /// 浏览器由本程序启动，结束时需要关闭
    Launched(Arc<ChromiumDriver>),
    /// 连接到外部浏览器或使用静态驱动，结束时不做处理
    Borrowed(Arc<dyn PageDriver>),
}

impl DriverHandle {
    fn driver(&self) -> Arc<dyn PageDriver> {
        match self {
            DriverHandle::Launched(driver) => driver.clone() as Arc<dyn PageDriver>,
            DriverHandle::Borrowed(driver) => driver.clone(),
        }
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    options: RunOptions,
    driver: DriverHandle,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config, options: RunOptions) -> AppResult<Self> {
        let driver = match config.driver {
            DriverKind::Static => {
                info!("🌐 使用静态 HTML 驱动");
                DriverHandle::Borrowed(Arc::new(StaticHtmlDriver::http(&config)?))
            }
            DriverKind::Chromium => {
                let (browser, launched) = browser::acquire_browser(&config).await?;
                let driver = Arc::new(ChromiumDriver::new(browser));
                if launched {
                    DriverHandle::Launched(driver)
                } else {
                    DriverHandle::Borrowed(driver)
                }
            }
        };

        Ok(Self {
            config,
            options,
            driver,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(self) -> AppResult<RunReport> {
        let App {
            config,
            options,
            driver,
        } = self;

        let sources = options.selection.sources();
        log_startup(&options.query, &sources, options.max_jobs);

        let ctx = ScrapeCtx::new(
            driver.driver(),
            config.wait_policy(),
            DateRangeFilter::new(options.days_back),
        );
        let sitemap = SitemapSource::Remote {
            client: SitemapClient::new(&config)?,
            url: config.sitemap_url.clone(),
        };
        let registry = SourceRegistry::standard(ctx, options.excluded_tags.clone(), sitemap);

        let result = Orchestrator::new(&registry)
            .keep_going(options.keep_going)
            .run(&options.query, &sources, options.max_jobs)
            .await;

        // 适配器持有驱动的引用，先释放才能关闭浏览器
        drop(registry);
        shutdown(driver).await;

        let output = result?;
        JobWriter::new(&options.output).write(&output.postings)?;
        print_final_stats(&output.report, &options.output.display().to_string());

        Ok(output.report)
    }
}

async fn shutdown(driver: DriverHandle) {
    if let DriverHandle::Launched(driver) = driver {
        match Arc::try_unwrap(driver) {
            Ok(driver) => {
                if let Err(e) = driver.shutdown().await {
                    warn!("⚠️ 关闭浏览器失败: {}", e);
                } else {
                    debug!("浏览器已关闭");
                }
            }
            Err(_) => warn!("⚠️ 浏览器仍被引用，跳过关闭"),
        }
    }
}
