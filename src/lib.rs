//! # Job Scraper
//!
//! 从多个瑞典招聘网站抓取职位，并输出一份有上限、已规范化的 JSON 结果
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Browser / HTTP 客户端），只暴露页面能力
//! - `PageDriver` - 打开页面、查询 DOM、等待渲染
//! - `ChromiumDriver` / `StaticHtmlDriver` - 两种实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，与具体网站无关
//! - `normalizer` - 描述文本清理
//! - `date_filter` - 日期窗口过滤与日期解析
//! - `quota` - 跨来源共享的配额预算
//! - `structured` / `sitemap` - JSON-LD 与站点地图
//! - `JobWriter` - 写出结果
//!
//! ### ③ 来源层（Sources）
//! - `sources/` - 定义"一个网站"的完整抓取流程
//! - `SourceAdapter` - 每个网站一个实现，由 `SourceRegistry` 查找
//! - `ListingRun` - 搜索页 → 卡片 → 详情页
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/runner` - 依次调度来源，共享预算
//! - `orchestrator/app` - 管理资源、写出结果
//!
//! ## 模块结构

pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod sources;
pub mod utils;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{PageDriver, StaticHtmlDriver, WaitPolicy};
pub use models::{JobPosting, SearchQuery, Source, SourceSelection};
pub use orchestrator::{App, Orchestrator, RunOptions, RunReport};
pub use services::QuotaAllocator;
pub use sources::{ScrapeCtx, SourceAdapter, SourceRegistry};
