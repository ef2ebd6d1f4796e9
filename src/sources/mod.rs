//! 来源层（Sources）
//!
//! 每个招聘网站一个适配器，统一实现 [`SourceAdapter`]。
//! 编排层通过 [`SourceRegistry`] 按来源查找适配器，从不按名字分支。
//!
//! ```text
//! SourceAdapter::scrape
//!     ↓
//! listing::ListingRun（搜索页 → 卡片 → 详情页）
//!     ↓
//! extract（选择器表 + 描述回退链）
//!     ↓
//! services（normalizer / date_filter / quota / structured）
//! ```

pub mod demando;
pub mod extract;
pub mod jobbsafari;
pub mod listing;
pub mod platsbanken;
pub mod tags;

pub use demando::{DemandoAdapter, SitemapSource};
pub use jobbsafari::JobbsafariAdapter;
pub use platsbanken::PlatsbankenAdapter;
pub use tags::TagPredicate;

use crate::error::AppResult;
use crate::infrastructure::{PageDriver, WaitPolicy};
use crate::models::{SearchQuery, Source};
use crate::services::{DateRangeFilter, QuotaAllocator};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;

/// 适配器共享的运行环境
#[derive(Clone)]
pub struct ScrapeCtx {
    pub driver: Arc<dyn PageDriver>,
    pub wait: WaitPolicy,
    pub filter: DateRangeFilter,
    /// 日期过滤与相对日期解析的基准日
    pub today: NaiveDate,
}

impl ScrapeCtx {
    pub fn new(driver: Arc<dyn PageDriver>, wait: WaitPolicy, filter: DateRangeFilter) -> Self {
        Self {
            driver,
            wait,
            filter,
            today: chrono::Local::now().date_naive(),
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}

/// 单个来源的统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub source: Source,
    /// 截断到配额后的候选数
    pub candidates: usize,
    pub accepted: usize,
    /// 被标签或日期过滤的数量
    pub filtered: usize,
    /// 处理出错被跳过的数量
    pub failed: usize,
    /// 来源级失败
    pub aborted: bool,
}

impl SourceReport {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            candidates: 0,
            accepted: 0,
            filtered: 0,
            failed: 0,
            aborted: false,
        }
    }
}

/// 来源适配器
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn source(&self) -> Source;

    /// 抓取最多 `quota` 个候选，通过 `budget` 提交结果
    ///
    /// 搜索页加载失败时返回错误；单个候选的失败只计入报告
    async fn scrape(
        &self,
        query: &SearchQuery,
        quota: usize,
        budget: &mut QuotaAllocator,
    ) -> AppResult<SourceReport>;
}

/// 适配器注册表
#[derive(Default)]
pub struct SourceRegistry {
    adapters: HashMap<Source, Box<dyn SourceAdapter>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 内置的三个来源
    pub fn standard(ctx: ScrapeCtx, excluded_tags: Vec<String>, sitemap: SitemapSource) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(JobbsafariAdapter::new(ctx.clone())));
        registry.register(Box::new(PlatsbankenAdapter::new(ctx.clone())));
        registry.register(Box::new(DemandoAdapter::new(ctx, excluded_tags, sitemap)));
        registry
    }

    /// 注册适配器，同一来源重复注册时替换旧的
    pub fn register(&mut self, adapter: Box<dyn SourceAdapter>) {
        self.adapters.insert(adapter.source(), adapter);
    }

    pub fn get(&self, source: Source) -> Option<&dyn SourceAdapter> {
        self.adapters.get(&source).map(|a| a.as_ref())
    }
}
