//! 列表页抓取流程
//!
//! 流程顺序：
//! 1. 打开搜索页，等待卡片渲染
//! 2. 按配额截断候选列表
//! 3. 逐个卡片：读取卡片 → 标签过滤 → 详情页 → 日期过滤 → 提交预算
//!
//! 单个候选出错只记录并跳过；搜索页本身打不开则整个来源失败。

use crate::error::AppResult;
use crate::infrastructure::{DomNode, PageSession};
use crate::models::{JobFields, JobPosting};
use crate::services::{QuotaAllocator, SitemapDates};
use crate::sources::extract::{read_card, read_detail, DetailFields, SiteLayout};
use crate::sources::tags::TagPredicate;
use crate::sources::{ScrapeCtx, SourceReport};
use crate::utils::logging::truncate_text;
use tracing::{debug, info, warn};

/// 候选的处理结果
#[derive(Debug)]
enum CardOutcome {
    /// 可以提交
    Ready(JobPosting),
    /// 标签不符
    TagMismatch,
    /// 不在日期窗口内
    OutOfRange(String),
}

/// 一次列表页抓取
pub struct ListingRun<'a> {
    ctx: &'a ScrapeCtx,
    layout: &'a SiteLayout,
    tag_filter: Option<&'a TagPredicate>,
    sitemap: Option<&'a SitemapDates>,
}

impl<'a> ListingRun<'a> {
    pub fn new(ctx: &'a ScrapeCtx, layout: &'a SiteLayout) -> Self {
        Self {
            ctx,
            layout,
            tag_filter: None,
            sitemap: None,
        }
    }

    /// 进入详情页之前按卡片标签过滤
    pub fn with_tag_filter(mut self, predicate: &'a TagPredicate) -> Self {
        self.tag_filter = Some(predicate);
        self
    }

    /// 用站点地图回填缺失的发布日期
    pub fn with_sitemap(mut self, dates: &'a SitemapDates) -> Self {
        self.sitemap = Some(dates);
        self
    }

    pub async fn run(
        &self,
        search_url: &str,
        quota: usize,
        budget: &mut QuotaAllocator,
    ) -> AppResult<SourceReport> {
        let source = self.layout.source;
        let mut report = SourceReport::new(source);

        if quota == 0 || !budget.can_accept() {
            info!("⏭️ {} 配额为 0 或总数已满，跳过", source);
            return Ok(report);
        }

        info!("🌐 打开搜索页: {}", search_url);
        let page = self.ctx.driver.open(search_url).await?;
        let result = self.walk(page.as_ref(), quota, budget, &mut report).await;
        if let Err(e) = page.close().await {
            debug!("关闭搜索页失败: {}", e);
        }
        result?;

        Ok(report)
    }

    async fn walk(
        &self,
        page: &dyn PageSession,
        quota: usize,
        budget: &mut QuotaAllocator,
        report: &mut SourceReport,
    ) -> AppResult<()> {
        let source = self.layout.source;

        match self.ctx.wait.settle(page, self.layout.card).await {
            Ok(()) => {}
            Err(e) if e.is_render_timeout() => {
                warn!("⚠️ {} 搜索页没有渲染出职位卡片: {}", source, e);
            }
            Err(e) => return Err(e),
        }

        let cards = page.find_all(self.layout.card).await?;
        let found = cards.len();
        let cards: Vec<Box<dyn DomNode>> = cards.into_iter().take(quota).collect();
        report.candidates = cards.len();
        info!("✓ {} 找到 {} 个职位，处理前 {} 个", source, found, cards.len());

        for (idx, card) in cards.iter().enumerate() {
            let position = idx + 1;
            if !budget.can_accept() {
                info!("🛑 总数已达上限，停止 {} 的剩余候选", source);
                break;
            }

            match self.process_card(card.as_ref()).await {
                Ok(CardOutcome::Ready(posting)) => {
                    let title = truncate_text(posting.title(), 50);
                    if budget.accept(posting) {
                        report.accepted += 1;
                        info!("[{} #{}] ✅ {}", source, position, title);
                    } else {
                        info!("🛑 总数已达上限，停止 {} 的剩余候选", source);
                        break;
                    }
                }
                Ok(CardOutcome::TagMismatch) => {
                    report.filtered += 1;
                    info!("[{} #{}] ⏭️ 标签不匹配，跳过", source, position);
                }
                Ok(CardOutcome::OutOfRange(date)) => {
                    report.filtered += 1;
                    info!("[{} #{}] ⏭️ 发布日期 {} 不在范围内，跳过", source, position, date);
                }
                Err(e) => {
                    report.failed += 1;
                    warn!("[{} #{}] ⚠️ 处理失败，跳过: {}", source, position, e);
                }
            }
        }

        Ok(())
    }

    async fn process_card(&self, card: &dyn DomNode) -> AppResult<CardOutcome> {
        let listing = read_card(card, self.layout).await?;
        debug!("卡片: {:?}", listing);

        if let Some(predicate) = self.tag_filter {
            if !predicate.allows(&listing.tags) {
                return Ok(CardOutcome::TagMismatch);
            }
        }

        let mut fields = JobFields {
            title: listing.title,
            company: listing.company,
            location: listing.location,
            url: listing.url.clone(),
            ..Default::default()
        };

        if let Some(url) = listing.url.as_deref() {
            let detail = self.visit_detail(url).await?;
            if let Some(structured) = &detail.structured {
                fields.title = fields.title.or_else(|| structured.title.clone());
                fields.company = fields.company.or_else(|| structured.company());
                fields.location = fields.location.or_else(|| structured.locality());
            }
            fields.description = Some(detail.description);
            fields.upload_date = detail.upload_date;
            fields.deadline = detail.deadline;
        }

        if fields.upload_date.is_none() {
            fields.upload_date = listing
                .url
                .as_deref()
                .and_then(|url| self.sitemap.and_then(|dates| dates.get(url)))
                .map(str::to_string);
        }

        if let Some(date) = fields.upload_date.as_deref() {
            if !self.ctx.filter.includes_at(date, self.ctx.today) {
                return Ok(CardOutcome::OutOfRange(date.to_string()));
            }
        }

        Ok(CardOutcome::Ready(JobPosting::new(fields, self.layout.source)))
    }

    /// 打开详情页，读取后在所有路径上关闭
    async fn visit_detail(&self, url: &str) -> AppResult<DetailFields> {
        let page = self.ctx.driver.open(url).await?;
        let result = self.read_detail_page(page.as_ref()).await;
        if let Err(e) = page.close().await {
            debug!("关闭详情页失败: {}", e);
        }
        result
    }

    async fn read_detail_page(&self, page: &dyn PageSession) -> AppResult<DetailFields> {
        match self.ctx.wait.settle(page, self.layout.detail_ready).await {
            Ok(()) => {}
            Err(e) if e.is_render_timeout() => {
                debug!("{} 详情页等待超时，继续提取: {}", page.url(), e);
            }
            Err(e) => return Err(e),
        }
        read_detail(page, self.layout, self.ctx.today).await
    }
}
