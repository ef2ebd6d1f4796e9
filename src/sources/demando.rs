//! Demando 适配器
//!
//! 与其它来源的区别：
//! - 卡片上有技能标签，进入详情页之前先按标签过滤
//! - 详情页常常没有发布日期，用站点地图的 `<lastmod>` 回填

use crate::error::AppResult;
use crate::models::{SearchQuery, Source};
use crate::services::{QuotaAllocator, SitemapClient, SitemapDates};
use crate::sources::extract::{build_search_url, DescriptionRegion, SiteLayout};
use crate::sources::listing::ListingRun;
use crate::sources::tags::TagPredicate;
use crate::sources::{ScrapeCtx, SourceAdapter, SourceReport};
use async_trait::async_trait;
use tracing::debug;

const SEARCH_URL: &str = "https://demando.se/jobs";

pub const LAYOUT: SiteLayout = SiteLayout {
    source: Source::Demando,
    base_url: "https://demando.se",
    card: "div.job-card",
    link: "a.job-card-link",
    title: "h2.job-title",
    company: "span.company-name",
    location: "span.job-location",
    tags: Some("ul.skills li"),
    detail_ready: "article",
    upload_date: "span.job-published",
    deadline: "span.job-deadline",
    description: &[DescriptionRegion::Selector("div.job-description")],
};

/// 站点地图日期来源
pub enum SitemapSource {
    /// 每次抓取前获取一次
    Remote { client: SitemapClient, url: String },
    /// 预先加载好的映射
    Preloaded(SitemapDates),
    /// 不回填
    Disabled,
}

impl SitemapSource {
    async fn load(&self) -> SitemapDates {
        match self {
            SitemapSource::Remote { client, url } => client.fetch_or_empty(url).await,
            SitemapSource::Preloaded(dates) => dates.clone(),
            SitemapSource::Disabled => SitemapDates::new(),
        }
    }
}

pub struct DemandoAdapter {
    ctx: ScrapeCtx,
    excluded_tags: Vec<String>,
    sitemap: SitemapSource,
}

impl DemandoAdapter {
    pub fn new(ctx: ScrapeCtx, excluded_tags: Vec<String>, sitemap: SitemapSource) -> Self {
        Self {
            ctx,
            excluded_tags,
            sitemap,
        }
    }

    pub fn search_url(query: &SearchQuery) -> AppResult<String> {
        build_search_url(
            SEARCH_URL,
            &[
                ("search", query.keyword.clone()),
                ("location", query.location.clone()),
            ],
        )
    }
}

#[async_trait]
impl SourceAdapter for DemandoAdapter {
    fn source(&self) -> Source {
        Source::Demando
    }

    async fn scrape(
        &self,
        query: &SearchQuery,
        quota: usize,
        budget: &mut QuotaAllocator,
    ) -> AppResult<SourceReport> {
        let url = Self::search_url(query)?;
        let predicate = TagPredicate::new(&query.keyword, &self.excluded_tags);
        let dates = if quota > 0 && budget.can_accept() {
            self.sitemap.load().await
        } else {
            SitemapDates::new()
        };
        debug!("Demando 站点地图日期: {} 条", dates.len());

        ListingRun::new(&self.ctx, &LAYOUT)
            .with_tag_filter(&predicate)
            .with_sitemap(&dates)
            .run(&url, quota, budget)
            .await
    }
}
