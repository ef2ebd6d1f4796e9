//! Platsbanken（Arbetsförmedlingen）适配器

use crate::error::AppResult;
use crate::models::{SearchQuery, Source};
use crate::services::QuotaAllocator;
use crate::sources::extract::{build_search_url, DescriptionRegion, SiteLayout};
use crate::sources::listing::ListingRun;
use crate::sources::{ScrapeCtx, SourceAdapter, SourceReport};
use async_trait::async_trait;

const SEARCH_URL: &str = "https://arbetsformedlingen.se/platsbanken/annonser";

pub const LAYOUT: SiteLayout = SiteLayout {
    source: Source::Platsbanken,
    base_url: "https://arbetsformedlingen.se",
    card: "div.card-container",
    link: "h3 a",
    title: "h3 a",
    company: "strong.pb-company-name",
    location: "strong.pb-job-location",
    tags: None,
    detail_ready: "h1",
    upload_date: "div.published-date",
    deadline: "div.last-application-date",
    description: &[
        DescriptionRegion::Selector("div.job-description"),
        DescriptionRegion::Headed {
            container: "section",
            heading: "Om jobbet",
        },
    ],
};

pub struct PlatsbankenAdapter {
    ctx: ScrapeCtx,
}

impl PlatsbankenAdapter {
    pub fn new(ctx: ScrapeCtx) -> Self {
        Self { ctx }
    }

    /// 关键词与地点合并为一个自由文本查询
    pub fn search_url(query: &SearchQuery) -> AppResult<String> {
        let q = format!("{} {}", query.keyword, query.location);
        build_search_url(SEARCH_URL, &[("q", q.trim().to_string())])
    }
}

#[async_trait]
impl SourceAdapter for PlatsbankenAdapter {
    fn source(&self) -> Source {
        Source::Platsbanken
    }

    async fn scrape(
        &self,
        query: &SearchQuery,
        quota: usize,
        budget: &mut QuotaAllocator,
    ) -> AppResult<SourceReport> {
        let url = Self::search_url(query)?;
        ListingRun::new(&self.ctx, &LAYOUT)
            .run(&url, quota, budget)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url() {
        let query = SearchQuery::new("sjuksköterska", "Umeå");
        let url = PlatsbankenAdapter::search_url(&query).unwrap();
        assert_eq!(
            url,
            "https://arbetsformedlingen.se/platsbanken/annonser?q=sjuksk%C3%B6terska+Ume%C3%A5"
        );
    }
}
