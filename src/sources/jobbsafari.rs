//! Jobbsafari 适配器

use crate::error::AppResult;
use crate::models::{SearchQuery, Source};
use crate::services::QuotaAllocator;
use crate::sources::extract::{build_search_url, DescriptionRegion, SiteLayout};
use crate::sources::listing::ListingRun;
use crate::sources::{ScrapeCtx, SourceAdapter, SourceReport};
use async_trait::async_trait;

const SEARCH_URL: &str = "https://jobbsafari.se/lediga-jobb";

pub const LAYOUT: SiteLayout = SiteLayout {
    source: Source::Jobbsafari,
    base_url: "https://jobbsafari.se",
    card: "li.c-iSYTDB",
    link: "a.c-PJLV",
    title: "h3.c-fbRPId",
    company: "a[href*='/lediga-jobb/foretag/']",
    location: "a[href*='/lediga-jobb/ort/']",
    tags: None,
    detail_ready: "main",
    upload_date: "div.c-jalXcY:nth-child(2) span.c-fbRPId",
    deadline: "div.c-jalXcY:nth-child(3) span.c-fbRPId",
    description: &[DescriptionRegion::Headed {
        container: "section",
        heading: "Om jobbet",
    }],
};

pub struct JobbsafariAdapter {
    ctx: ScrapeCtx,
}

impl JobbsafariAdapter {
    pub fn new(ctx: ScrapeCtx) -> Self {
        Self { ctx }
    }

    /// `?sok=<关键词>&sok=<关键词>, <地点>`
    pub fn search_url(query: &SearchQuery) -> AppResult<String> {
        build_search_url(
            SEARCH_URL,
            &[
                ("sok", query.keyword.clone()),
                ("sok", format!("{}, {}", query.keyword, query.location)),
            ],
        )
    }
}

#[async_trait]
impl SourceAdapter for JobbsafariAdapter {
    fn source(&self) -> Source {
        Source::Jobbsafari
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
        let url = JobbsafariAdapter::search_url(&SearchQuery::new("lager", "Borås")).unwrap();
        assert_eq!(
            url,
            "https://jobbsafari.se/lediga-jobb?sok=lager&sok=lager%2C+Bor%C3%A5s"
        );
    }
}
