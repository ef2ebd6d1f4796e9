//! 各来源适配器在固定 HTML 页面上的端到端测试

use chrono::NaiveDate;
use job_scraper::infrastructure::{PageDriver, StaticHtmlDriver, WaitPolicy};
use job_scraper::models::{SearchQuery, Source, NA};
use job_scraper::services::{DateRangeFilter, QuotaAllocator, SitemapDates};
use job_scraper::sources::{
    DemandoAdapter, JobbsafariAdapter, PlatsbankenAdapter, ScrapeCtx, SitemapSource,
    SourceAdapter,
};
use std::sync::Arc;
use std::time::Duration;

const JOBBSAFARI_SEARCH: &str = include_str!("fixtures/jobbsafari_search.html");
const JOBBSAFARI_LAGER: &str = include_str!("fixtures/jobbsafari_lagerarbetare.html");
const JOBBSAFARI_TRUCK: &str = include_str!("fixtures/jobbsafari_truckforare.html");
const PLATSBANKEN_SEARCH: &str = include_str!("fixtures/platsbanken_search.html");
const PLATSBANKEN_1: &str = include_str!("fixtures/platsbanken_28000001.html");
const PLATSBANKEN_2: &str = include_str!("fixtures/platsbanken_28000002.html");
const DEMANDO_SEARCH: &str = include_str!("fixtures/demando_search.html");
const DEMANDO_RUST: &str = include_str!("fixtures/demando_rust_backend.html");

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
}

fn ctx(pages: Vec<(String, &str)>, days_back: Option<u32>) -> ScrapeCtx {
    let driver: Arc<dyn PageDriver> = Arc::new(StaticHtmlDriver::from_fixtures(pages));
    let wait = WaitPolicy::Condition {
        timeout: Duration::from_millis(50),
        poll: Duration::from_millis(10),
    };
    ScrapeCtx::new(driver, wait, DateRangeFilter::new(days_back)).with_today(today())
}

fn jobbsafari_query() -> SearchQuery {
    SearchQuery::new("lager", "Göteborg")
}

fn jobbsafari_pages() -> Vec<(String, &'static str)> {
    vec![
        (
            JobbsafariAdapter::search_url(&jobbsafari_query()).unwrap(),
            JOBBSAFARI_SEARCH,
        ),
        (
            "https://jobbsafari.se/lediga-jobb/lagerarbetare-1".to_string(),
            JOBBSAFARI_LAGER,
        ),
        (
            "https://jobbsafari.se/lediga-jobb/truckforare-2".to_string(),
            JOBBSAFARI_TRUCK,
        ),
    ]
}

#[tokio::test]
async fn test_jobbsafari_extracts_listing_and_detail_fields() {
    let adapter = JobbsafariAdapter::new(ctx(jobbsafari_pages(), None));
    let mut budget = QuotaAllocator::new(5, &[Source::Jobbsafari]);

    let report = adapter
        .scrape(&jobbsafari_query(), 5, &mut budget)
        .await
        .unwrap();

    assert_eq!(report.candidates, 3);
    assert_eq!(report.accepted, 3);
    assert_eq!(report.failed, 0);

    let postings = budget.postings();
    let lager = &postings[0];
    assert_eq!(lager.title(), "Lagerarbetare");
    assert_eq!(lager.company(), "Acme Logistik AB");
    assert_eq!(lager.location(), "Göteborg");
    assert_eq!(lager.url(), "https://jobbsafari.se/lediga-jobb/lagerarbetare-1");
    assert_eq!(lager.upload_date(), "2024-01-05");
    assert_eq!(lager.deadline(), "2024-02-01");
    assert!(lager
        .description()
        .contains("Vi söker en noggrann lagerarbetare till vårt lager i Göteborg."));
    assert!(lager.description().contains("Tillträde enligt överenskommelse."));
    assert!(!lager.description().contains("familjeföretag"));
    assert_eq!(lager.source(), Source::Jobbsafari);

    // 卡片缺少公司，由结构化元数据补齐；描述与日期也来自结构化元数据
    let truck = &postings[1];
    assert_eq!(truck.company(), "Truck & Co");
    assert_eq!(truck.location(), "Mölndal");
    assert_eq!(truck.upload_date(), "2024-01-08");
    assert_eq!(truck.deadline(), "2024-01-31");
    assert!(truck.description().starts_with("Vi söker truckförare med B-körkort"));
    assert!(truck.description().contains("Skiftarbete & helger."));
    assert!(!truck.description().contains('<'));

    // 没有详情链接：只有卡片字段
    let plock = &postings[2];
    assert_eq!(plock.title(), "Plockare, extrajobb");
    assert_eq!(plock.company(), "Plock & Pack");
    assert_eq!(plock.location(), NA);
    assert_eq!(plock.url(), NA);
    assert_eq!(plock.description(), NA);
    assert_eq!(plock.upload_date(), NA);
}

#[tokio::test]
async fn test_jobbsafari_candidates_are_truncated_to_quota() {
    let adapter = JobbsafariAdapter::new(ctx(jobbsafari_pages(), None));
    let mut budget = QuotaAllocator::new(1, &[Source::Jobbsafari]);

    let report = adapter
        .scrape(&jobbsafari_query(), 1, &mut budget)
        .await
        .unwrap();

    assert_eq!(report.candidates, 1);
    assert_eq!(budget.accepted_count(), 1);
    assert_eq!(budget.postings()[0].title(), "Lagerarbetare");
}

#[tokio::test]
async fn test_date_window_filters_before_acceptance() {
    // 截止日 2024-01-07：01-05 被过滤，01-08 与无日期的保留
    let adapter = JobbsafariAdapter::new(ctx(jobbsafari_pages(), Some(3)));
    let mut budget = QuotaAllocator::new(5, &[Source::Jobbsafari]);

    let report = adapter
        .scrape(&jobbsafari_query(), 5, &mut budget)
        .await
        .unwrap();

    assert_eq!(report.filtered, 1);
    assert_eq!(report.accepted, 2);
    let titles: Vec<&str> = budget.postings().iter().map(|p| p.title()).collect();
    assert_eq!(titles, vec!["Truckförare", "Plockare, extrajobb"]);
}

#[tokio::test]
async fn test_detail_failure_skips_only_that_candidate() {
    let pages: Vec<(String, &str)> = jobbsafari_pages()
        .into_iter()
        .filter(|(url, _)| !url.ends_with("lagerarbetare-1"))
        .collect();
    let adapter = JobbsafariAdapter::new(ctx(pages, None));
    let mut budget = QuotaAllocator::new(5, &[Source::Jobbsafari]);

    let report = adapter
        .scrape(&jobbsafari_query(), 5, &mut budget)
        .await
        .unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.accepted, 2);
    assert!(budget.postings().iter().all(|p| p.title() != "Lagerarbetare"));
}

#[tokio::test]
async fn test_search_page_failure_is_source_error() {
    let adapter = JobbsafariAdapter::new(ctx(Vec::new(), None));
    let mut budget = QuotaAllocator::new(5, &[Source::Jobbsafari]);

    let err = adapter
        .scrape(&jobbsafari_query(), 5, &mut budget)
        .await
        .unwrap_err();

    assert!(err.is_page_load_failure());
    assert_eq!(budget.accepted_count(), 0);
}

#[tokio::test]
async fn test_adapter_stops_when_budget_refuses() {
    let adapter = JobbsafariAdapter::new(ctx(jobbsafari_pages(), None));
    // 总上限 2，但给来源更大的配额
    let mut budget = QuotaAllocator::new(2, &[Source::Jobbsafari]);

    let report = adapter
        .scrape(&jobbsafari_query(), 5, &mut budget)
        .await
        .unwrap();

    assert_eq!(report.accepted, 2);
    assert_eq!(budget.accepted_count(), 2);
}

#[tokio::test]
async fn test_platsbanken_description_fallback_chain() {
    let query = SearchQuery::new("sjuksköterska", "Umeå");
    let pages = vec![
        (
            PlatsbankenAdapter::search_url(&query).unwrap(),
            PLATSBANKEN_SEARCH,
        ),
        (
            "https://arbetsformedlingen.se/platsbanken/annonser/28000001".to_string(),
            PLATSBANKEN_1,
        ),
        (
            "https://arbetsformedlingen.se/platsbanken/annonser/28000002".to_string(),
            PLATSBANKEN_2,
        ),
    ];
    let adapter = PlatsbankenAdapter::new(ctx(pages, None));
    let mut budget = QuotaAllocator::new(5, &[Source::Platsbanken]);

    let report = adapter.scrape(&query, 5, &mut budget).await.unwrap();
    assert_eq!(report.accepted, 2);

    let akuten = &budget.postings()[0];
    assert_eq!(akuten.company(), "Region Västerbotten");
    assert_eq!(akuten.upload_date(), "2024-01-03");
    assert_eq!(akuten.deadline(), "2024-01-28");
    // 过短的描述区域被跳过，改用 "Om jobbet" 区域
    assert!(akuten
        .description()
        .contains("Du kommer att arbeta på akutmottagningen"));
    assert!(!akuten.description().contains("Kort text"));

    // 所有策略都失败时为哨兵值
    let vikariat = &budget.postings()[1];
    assert_eq!(vikariat.title(), "Undersköterska, sommarvikariat");
    assert_eq!(vikariat.description(), NA);
    assert_eq!(vikariat.upload_date(), NA);
    assert_eq!(vikariat.source(), Source::Platsbanken);
}

#[tokio::test]
async fn test_demando_tag_predicate_and_sitemap_backfill() {
    let query = SearchQuery::new("rust", "Stockholm");
    // 被标签过滤的卡片没有详情页；如果访问了会计入失败
    let pages = vec![
        (DemandoAdapter::search_url(&query).unwrap(), DEMANDO_SEARCH),
        ("https://demando.se/jobb/rust-backend".to_string(), DEMANDO_RUST),
    ];
    let mut dates = SitemapDates::new();
    // 站点地图里的地址带末尾斜杠
    dates.insert("https://demando.se/jobb/rust-backend/", "2024-01-09");
    let adapter = DemandoAdapter::new(
        ctx(pages, Some(7)),
        vec!["konsult".to_string()],
        SitemapSource::Preloaded(dates),
    );
    let mut budget = QuotaAllocator::new(5, &[Source::Demando]);

    let report = adapter.scrape(&query, 5, &mut budget).await.unwrap();

    assert_eq!(report.candidates, 3);
    assert_eq!(report.filtered, 2);
    assert_eq!(report.failed, 0);
    assert_eq!(report.accepted, 1);

    let posting = &budget.postings()[0];
    assert_eq!(posting.title(), "Backendutvecklare Rust");
    assert_eq!(posting.company(), "Fintech AB");
    assert_eq!(posting.url(), "https://demando.se/jobb/rust-backend");
    assert_eq!(posting.upload_date(), "2024-01-09");
    assert_eq!(posting.deadline(), NA);
    assert!(posting
        .description()
        .starts_with("Vi bygger ett distribuerat betalsystem i Rust"));
}

#[tokio::test]
async fn test_zero_quota_does_no_work() {
    let adapter = JobbsafariAdapter::new(ctx(Vec::new(), None));
    let mut budget = QuotaAllocator::new(5, &[Source::Jobbsafari]);

    let report = adapter
        .scrape(&jobbsafari_query(), 0, &mut budget)
        .await
        .unwrap();

    assert_eq!(report.candidates, 0);
    assert_eq!(budget.accepted_count(), 0);
}
