//! 站点地图服务 - 业务能力层
//!
//! 一次 GET 获取 sitemap.xml，解析为 URL → 发布日期，用于回填缺失的日期。

use crate::config::Config;
use crate::error::{AppResult, NetworkError};
use chrono::{DateTime, NaiveDate};
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// URL → `YYYY-MM-DD`
///
/// 键是规范化后的 URL：去掉查询串、片段和路径末尾的 `/`，
/// 所以 `<loc>` 与卡片链接只差这些部分时仍能对上。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapDates {
    dates: HashMap<String, String>,
}

impl SitemapDates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: &str, date: impl Into<String>) {
        self.dates.insert(canonical_url(url), date.into());
    }

    pub fn get(&self, url: &str) -> Option<&str> {
        self.dates.get(&canonical_url(url)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// 无法解析的 URL 原样（去首尾空白）作为键
fn canonical_url(raw: &str) -> String {
    let raw = raw.trim();
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };
    url.set_query(None);
    url.set_fragment(None);
    let path = url.path().trim_end_matches('/').to_string();
    url.set_path(&path);
    url.to_string()
}

/// 站点地图客户端
pub struct SitemapClient {
    client: Client,
}

impl SitemapClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    /// 获取并解析站点地图
    pub async fn fetch(&self, url: &str) -> AppResult<SitemapDates> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }
        let body = response.text().await?;
        parse_sitemap(&body).map_err(|message| {
            NetworkError::SitemapFetchFailed {
                url: url.to_string(),
                message,
            }
            .into()
        })
    }

    /// 获取失败时记录日志并返回空表，不影响调用方继续抓取
    pub async fn fetch_or_empty(&self, url: &str) -> SitemapDates {
        match self.fetch(url).await {
            Ok(dates) => {
                info!("🗺️ 站点地图加载完成: {} 条日期", dates.len());
                dates
            }
            Err(e) => {
                warn!("⚠️ 站点地图获取失败，不回填日期: {}", e);
                SitemapDates::new()
            }
        }
    }
}

/// 解析 `<urlset>`，只保留带有可识别 `<lastmod>` 的条目
pub fn parse_sitemap(xml: &str) -> Result<SitemapDates, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut dates = SitemapDates::new();
    let mut buf = Vec::new();
    let mut in_url = false;
    let mut current_tag = String::new();
    let mut current_loc = String::new();
    let mut current_lastmod = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if name == "url" {
                    in_url = true;
                    current_loc.clear();
                    current_lastmod.clear();
                }
                current_tag = name;
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if name == "url" && in_url {
                    if let Some(date) = normalize_lastmod(&current_lastmod) {
                        if !current_loc.is_empty() {
                            dates.insert(&current_loc, date);
                        }
                    }
                    in_url = false;
                }
                current_tag.clear();
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().unwrap_or_default().trim().to_string();
                if in_url && current_tag == "loc" {
                    current_loc = text;
                } else if in_url && current_tag == "lastmod" {
                    current_lastmod = text;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("XML 解析错误: {}", e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(dates)
}

fn normalize_lastmod(raw: &str) -> Option<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive().format("%Y-%m-%d").to_string());
    }
    let date_part = raw.get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_urlset() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
              <url><loc>https://demando.se/jobb/1</loc><lastmod>2024-01-05</lastmod></url>
              <url>
                <loc>https://demando.se/jobb/2</loc>
                <lastmod>2024-01-06T08:00:00+01:00</lastmod>
              </url>
              <url><loc>https://demando.se/om-oss</loc></url>
              <url><loc>https://demando.se/jobb/3</loc><lastmod>någon gång</lastmod></url>
            </urlset>"#;

        let dates = parse_sitemap(xml).unwrap();
        assert_eq!(dates.len(), 2);
        assert_eq!(dates.get("https://demando.se/jobb/1"), Some("2024-01-05"));
        assert_eq!(dates.get("https://demando.se/jobb/2"), Some("2024-01-06"));
    }

    #[test]
    fn test_lookup_ignores_trailing_slash_query_and_fragment() {
        let xml = r#"<urlset>
              <url><loc>https://Demando.se/jobb/1/</loc><lastmod>2024-01-05</lastmod></url>
              <url>
                <loc>https://demando.se/jobb/2?utm_source=sitemap</loc>
                <lastmod>2024-01-06</lastmod>
              </url>
            </urlset>"#;

        let dates = parse_sitemap(xml).unwrap();
        assert_eq!(dates.get("https://demando.se/jobb/1?ref=list"), Some("2024-01-05"));
        assert_eq!(dates.get("https://demando.se/jobb/1#ansok"), Some("2024-01-05"));
        assert_eq!(dates.get("https://demando.se/jobb/2/"), Some("2024-01-06"));
        assert_eq!(dates.get("https://demando.se/jobb/12"), None);
    }

    #[test]
    fn test_canonical_url() {
        assert_eq!(canonical_url(" https://demando.se/jobb/1/?a=b "), "https://demando.se/jobb/1");
        assert_eq!(canonical_url("https://demando.se/"), "https://demando.se/");
        assert_eq!(canonical_url("inte en url"), "inte en url");
    }

    #[test]
    fn test_malformed_xml_is_error() {
        assert!(parse_sitemap("<urlset><url><loc>x</loc></urlset>").is_err());
    }

    #[test]
    fn test_normalize_lastmod() {
        assert_eq!(normalize_lastmod("2024-03-01").as_deref(), Some("2024-03-01"));
        assert_eq!(normalize_lastmod("2024-03-01T10:00:00Z").as_deref(), Some("2024-03-01"));
        assert_eq!(normalize_lastmod("x"), None);
    }

    #[tokio::test]
    async fn test_unreachable_sitemap_yields_empty_map() {
        let client = SitemapClient::new(&Config::default()).unwrap();
        let dates = client.fetch_or_empty("http://127.0.0.1:9/sitemap.xml").await;
        assert!(dates.is_empty());
    }
}
