//! 静态 HTML 页面驱动 - 基础设施层
//!
//! 不执行 JS：页面要么通过 HTTP 直接获取，要么来自内存中的固定页面表。
//! 适用于服务端渲染的站点，以及离线测试。

use crate::config::Config;
use crate::error::{AppError, AppResult, NetworkError};
use crate::infrastructure::page_driver::{DomNode, PageDriver, PageSession};
use async_trait::async_trait;
use reqwest::Client;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// 会产生换行的块级元素
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "li", "ul", "ol", "br", "h1", "h2", "h3", "h4", "h5", "h6", "section",
    "article", "header", "footer", "main", "tr", "table", "dd", "dt",
];

const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

enum HtmlSource {
    Http(Client),
    Fixtures(HashMap<String, String>),
}

/// 静态 HTML 驱动
pub struct StaticHtmlDriver {
    source: HtmlSource,
}

impl StaticHtmlDriver {
    /// 通过 HTTP 获取页面
    pub fn http(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            source: HtmlSource::Http(client),
        })
    }

    /// 使用固定页面表（URL → HTML）
    pub fn from_fixtures<I, K, V>(pages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            source: HtmlSource::Fixtures(
                pages
                    .into_iter()
                    .map(|(url, html)| (url.into(), html.into()))
                    .collect(),
            ),
        }
    }

    async fn fetch(&self, url: &str) -> AppResult<String> {
        match &self.source {
            HtmlSource::Fixtures(pages) => pages.get(url).cloned().ok_or_else(|| {
                AppError::navigation_failed(
                    url,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "页面不存在"),
                )
            }),
            HtmlSource::Http(client) => {
                let response = client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| AppError::navigation_failed(url, e))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(NetworkError::BadStatus {
                        url: url.to_string(),
                        status: status.as_u16(),
                    }
                    .into());
                }
                Ok(response.text().await?)
            }
        }
    }
}

#[async_trait]
impl PageDriver for StaticHtmlDriver {
    async fn open(&self, url: &str) -> AppResult<Box<dyn PageSession>> {
        let html = self.fetch(url).await?;
        debug!("已加载 {} ({} 字节)", url, html.len());
        Ok(Box::new(StaticPage {
            url: url.to_string(),
            root: HtmlNode::document(html),
        }))
    }
}

/// 静态页面
pub struct StaticPage {
    url: String,
    root: HtmlNode,
}

#[async_trait]
impl PageSession for StaticPage {
    fn url(&self) -> &str {
        &self.url
    }

    async fn find(&self, selector: &str) -> AppResult<Option<Box<dyn DomNode>>> {
        self.root.find(selector).await
    }

    async fn find_all(&self, selector: &str) -> AppResult<Vec<Box<dyn DomNode>>> {
        self.root.find_all(selector).await
    }

    async fn close(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}

/// 元素快照：只保存字符串，查询时重新解析
#[derive(Debug, Clone)]
struct HtmlNode {
    html: String,
    inner_html: String,
    text: String,
    attrs: Vec<(String, String)>,
    is_document: bool,
}

impl HtmlNode {
    fn document(html: String) -> Self {
        let doc = Html::parse_document(&html);
        let root = doc.root_element();
        Self {
            text: visible_text(root),
            inner_html: root.inner_html(),
            attrs: Vec::new(),
            html,
            is_document: true,
        }
    }

    fn from_element(el: ElementRef<'_>) -> Self {
        Self {
            html: el.html(),
            inner_html: el.inner_html(),
            text: visible_text(el),
            attrs: el
                .value()
                .attrs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            is_document: false,
        }
    }

    fn select(&self, selector: &str, limit: Option<usize>) -> AppResult<Vec<HtmlNode>> {
        let parsed = Selector::parse(selector)
            .map_err(|e| AppError::invalid_selector(selector, format!("{:?}", e)))?;
        let limit = limit.unwrap_or(usize::MAX);

        if self.is_document {
            let doc = Html::parse_document(&self.html);
            return Ok(doc
                .select(&parsed)
                .take(limit)
                .map(HtmlNode::from_element)
                .collect());
        }

        // 片段被包在 <html> 里，第一个子元素才是自身；只在子孙中查询
        let fragment = Html::parse_fragment(&self.html);
        let Some(own) = fragment
            .root_element()
            .children()
            .find_map(ElementRef::wrap)
        else {
            return Ok(Vec::new());
        };
        Ok(own
            .select(&parsed)
            .take(limit)
            .map(HtmlNode::from_element)
            .collect())
    }
}

#[async_trait]
impl DomNode for HtmlNode {
    async fn find(&self, selector: &str) -> AppResult<Option<Box<dyn DomNode>>> {
        Ok(self
            .select(selector, Some(1))?
            .into_iter()
            .next()
            .map(|node| Box::new(node) as Box<dyn DomNode>))
    }

    async fn find_all(&self, selector: &str) -> AppResult<Vec<Box<dyn DomNode>>> {
        Ok(self
            .select(selector, None)?
            .into_iter()
            .map(|node| Box::new(node) as Box<dyn DomNode>)
            .collect())
    }

    async fn text(&self) -> AppResult<String> {
        Ok(self.text.clone())
    }

    async fn inner_html(&self) -> AppResult<String> {
        Ok(self.inner_html.clone())
    }

    async fn attribute(&self, name: &str) -> AppResult<Option<String>> {
        Ok(self
            .attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone()))
    }
}

/// 近似浏览器 innerText：块级元素换行，跳过脚本和样式
fn visible_text(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in el.descendants() {
        match node.value() {
            Node::Text(text) => {
                let hidden = node
                    .parent()
                    .and_then(|p| p.value().as_element().map(|e| e.name().to_string()))
                    .map(|name| INVISIBLE_ELEMENTS.contains(&name.as_str()))
                    .unwrap_or(false);
                if !hidden {
                    out.push_str(text);
                }
            }
            Node::Element(element) if BLOCK_ELEMENTS.contains(&element.name()) => {
                out.push('\n');
            }
            _ => {}
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <ul>
          <li class="card"><h3>Rustutvecklare</h3><a class="link" href="/jobb/1">Läs mer</a></li>
          <li class="card"><h3>Testare</h3></li>
        </ul>
        <script>var x = 1;</script>
        <main><p>Första stycket</p><p>Andra stycket</p></main>
    </body></html>"#;

    fn driver() -> StaticHtmlDriver {
        StaticHtmlDriver::from_fixtures([("https://example.se/", PAGE)])
    }

    #[tokio::test]
    async fn test_find_all_and_scoped_find() {
        let page = driver().open("https://example.se/").await.unwrap();
        let cards = page.find_all("li.card").await.unwrap();
        assert_eq!(cards.len(), 2);

        let title = cards[0].find("h3").await.unwrap().unwrap();
        assert_eq!(title.text().await.unwrap(), "Rustutvecklare");

        let link = cards[0].find("a.link").await.unwrap().unwrap();
        assert_eq!(link.attribute("href").await.unwrap().as_deref(), Some("/jobb/1"));

        assert!(cards[1].find("a.link").await.unwrap().is_none());
        // 查询不包含元素自身
        assert!(cards[0].find("li.card").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_text_skips_scripts_and_breaks_blocks() {
        let page = driver().open("https://example.se/").await.unwrap();
        let main = page.find("main").await.unwrap().unwrap();
        assert_eq!(main.text().await.unwrap(), "Första stycket\nAndra stycket");

        let body = page.find("body").await.unwrap().unwrap();
        assert!(!body.text().await.unwrap().contains("var x"));
    }

    #[tokio::test]
    async fn test_unknown_fixture_is_navigation_failure() {
        let err = driver().open("https://example.se/saknas").await.err().unwrap();
        assert!(err.is_page_load_failure());
    }

    #[tokio::test]
    async fn test_invalid_selector_is_error() {
        let page = driver().open("https://example.se/").await.unwrap();
        assert!(page.find("li[").await.is_err());
    }

    #[tokio::test]
    async fn test_wait_for_present_selector() {
        let page = driver().open("https://example.se/").await.unwrap();
        let ready = page
            .wait_for("main", Duration::from_millis(50), Duration::from_millis(10))
            .await
            .unwrap();
        assert!(ready);

        let missing = page
            .wait_for(".never", Duration::from_millis(30), Duration::from_millis(10))
            .await
            .unwrap();
        assert!(!missing);
    }
}
