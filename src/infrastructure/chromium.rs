//! Chromium 页面驱动 - 基础设施层
//!
//! 持有 Browser 资源，每次 `open` 创建一个新标签页；标签页由调用方关闭。

use crate::error::{AppError, AppResult, BrowserError};
use crate::infrastructure::page_driver::{DomNode, PageDriver, PageSession};
use async_trait::async_trait;
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, Page};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::debug;

/// 基于 chromiumoxide 的驱动
pub struct ChromiumDriver {
    browser: Browser,
}

impl ChromiumDriver {
    pub fn new(browser: Browser) -> Self {
        Self { browser }
    }

    /// 关闭浏览器（仅对自行启动的浏览器有意义）
    pub async fn shutdown(mut self) -> AppResult<()> {
        self.browser.close().await?;
        Ok(())
    }
}

#[async_trait]
impl PageDriver for ChromiumDriver {
    async fn open(&self, url: &str) -> AppResult<Box<dyn PageSession>> {
        debug!("打开新标签页: {}", url);
        let page = self
            .browser
            .new_page(url)
            .await
            .map_err(|e| AppError::navigation_failed(url, e))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| AppError::navigation_failed(url, e))?;

        Ok(Box::new(ChromiumPage::new(page, url)))
    }
}

/// 一个 Chromium 标签页
///
/// 除 DOM 查询外还提供执行 JS 的能力
pub struct ChromiumPage {
    page: Page,
    url: String,
}

impl ChromiumPage {
    pub fn new(page: Page, url: impl Into<String>) -> Self {
        Self {
            page,
            url: url.into(),
        }
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> AppResult<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> AppResult<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }
}

#[async_trait]
impl PageSession for ChromiumPage {
    fn url(&self) -> &str {
        &self.url
    }

    async fn find(&self, selector: &str) -> AppResult<Option<Box<dyn DomNode>>> {
        found(selector, self.page.find_element(selector).await)
    }

    async fn find_all(&self, selector: &str) -> AppResult<Vec<Box<dyn DomNode>>> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(|e| query_failed(selector, e))?;
        Ok(elements
            .into_iter()
            .map(|el| Box::new(ChromiumNode(el)) as Box<dyn DomNode>)
            .collect())
    }

    /// 在页面内用 JS 轮询，避免每次都走 DOM.querySelector 的往返
    async fn wait_for(
        &self,
        selector: &str,
        timeout: Duration,
        poll: Duration,
    ) -> AppResult<bool> {
        let script = format!(
            "document.querySelector({}) !== null",
            serde_json::to_string(selector)?
        );
        let started = Instant::now();
        loop {
            if self.eval_as::<bool>(script.as_str()).await.unwrap_or(false) {
                debug!("{} 已就绪 ({}ms)", selector, started.elapsed().as_millis());
                return Ok(true);
            }
            if started.elapsed() >= timeout {
                return Ok(false);
            }
            sleep(poll).await;
        }
    }

    async fn close(self: Box<Self>) -> AppResult<()> {
        let url = self.url.clone();
        self.page.close().await?;
        debug!("已关闭标签页: {}", url);
        Ok(())
    }
}

/// Chromium 中的元素
struct ChromiumNode(Element);

#[async_trait]
impl DomNode for ChromiumNode {
    async fn find(&self, selector: &str) -> AppResult<Option<Box<dyn DomNode>>> {
        found(selector, self.0.find_element(selector).await)
    }

    async fn find_all(&self, selector: &str) -> AppResult<Vec<Box<dyn DomNode>>> {
        let elements = self
            .0
            .find_elements(selector)
            .await
            .map_err(|e| query_failed(selector, e))?;
        Ok(elements
            .into_iter()
            .map(|el| Box::new(ChromiumNode(el)) as Box<dyn DomNode>)
            .collect())
    }

    async fn text(&self) -> AppResult<String> {
        Ok(self.0.inner_text().await?.unwrap_or_default())
    }

    async fn inner_html(&self) -> AppResult<String> {
        Ok(self.0.inner_html().await?.unwrap_or_default())
    }

    async fn attribute(&self, name: &str) -> AppResult<Option<String>> {
        Ok(self.0.attribute(name).await?)
    }
}

/// chromiumoxide 在选择器没有命中时也返回错误，只有这种情况视为未找到
fn found(
    selector: &str,
    result: Result<Element, CdpError>,
) -> AppResult<Option<Box<dyn DomNode>>> {
    match result {
        Ok(element) => Ok(Some(Box::new(ChromiumNode(element)))),
        Err(e) if is_node_missing(&e) => {
            debug!("find({}) 未命中: {}", selector, e);
            Ok(None)
        }
        Err(e) => Err(query_failed(selector, e)),
    }
}

/// querySelector 未命中时返回 nodeId 0，随后的 DOM.describeNode 报 "Could not find node"
fn is_node_missing(err: &CdpError) -> bool {
    match err {
        CdpError::NotFound => true,
        CdpError::Chrome(e) => {
            e.message.contains("Could not find node") || e.message.contains("No node with given id")
        }
        CdpError::ChromeMessage(message) => message.starts_with("No object Id found"),
        _ => false,
    }
}

fn query_failed(selector: &str, err: CdpError) -> AppError {
    AppError::Browser(BrowserError::QueryFailed {
        selector: selector.to_string(),
        source: Box::new(err),
    })
}
