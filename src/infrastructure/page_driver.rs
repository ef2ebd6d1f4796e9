//! 页面驱动抽象 - 基础设施层
//!
//! 只暴露"打开页面 / 查询 DOM / 等待渲染"的能力，不认识任何招聘网站。

use crate::error::{AppError, AppResult, ExtractError};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::debug;

/// DOM 中的一个元素
#[async_trait]
pub trait DomNode: Send + Sync {
    /// 查询第一个匹配的子孙元素
    async fn find(&self, selector: &str) -> AppResult<Option<Box<dyn DomNode>>>;
    /// 查询所有匹配的子孙元素
    async fn find_all(&self, selector: &str) -> AppResult<Vec<Box<dyn DomNode>>>;
    /// 渲染后的可见文本
    async fn text(&self) -> AppResult<String>;
    /// 内部 HTML
    async fn inner_html(&self) -> AppResult<String>;
    /// 属性值
    async fn attribute(&self, name: &str) -> AppResult<Option<String>>;
}

/// 一个已打开的页面
///
/// 调用方负责在所有退出路径上调用 [`PageSession::close`]
#[async_trait]
pub trait PageSession: Send + Sync {
    /// 页面地址
    fn url(&self) -> &str;

    async fn find(&self, selector: &str) -> AppResult<Option<Box<dyn DomNode>>>;

    async fn find_all(&self, selector: &str) -> AppResult<Vec<Box<dyn DomNode>>>;

    /// 固定等待
    async fn wait_fixed(&self, duration: Duration) {
        sleep(duration).await;
    }

    /// 轮询直到选择器出现或超时，返回是否出现
    async fn wait_for(
        &self,
        selector: &str,
        timeout: Duration,
        poll: Duration,
    ) -> AppResult<bool> {
        let started = Instant::now();
        loop {
            if self.find(selector).await?.is_some() {
                debug!("{} 已就绪 ({}ms)", selector, started.elapsed().as_millis());
                return Ok(true);
            }
            if started.elapsed() >= timeout {
                return Ok(false);
            }
            sleep(poll).await;
        }
    }

    /// 关闭页面
    async fn close(self: Box<Self>) -> AppResult<()>;
}

/// 页面驱动：打开并导航到新页面
#[async_trait]
pub trait PageDriver: Send + Sync {
    async fn open(&self, url: &str) -> AppResult<Box<dyn PageSession>>;
}

/// 页面渲染等待策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPolicy {
    /// 固定延迟。与异步渲染存在竞争，仅作为保守的后备方案
    Fixed(Duration),
    /// 轮询就绪选择器直到出现或超时
    Condition { timeout: Duration, poll: Duration },
}

impl WaitPolicy {
    /// 等待页面渲染出 `ready_selector`
    ///
    /// 条件等待超时返回 [`ExtractError::RenderTimeout`]；固定等待总是成功
    pub async fn settle(&self, page: &dyn PageSession, ready_selector: &str) -> AppResult<()> {
        match *self {
            WaitPolicy::Fixed(delay) => {
                page.wait_fixed(delay).await;
                Ok(())
            }
            WaitPolicy::Condition { timeout, poll } => {
                if page.wait_for(ready_selector, timeout, poll).await? {
                    Ok(())
                } else {
                    Err(ExtractError::RenderTimeout {
                        selector: ready_selector.to_string(),
                        timeout_ms: timeout.as_millis() as u64,
                    }
                    .into())
                }
            }
        }
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        WaitPolicy::Condition {
            timeout: Duration::from_secs(10),
            poll: Duration::from_millis(250),
        }
    }
}

// ========== 便捷查询 ==========

/// 查询元素文本，未找到或为空时返回 `None`
pub async fn text_of(scope: &dyn DomNode, selector: &str) -> AppResult<Option<String>> {
    match scope.find(selector).await? {
        Some(node) => Ok(non_empty(node.text().await?)),
        None => {
            debug!("{}", AppError::selector_miss(selector));
            Ok(None)
        }
    }
}

/// 在页面范围内查询元素文本
pub async fn page_text_of(page: &dyn PageSession, selector: &str) -> AppResult<Option<String>> {
    match page.find(selector).await? {
        Some(node) => Ok(non_empty(node.text().await?)),
        None => {
            debug!("{}: {}", page.url(), AppError::selector_miss(selector));
            Ok(None)
        }
    }
}

/// 查询元素属性，未找到时返回 `None`
pub async fn attr_of(scope: &dyn DomNode, selector: &str, name: &str) -> AppResult<Option<String>> {
    match scope.find(selector).await? {
        Some(node) => Ok(node.attribute(name).await?.and_then(non_empty)),
        None => {
            debug!("{}", AppError::selector_miss(selector));
            Ok(None)
        }
    }
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
