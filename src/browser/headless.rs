use std::path::Path;

use crate::error::{AppError, AppResult, BrowserError};
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// 启动浏览器（默认无头模式）
///
/// `chrome_executable` 为空时由 chromiumoxide 自动查找 Chrome / Chromium
pub async fn launch_browser(chrome_executable: Option<&str>, headless: bool) -> AppResult<Browser> {
    info!("🚀 启动{}浏览器...", if headless { "无头" } else { "" });

    let mut builder = BrowserConfig::builder();
    builder = if headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };
    if let Some(path) = chrome_executable {
        debug!("浏览器路径: {}", path);
        builder = builder.chrome_executable(Path::new(path));
    }

    let config = builder
        .args(vec![
            "--disable-gpu",
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--lang=sv-SE",
        ])
        .build()
        .map_err(|e| {
            error!("配置浏览器失败: {}", e);
            AppError::Browser(BrowserError::ConfigurationFailed { message: e })
        })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        AppError::Browser(BrowserError::LaunchFailed { source: Box::new(e) })
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    sleep(tokio::time::Duration::from_millis(300)).await;

    Ok(browser)
}
