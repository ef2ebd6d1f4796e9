mod connection;
mod headless;

pub use connection::connect_to_browser;
pub use headless::launch_browser;

use crate::config::Config;
use crate::error::AppResult;
use chromiumoxide::Browser;

/// 按配置获取浏览器：配置了调试端口则连接，否则启动新的浏览器
///
/// 返回值中的布尔值表示浏览器是否由本程序启动（需要在结束时关闭）
pub async fn acquire_browser(config: &Config) -> AppResult<(Browser, bool)> {
    match config.browser_debug_port {
        Some(port) => Ok((connect_to_browser(port).await?, false)),
        None => {
            let browser =
                launch_browser(config.chrome_executable.as_deref(), config.headless).await?;
            Ok((browser, true))
        }
    }
}
