use crate::error::{AppError, AppResult, ConfigError, FileError};
use crate::infrastructure::WaitPolicy;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 页面驱动类型
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// 真实浏览器（chromiumoxide）
    Chromium,
    /// 直接获取 HTML，不执行 JS
    Static,
}

impl DriverKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "chromium" | "chrome" | "browser" => Some(DriverKind::Chromium),
            "static" | "http" => Some(DriverKind::Static),
            _ => None,
        }
    }
}

/// 渲染等待方式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitMode {
    /// 轮询就绪选择器
    Condition,
    /// 固定延迟
    Fixed,
}

/// 程序配置
///
/// 优先级：默认值 < TOML 配置文件 < 环境变量 < 命令行参数
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 页面驱动
    pub driver: DriverKind,
    /// 浏览器调试端口；设置后连接已有浏览器，否则启动无头浏览器
    pub browser_debug_port: Option<u16>,
    /// 浏览器可执行文件路径（为空时由 chromiumoxide 自动查找）
    pub chrome_executable: Option<String>,
    /// 是否无头模式
    pub headless: bool,
    /// 等待方式
    pub wait_mode: WaitMode,
    /// 条件等待的超时（毫秒）
    pub page_ready_timeout_ms: u64,
    /// 条件等待的轮询间隔（毫秒）
    pub poll_interval_ms: u64,
    /// 固定等待的延迟（毫秒）
    pub settle_delay_ms: u64,
    /// Demando 站点地图地址
    pub sitemap_url: String,
    /// HTTP 请求超时（秒）
    pub http_timeout_secs: u64,
    /// HTTP User-Agent
    pub user_agent: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            driver: DriverKind::Chromium,
            browser_debug_port: None,
            chrome_executable: None,
            headless: true,
            wait_mode: WaitMode::Condition,
            page_ready_timeout_ms: 10_000,
            poll_interval_ms: 250,
            settle_delay_ms: 3_000,
            sitemap_url: "https://demando.se/sitemap.xml".to_string(),
            http_timeout_secs: 30,
            user_agent: concat!(
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 ",
                "(KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
            )
            .to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从 TOML 文件加载，缺失的字段使用默认值
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        Self::from_toml_str(&content).map_err(|e| match e {
            AppError::File(FileError::TomlParseFailed { source, .. }) => {
                AppError::File(FileError::TomlParseFailed {
                    path: path.display().to_string(),
                    source,
                })
            }
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 默认值 + 环境变量
    pub fn from_env() -> AppResult<Self> {
        Self::default().with_env_overrides(|name| std::env::var(name).ok())
    }

    /// 可选的配置文件（`JOB_SCRAPER_CONFIG` 或显式路径）+ 环境变量
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let env_path = std::env::var("JOB_SCRAPER_CONFIG").ok();
        let base = match path.or(env_path.as_deref().map(Path::new)) {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        base.with_env_overrides(|name| std::env::var(name).ok())
    }

    /// 用环境变量覆盖当前配置；`lookup` 便于测试时注入
    pub fn with_env_overrides<F>(mut self, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DRIVER") {
            self.driver = DriverKind::parse(&v)
                .ok_or_else(|| parse_failed("DRIVER", &v, "chromium|static"))?;
        }
        if let Some(v) = lookup("BROWSER_DEBUG_PORT") {
            self.browser_debug_port = Some(parse_var("BROWSER_DEBUG_PORT", &v, "u16")?);
        }
        if let Some(v) = lookup("CHROME_EXECUTABLE") {
            self.chrome_executable = Some(v);
        }
        if let Some(v) = lookup("HEADLESS") {
            self.headless = parse_var("HEADLESS", &v, "bool")?;
        }
        if let Some(v) = lookup("WAIT_MODE") {
            self.wait_mode = match v.trim().to_lowercase().as_str() {
                "condition" => WaitMode::Condition,
                "fixed" => WaitMode::Fixed,
                _ => return Err(parse_failed("WAIT_MODE", &v, "condition|fixed")),
            };
        }
        if let Some(v) = lookup("PAGE_READY_TIMEOUT_MS") {
            self.page_ready_timeout_ms = parse_var("PAGE_READY_TIMEOUT_MS", &v, "u64")?;
        }
        if let Some(v) = lookup("POLL_INTERVAL_MS") {
            self.poll_interval_ms = parse_var("POLL_INTERVAL_MS", &v, "u64")?;
        }
        if let Some(v) = lookup("SETTLE_DELAY_MS") {
            self.settle_delay_ms = parse_var("SETTLE_DELAY_MS", &v, "u64")?;
        }
        if let Some(v) = lookup("SITEMAP_URL") {
            self.sitemap_url = v;
        }
        if let Some(v) = lookup("HTTP_TIMEOUT_SECS") {
            self.http_timeout_secs = parse_var("HTTP_TIMEOUT_SECS", &v, "u64")?;
        }
        if let Some(v) = lookup("USER_AGENT") {
            self.user_agent = v;
        }
        if let Some(v) = lookup("VERBOSE_LOGGING") {
            self.verbose_logging = parse_var("VERBOSE_LOGGING", &v, "bool")?;
        }
        Ok(self)
    }

    /// 由配置得到的等待策略
    pub fn wait_policy(&self) -> WaitPolicy {
        match self.wait_mode {
            WaitMode::Fixed => WaitPolicy::Fixed(Duration::from_millis(self.settle_delay_ms)),
            WaitMode::Condition => WaitPolicy::Condition {
                timeout: Duration::from_millis(self.page_ready_timeout_ms),
                poll: Duration::from_millis(self.poll_interval_ms.max(1)),
            },
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str, expected: &str) -> AppResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| parse_failed(name, value, expected))
}

fn parse_failed(name: &str, value: &str, expected: &str) -> AppError {
    AppError::Config(ConfigError::EnvVarParseFailed {
        var_name: name.to_string(),
        value: value.to_string(),
        expected_type: expected.to_string(),
    })
}
