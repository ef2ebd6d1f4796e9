use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器 / 页面驱动相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 字段提取错误
    #[error("提取错误: {0}")]
    Extract(#[from] ExtractError),
    /// 网络请求错误
    #[error("网络错误: {0}")]
    Network(#[from] NetworkError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed { port: u16, source: BoxedSource },
    /// 启动浏览器失败
    #[error("启动无头浏览器失败: {source}")]
    LaunchFailed { source: BoxedSource },
    /// 打开页面（导航）失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed { url: String, source: BoxedSource },
    /// DOM 查询失败
    #[error("DOM 查询失败 ({selector}): {source}")]
    QueryFailed { selector: String, source: BoxedSource },
    /// 浏览器配置失败
    #[error("浏览器配置失败: {message}")]
    ConfigurationFailed { message: String },
}

/// 字段提取错误
#[derive(Debug, Error)]
pub enum ExtractError {
    /// 期望的元素不存在
    #[error("未找到元素: {selector}")]
    SelectorMiss { selector: String },
    /// 选择器语法错误
    #[error("无效的选择器 {selector}: {message}")]
    InvalidSelector { selector: String, message: String },
    /// 日期无法解析
    #[error("无法解析日期: {raw}")]
    MalformedDate { raw: String },
    /// 结构化元数据存在但格式错误
    #[error("结构化元数据解析失败: {source}")]
    StructuredMetadata { source: BoxedSource },
    /// 页面在超时前没有渲染出目标内容
    #[error("等待 {selector} 超时 ({timeout_ms}ms)")]
    RenderTimeout { selector: String, timeout_ms: u64 },
}

/// 网络请求错误
#[derive(Debug, Error)]
pub enum NetworkError {
    /// 请求失败
    #[error("请求失败 ({url}): {source}")]
    RequestFailed { url: String, source: BoxedSource },
    /// 返回非成功状态码
    #[error("请求 {url} 返回状态码 {status}")]
    BadStatus { url: String, status: u16 },
    /// 站点地图获取或解析失败
    #[error("站点地图获取失败 ({url}): {message}")]
    SitemapFetchFailed { url: String, message: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed { path: String, source: BoxedSource },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed { path: String, source: BoxedSource },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed { path: String, source: BoxedSource },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 未知的来源标识
    #[error("未知的来源: {0}")]
    UnknownSource(String),
    /// 非法取值
    #[error("配置项 {field} 非法: {message}")]
    InvalidValue { field: String, message: String },
}

// ========== 从常见错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(BrowserError::QueryFailed {
            selector: String::new(),
            source: Box::new(err),
        })
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();
        AppError::Network(NetworkError::RequestFailed {
            url,
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Extract(ExtractError::StructuredMetadata {
            source: Box::new(err),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器连接错误
    pub fn browser_connection_failed(
        port: u16,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser(BrowserError::ConnectionFailed {
            port,
            source: Box::new(source),
        })
    }

    /// 创建导航失败错误
    pub fn navigation_failed(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser(BrowserError::NavigationFailed {
            url: url.into(),
            source: Box::new(source),
        })
    }

    /// 创建选择器缺失错误
    pub fn selector_miss(selector: impl Into<String>) -> Self {
        AppError::Extract(ExtractError::SelectorMiss {
            selector: selector.into(),
        })
    }

    /// 创建无效选择器错误
    pub fn invalid_selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Extract(ExtractError::InvalidSelector {
            selector: selector.into(),
            message: message.into(),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 是否属于页面加载 / 网络类错误（来源级别的失败）
    pub fn is_page_load_failure(&self) -> bool {
        matches!(
            self,
            AppError::Browser(BrowserError::NavigationFailed { .. }) | AppError::Network(_)
        )
    }

    /// 是否为等待渲染超时
    pub fn is_render_timeout(&self) -> bool {
        matches!(self, AppError::Extract(ExtractError::RenderTimeout { .. }))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_failure_is_page_load_failure() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout");
        let err = AppError::navigation_failed("https://example.com", io);
        assert!(err.is_page_load_failure());
        assert!(err.to_string().contains("https://example.com"));
    }

    #[test]
    fn test_selector_miss_is_not_page_load_failure() {
        let err = AppError::selector_miss("h3.title");
        assert!(!err.is_page_load_failure());
        assert!(err.to_string().contains("h3.title"));
    }
}
