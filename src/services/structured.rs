//! 结构化元数据提取 - 业务能力层
//!
//! 从 `<script type="application/ld+json">` 中找出 schema.org `JobPosting` 对象。

use crate::error::{AppResult, ExtractError};
use crate::infrastructure::PageSession;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

pub const JSON_LD_SELECTOR: &str = r#"script[type="application/ld+json"]"#;

/// schema.org JobPosting 中用到的字段
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredJob {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date_posted: Option<String>,
    #[serde(default)]
    pub valid_through: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub hiring_organization: Option<JsonValue>,
    #[serde(default, deserialize_with = "lenient")]
    pub job_location: Option<JsonValue>,
}

impl StructuredJob {
    /// 招聘公司名称（`hiringOrganization` 可能是对象或字符串）
    pub fn company(&self) -> Option<String> {
        match self.hiring_organization.as_ref()? {
            JsonValue::String(name) => Some(name.clone()),
            value => value.get("name")?.as_str().map(str::to_string),
        }
    }

    /// 工作地点（取第一个地点的 `addressLocality`）
    pub fn locality(&self) -> Option<String> {
        let location = match self.job_location.as_ref()? {
            JsonValue::Array(items) => items.first()?,
            value => value,
        };
        location
            .get("address")?
            .get("addressLocality")?
            .as_str()
            .map(str::to_string)
    }
}

fn lenient<'de, D>(deserializer: D) -> Result<Option<JsonValue>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<JsonValue>::deserialize(deserializer)?.filter(|v| !v.is_null()))
}

/// 解析一段 JSON-LD 文本，返回其中第一个 JobPosting
///
/// JSON 本身格式错误时返回 [`ExtractError::StructuredMetadata`]；格式正确但没有 JobPosting 时返回 `Ok(None)`
pub fn parse_job_posting(raw: &str) -> AppResult<Option<StructuredJob>> {
    let value: JsonValue = serde_json::from_str(raw.trim()).map_err(|e| {
        ExtractError::StructuredMetadata {
            source: Box::new(e),
        }
    })?;

    match find_job_posting(&value) {
        Some(obj) => Ok(Some(serde_json::from_value(obj.clone())?)),
        None => Ok(None),
    }
}

fn find_job_posting(value: &JsonValue) -> Option<&JsonValue> {
    match value {
        JsonValue::Array(items) => items.iter().find_map(find_job_posting),
        JsonValue::Object(map) => {
            if is_job_posting(map.get("@type")) {
                return Some(value);
            }
            map.get("@graph").and_then(find_job_posting)
        }
        _ => None,
    }
}

fn is_job_posting(ld_type: Option<&JsonValue>) -> bool {
    match ld_type {
        Some(JsonValue::String(t)) => t == "JobPosting",
        Some(JsonValue::Array(types)) => types.iter().any(|t| t.as_str() == Some("JobPosting")),
        _ => false,
    }
}

/// 读取页面上所有 JSON-LD 块，返回第一个可解析的 JobPosting
///
/// 格式错误的块记录日志后跳过，交给后续提取策略处理
pub async fn extract_from_page(page: &dyn PageSession) -> AppResult<Option<StructuredJob>> {
    let scripts = page.find_all(JSON_LD_SELECTOR).await?;
    if scripts.is_empty() {
        debug!("{} 没有结构化元数据", page.url());
        return Ok(None);
    }

    for script in scripts {
        let raw = script.inner_html().await?;
        match parse_job_posting(&raw) {
            Ok(Some(job)) => return Ok(Some(job)),
            Ok(None) => continue,
            Err(e) => {
                warn!("⚠️ {} 的结构化元数据无法解析: {}", page.url(), e);
            }
        }
    }

    Ok(None)
}
