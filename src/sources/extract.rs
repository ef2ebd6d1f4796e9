//! 字段提取策略
//!
//! 每个来源只需给出一份 [`SiteLayout`]（选择器表），列表卡片与详情页的读取、
//! 描述回退链、日期解析都在这里完成。

use crate::error::{AppError, AppResult, ConfigError, ExtractError};
use crate::infrastructure::{attr_of, page_text_of, text_of, DomNode, PageSession};
use crate::models::{Source, NA};
use crate::services::structured::{self, StructuredJob};
use crate::services::{is_viable, normalize_description, parse_listing_date};
use chrono::NaiveDate;
use tracing::debug;
use url::Url;

/// 描述区域的定位方式
#[derive(Debug, Clone, Copy)]
pub enum DescriptionRegion {
    /// 直接用选择器定位
    Selector(&'static str),
    /// 含有指定标题（如 "Om jobbet"）的容器
    Headed {
        container: &'static str,
        heading: &'static str,
    },
}

/// 一个来源的页面结构
#[derive(Debug, Clone)]
pub struct SiteLayout {
    pub source: Source,
    /// 用于补全相对链接
    pub base_url: &'static str,
    /// 列表页中每个职位卡片
    pub card: &'static str,
    pub link: &'static str,
    pub title: &'static str,
    pub company: &'static str,
    pub location: &'static str,
    /// 卡片上的技能标签
    pub tags: Option<&'static str>,
    /// 详情页渲染完成的标志
    pub detail_ready: &'static str,
    pub upload_date: &'static str,
    pub deadline: &'static str,
    /// 按顺序尝试的描述区域，全部失败后再尝试 `main`
    pub description: &'static [DescriptionRegion],
}

/// 列表卡片中读出的字段
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingCard {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub tags: Vec<String>,
}

/// 详情页中读出的字段
#[derive(Debug, Clone, PartialEq)]
pub struct DetailFields {
    /// 已规范化；不足最小长度时为 [`NA`]
    pub description: String,
    pub upload_date: Option<String>,
    pub deadline: Option<String>,
    pub structured: Option<StructuredJob>,
}

const MAIN_REGION: &str = "main";
const HEADING_SELECTOR: &str = "h1, h2, h3, h4, h5, strong";

/// 读取列表卡片
pub async fn read_card(card: &dyn DomNode, layout: &SiteLayout) -> AppResult<ListingCard> {
    let href = attr_of(card, layout.link, "href").await?;
    let url = href.as_deref().and_then(|h| resolve_url(layout.base_url, h));

    let mut tags = Vec::new();
    if let Some(tag_selector) = layout.tags {
        for tag in card.find_all(tag_selector).await? {
            let text = tag.text().await?;
            let text = text.trim();
            if !text.is_empty() {
                tags.push(text.to_string());
            }
        }
    }

    Ok(ListingCard {
        title: text_of(card, layout.title).await?,
        company: text_of(card, layout.company).await?,
        location: text_of(card, layout.location).await?,
        url,
        tags,
    })
}

/// 读取详情页
pub async fn read_detail(
    page: &dyn PageSession,
    layout: &SiteLayout,
    today: NaiveDate,
) -> AppResult<DetailFields> {
    let structured = match structured::extract_from_page(page).await {
        Ok(found) => found,
        Err(e) => {
            debug!("{} 结构化元数据读取失败: {}", page.url(), e);
            None
        }
    };

    let description = resolve_description(page, structured.as_ref(), layout.description).await?;

    let upload_date = match page_text_of(page, layout.upload_date).await? {
        Some(raw) => date_or_log(&raw, today),
        None => None,
    }
    .or_else(|| {
        structured
            .as_ref()
            .and_then(|s| s.date_posted.as_deref())
            .and_then(|raw| date_or_log(raw, today))
    });

    let deadline = match page_text_of(page, layout.deadline).await? {
        Some(raw) => date_or_log(&raw, today),
        None => None,
    }
    .or_else(|| {
        structured
            .as_ref()
            .and_then(|s| s.valid_through.as_deref())
            .and_then(|raw| date_or_log(raw, today))
    });

    Ok(DetailFields {
        description,
        upload_date,
        deadline,
        structured,
    })
}

/// 无法识别的日期记录后按缺失处理
fn date_or_log(raw: &str, today: NaiveDate) -> Option<String> {
    let parsed = parse_listing_date(raw, today);
    if parsed.is_none() {
        let err = ExtractError::MalformedDate {
            raw: raw.trim().to_string(),
        };
        debug!("{}", err);
    }
    parsed
}

/// 描述回退链：结构化元数据 → 来源的描述区域 → `main` → [`NA`]
pub async fn resolve_description(
    page: &dyn PageSession,
    structured: Option<&StructuredJob>,
    regions: &[DescriptionRegion],
) -> AppResult<String> {
    if let Some(raw) = structured.and_then(|s| s.description.as_deref()) {
        let description = normalize_description(raw);
        if is_viable(&description) {
            debug!("{} 使用结构化元数据描述", page.url());
            return Ok(description);
        }
    }

    for region in regions {
        if let Some(raw) = region_text(page, *region).await? {
            let description = normalize_description(&raw);
            if is_viable(&description) {
                return Ok(description);
            }
        }
    }

    if let Some(raw) = page_text_of(page, MAIN_REGION).await? {
        let description = normalize_description(&raw);
        if is_viable(&description) {
            debug!("{} 使用 main 区域作为描述", page.url());
            return Ok(description);
        }
    }

    debug!("{} 未找到可用的描述", page.url());
    Ok(NA.to_string())
}

async fn region_text(
    page: &dyn PageSession,
    region: DescriptionRegion,
) -> AppResult<Option<String>> {
    match region {
        DescriptionRegion::Selector(selector) => page_text_of(page, selector).await,
        DescriptionRegion::Headed { container, heading } => {
            let wanted = heading.to_lowercase();
            for node in page.find_all(container).await? {
                for candidate in node.find_all(HEADING_SELECTOR).await? {
                    let text = candidate.text().await?;
                    if text.trim().to_lowercase().starts_with(&wanted) {
                        let body = node.text().await?;
                        return Ok(Some(body).filter(|b| !b.trim().is_empty()));
                    }
                }
            }
            debug!("{} 未找到标题为 \"{}\" 的区域", page.url(), heading);
            Ok(None)
        }
    }
}

/// 把链接补全为绝对地址；无法解析时返回 `None`
pub fn resolve_url(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }
    let base = Url::parse(base).ok()?;
    base.join(href).ok().map(String::from)
}

/// 拼接带查询参数的搜索地址（参数按表单规则编码）
pub fn build_search_url(base: &str, params: &[(&str, String)]) -> AppResult<String> {
    let url = Url::parse_with_params(base, params).map_err(|e| {
        AppError::Config(ConfigError::InvalidValue {
            field: "search_url".to_string(),
            message: format!("{}: {}", base, e),
        })
    })?;
    Ok(url.into())
}
