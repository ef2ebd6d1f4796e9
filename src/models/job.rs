use serde::{Deserialize, Serialize};
use std::fmt;

/// 无法解析字段时使用的哨兵值
pub const NA: &str = "N/A";

/// 来源标识 → 来源 的查找表（CLI 标识均为小写）
static SOURCE_IDS: phf::Map<&'static str, Source> = phf::phf_map! {
    "jobbsafari" => Source::Jobbsafari,
    "platsbanken" => Source::Platsbanken,
    "demando" => Source::Demando,
};

/// 招聘来源网站
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Source {
    /// jobbsafari.se
    Jobbsafari,
    /// arbetsformedlingen.se/platsbanken
    Platsbanken,
    /// demando.se（技术岗位，带技能标签）
    Demando,
}

impl Source {
    /// 所有来源，按迭代顺序排列（最后一个来源承接配额余数）
    pub const ALL: [Source; 3] = [Source::Jobbsafari, Source::Platsbanken, Source::Demando];

    /// CLI 使用的标识
    pub fn id(self) -> &'static str {
        match self {
            Source::Jobbsafari => "jobbsafari",
            Source::Platsbanken => "platsbanken",
            Source::Demando => "demando",
        }
    }

    /// 从标识解析来源（大小写不敏感）
    pub fn from_id(id: &str) -> Option<Self> {
        SOURCE_IDS.get(id.trim().to_lowercase().as_str()).copied()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::Jobbsafari => "Jobbsafari",
            Source::Platsbanken => "Platsbanken",
            Source::Demando => "Demando",
        };
        f.write_str(name)
    }
}

/// 用户选择的来源集合
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSelection {
    All,
    Only(Source),
}

impl SourceSelection {
    /// 解析 `--source` 参数："all" 或某个来源标识
    pub fn parse(value: &str) -> Option<Self> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Some(SourceSelection::All);
        }
        Source::from_id(value).map(SourceSelection::Only)
    }

    /// 展开为有序的来源列表
    pub fn sources(self) -> Vec<Source> {
        match self {
            SourceSelection::All => Source::ALL.to_vec(),
            SourceSelection::Only(source) => vec![source],
        }
    }
}

/// 搜索条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: String,
    pub location: String,
}

impl SearchQuery {
    pub fn new(keyword: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            location: location.into(),
        }
    }
}

/// 一条招聘信息
///
/// 构造后不可变；所有字段始终存在，缺失的数据用 [`NA`] 表示
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    title: String,
    company: String,
    location: String,
    url: String,
    description: String,
    upload_date: String,
    deadline: String,
    #[serde(with = "source_name")]
    source: Source,
}

impl JobPosting {
    /// 从原始字段构造，空白字段统一替换为哨兵值
    pub fn new(fields: JobFields, source: Source) -> Self {
        Self {
            title: or_na(fields.title),
            company: or_na(fields.company),
            location: or_na(fields.location),
            url: or_na(fields.url),
            description: or_na(fields.description),
            upload_date: or_na(fields.upload_date),
            deadline: or_na(fields.deadline),
            source,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn upload_date(&self) -> &str {
        &self.upload_date
    }

    pub fn deadline(&self) -> &str {
        &self.deadline
    }

    pub fn source(&self) -> Source {
        self.source
    }
}

/// 构造 [`JobPosting`] 之前逐步填充的字段
#[derive(Debug, Clone, Default)]
pub struct JobFields {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub upload_date: Option<String>,
    pub deadline: Option<String>,
}

fn or_na(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => NA.to_string(),
    }
}

/// `source` 以展示名序列化，例如 "Jobbsafari"
mod source_name {
    use super::Source;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(source: &Source, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(source)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Source, D::Error> {
        let name = String::deserialize(deserializer)?;
        Source::from_id(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown source: {}", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_lookup_table() {
        assert_eq!(Source::from_id("jobbsafari"), Some(Source::Jobbsafari));
        assert_eq!(Source::from_id(" Platsbanken "), Some(Source::Platsbanken));
        assert_eq!(Source::from_id("DEMANDO"), Some(Source::Demando));
        assert_eq!(Source::from_id("monster"), None);
    }

    #[test]
    fn test_selection_parse() {
        assert_eq!(SourceSelection::parse("all"), Some(SourceSelection::All));
        assert_eq!(
            SourceSelection::parse("demando"),
            Some(SourceSelection::Only(Source::Demando))
        );
        assert_eq!(SourceSelection::parse("nope"), None);
        assert_eq!(SourceSelection::All.sources(), Source::ALL.to_vec());
    }

    #[test]
    fn test_missing_fields_become_sentinel() {
        let posting = JobPosting::new(
            JobFields {
                title: Some("  Backend-utvecklare ".to_string()),
                company: Some("   ".to_string()),
                ..Default::default()
            },
            Source::Jobbsafari,
        );

        assert_eq!(posting.title(), "Backend-utvecklare");
        assert_eq!(posting.company(), NA);
        assert_eq!(posting.url(), NA);
        assert_eq!(posting.deadline(), NA);
    }

    #[test]
    fn test_serializes_every_field_with_display_source() {
        let posting = JobPosting::new(JobFields::default(), Source::Demando);
        let value = serde_json::to_value(&posting).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj.len(), 8);
        assert_eq!(obj["source"], "Demando");
        assert_eq!(obj["description"], NA);
    }
}
