//! 卡片标签过滤
//!
//! 在进入详情页之前根据列表卡片上的技能标签决定是否继续。

/// 包含 / 排除标签判定
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPredicate {
    required: Option<String>,
    excluded: Vec<String>,
}

impl TagPredicate {
    /// `required` 为空白时不要求关键词命中
    pub fn new(required: &str, excluded: &[String]) -> Self {
        let required = required.trim().to_lowercase();
        Self {
            required: (!required.is_empty()).then_some(required),
            excluded: excluded
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// 关键词必须命中某个标签，且没有标签等于排除项
    ///
    /// 均不区分大小写。标签包含关键词即算命中（"Rust-utveckling" 命中 "rust"），
    /// 反过来不算，否则 "Go" 会命中 "django"。排除项按整个标签比较。
    pub fn allows(&self, tags: &[String]) -> bool {
        let tags: Vec<String> = tags
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        if let Some(required) = &self.required {
            if !tags.iter().any(|tag| tag.contains(required.as_str())) {
                return false;
            }
        }

        !tags.iter().any(|tag| self.excluded.contains(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_keyword_must_match_a_tag() {
        let predicate = TagPredicate::new("Rust", &[]);
        assert!(predicate.allows(&tags(&["Go", "rust"])));
        assert!(predicate.allows(&tags(&["Rust-utveckling"])));
        assert!(!predicate.allows(&tags(&["Java", "Kotlin"])));
        assert!(!predicate.allows(&[]));
    }

    #[test]
    fn test_tag_containing_keyword_matches() {
        let predicate = TagPredicate::new("javascript", &[]);
        assert!(predicate.allows(&tags(&["JavaScript (React)"])));

        let predicate = TagPredicate::new("javascript utvecklare", &[]);
        assert!(!predicate.allows(&tags(&["JavaScript"])));
    }

    #[test]
    fn test_short_tags_do_not_match_longer_keywords() {
        assert!(!TagPredicate::new("django", &[]).allows(&tags(&["Go"])));
        assert!(!TagPredicate::new("rust", &[]).allows(&tags(&["R"])));
        assert!(TagPredicate::new("go", &[]).allows(&tags(&["Go"])));
    }

    #[test]
    fn test_excluded_tag_rejects() {
        let predicate = TagPredicate::new("rust", &["Konsult".to_string()]);
        assert!(predicate.allows(&tags(&["Rust", "Backend"])));
        assert!(!predicate.allows(&tags(&["Rust", " KONSULT "])));
        assert!(predicate.allows(&tags(&["Rust", "konsultuppdrag"])));
    }

    #[test]
    fn test_short_exclusion_matches_whole_tag_only() {
        let predicate = TagPredicate::new("", &["c".to_string()]);
        assert!(predicate.allows(&tags(&["Rust", "Docker"])));
        assert!(!predicate.allows(&tags(&["C", "Embedded"])));
    }

    #[test]
    fn test_blank_keyword_only_applies_exclusions() {
        let predicate = TagPredicate::new("  ", &["c#".to_string()]);
        assert!(predicate.allows(&[]));
        assert!(!predicate.allows(&tags(&["C#"])));
    }
}
