//! 描述文本清理 - 业务能力层
//!
//! 纯函数：去标签、解码实体、压缩空白。对同一文本重复调用结果不变。

use crate::models::NA;
use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::OnceLock;

/// 描述的最小有效长度（字符数）
pub const MIN_DESCRIPTION_LEN: usize = 20;

/// 前后断行的元素
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "li", "ul", "ol", "br", "h1", "h2", "h3", "h4", "h5", "h6", "section",
    "article", "header", "footer", "main", "tr", "table", "dd", "dt",
];

const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

fn spaces_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t\u{a0}\u{2009}\u{200b}]+").expect("static regex"))
}

/// 清理文本，不应用最小长度规则
///
/// 1. 按 HTML 片段解析：去除标签（块级元素与 `<br>` 转为换行），解码实体
/// 2. 回车统一为换行，丢弃其他控制字符
/// 3. 每行去除首尾空白，行内连续空格压缩为一个
/// 4. 连续两个及以上空行压缩为一个空行，去除整体首尾空白
///
/// 重复以上步骤直到结果不再变化，所以输出再清理一次仍是自身。
pub fn clean_text(raw: &str) -> String {
    let mut text = raw.to_string();

    // 实体解码可能产生新的标签
    loop {
        let next = tidy_lines(&strip_markup(&text));
        if next == text {
            return text;
        }
        text = next;
    }
}

/// 规范化描述文本：清理后长度不足 [`MIN_DESCRIPTION_LEN`] 时返回哨兵值
pub fn normalize_description(raw: &str) -> String {
    let cleaned = clean_text(raw);
    if cleaned.chars().count() < MIN_DESCRIPTION_LEN {
        NA.to_string()
    } else {
        cleaned
    }
}

/// 描述是否满足最小长度（哨兵值不算）
pub fn is_viable(description: &str) -> bool {
    description != NA && description.chars().count() >= MIN_DESCRIPTION_LEN
}

/// 解析为 HTML 片段后只保留文本节点；不构成标签的 `<` 和 `>` 按原文保留
fn strip_markup(text: &str) -> String {
    let fragment = Html::parse_fragment(text);
    let mut out = String::with_capacity(text.len());
    collect_text(fragment.root_element(), &mut out);
    out
}

fn collect_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }
        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };
        let name = child.value().name();
        if HIDDEN_ELEMENTS.contains(&name) {
            continue;
        }
        let block = BLOCK_ELEMENTS.contains(&name);
        if block {
            line_break(out);
        }
        collect_text(child, out);
        if block {
            line_break(out);
        }
    }
}

fn line_break(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

fn tidy_lines(text: &str) -> String {
    let text: String = text
        .replace("\r\n", "\n")
        .chars()
        .map(|c| if c == '\r' { '\n' } else { c })
        .filter(|&c| c == '\n' || c == '\t' || !c.is_control())
        .collect();

    let mut lines: Vec<String> = Vec::new();
    let mut previous_blank = false;
    for line in text.split('\n') {
        let line = spaces_re().replace_all(line.trim(), " ").trim().to_string();
        if line.is_empty() {
            if !previous_blank && !lines.is_empty() {
                lines.push(String::new());
            }
            previous_blank = true;
        } else {
            lines.push(line);
            previous_blank = false;
        }
    }

    lines.join("\n").trim().to_string()
}
