//! 日志工具模块
//!
//! 提供日志格式化和输出的辅助函数

use crate::models::{SearchQuery, Source};
use crate::orchestrator::RunReport;
use tracing::info;

/// 记录程序启动信息
///
/// # 参数
/// - `query`: 搜索条件
/// - `sources`: 本次要抓取的来源
/// - `max_jobs`: 职位总上限
pub fn log_startup(query: &SearchQuery, sources: &[Source], max_jobs: usize) {
    let names: Vec<String> = sources.iter().map(|s| s.to_string()).collect();
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 多来源职位抓取");
    info!("🔍 关键词: {} | 地点: {}", query.keyword, query.location);
    info!("📋 来源: {} | 上限: {} 条", names.join(", "), max_jobs);
    info!("{}", "=".repeat(60));
}

/// 记录来源开始信息
///
/// # 参数
/// - `source`: 来源
/// - `index`: 第几个来源（从 1 开始）
/// - `total`: 来源总数
/// - `quota`: 该来源的配额
pub fn log_source_start(source: Source, index: usize, total: usize, quota: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始抓取第 {}/{} 个来源: {}", index, total, source);
    info!("🎯 配额: {}", quota);
    info!("{}", "=".repeat(60));
}

/// 记录来源完成信息
///
/// # 参数
/// - `source`: 来源
/// - `accepted`: 接受数量
/// - `candidates`: 候选数量
pub fn log_source_complete(source: Source, accepted: usize, candidates: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ {} 完成: 接受 {}/{}", source, accepted, candidates);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(report: &RunReport, output_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    for source in &report.sources {
        info!(
            "{:<12} 候选 {:>3} | 接受 {:>3} | 过滤 {:>3} | 失败 {:>3}{}",
            source.source.to_string(),
            source.candidates,
            source.accepted,
            source.filtered,
            source.failed,
            if source.aborted { " | ❌ 中止" } else { "" }
        );
    }
    info!("{}", "=".repeat(60));
    info!("✅ 共接受: {}/{}", report.accepted, report.max_jobs);
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", output_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
