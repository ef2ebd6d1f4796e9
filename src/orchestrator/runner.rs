//! 来源调度器 - 编排层
//!
//! 按注册表顺序依次调用各来源，共享一个 [`QuotaAllocator`]，
//! 总数达到上限后不再启动后续来源。

use crate::error::{AppError, AppResult, ConfigError};
use crate::models::{JobPosting, SearchQuery, Source};
use crate::services::QuotaAllocator;
use crate::sources::{SourceRegistry, SourceReport};
use crate::utils::logging::{log_source_complete, log_source_start};
use tracing::{error, info, warn};

/// 整次运行的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub max_jobs: usize,
    pub accepted: usize,
    pub sources: Vec<SourceReport>,
}

/// 运行结果
#[derive(Debug)]
pub struct RunOutput {
    pub postings: Vec<JobPosting>,
    pub report: RunReport,
}

/// 来源调度器
pub struct Orchestrator<'a> {
    registry: &'a SourceRegistry,
    keep_going: bool,
}

impl<'a> Orchestrator<'a> {
    pub fn new(registry: &'a SourceRegistry) -> Self {
        Self {
            registry,
            keep_going: false,
        }
    }

    /// 来源级失败后继续下一个来源，而不是中止
    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    /// 依次抓取 `sources`
    ///
    /// 默认情况下任一来源失败即返回错误，后续来源不再启动
    pub async fn run(
        &self,
        query: &SearchQuery,
        sources: &[Source],
        max_jobs: usize,
    ) -> AppResult<RunOutput> {
        let mut budget = QuotaAllocator::new(max_jobs, sources);
        let mut reports = Vec::with_capacity(sources.len());

        for (idx, &source) in sources.iter().enumerate() {
            if !budget.can_accept() {
                info!("🛑 已达到 {} 条上限，跳过剩余来源", max_jobs);
                break;
            }

            let adapter = self.registry.get(source).ok_or_else(|| {
                AppError::Config(ConfigError::UnknownSource(source.id().to_string()))
            })?;
            let quota = budget.quota_for(source);
            log_source_start(source, idx + 1, sources.len(), quota);

            match adapter.scrape(query, quota, &mut budget).await {
                Ok(report) => {
                    log_source_complete(source, report.accepted, report.candidates);
                    reports.push(report);
                }
                Err(e) => {
                    error!("❌ {} 抓取失败: {}", source, e);
                    if !self.keep_going {
                        return Err(e);
                    }
                    warn!("⚠️ 继续下一个来源");
                    let mut report = SourceReport::new(source);
                    report.aborted = true;
                    reports.push(report);
                }
            }
        }

        let report = RunReport {
            max_jobs: budget.max_jobs(),
            accepted: budget.accepted_count(),
            sources: reports,
        };
        Ok(RunOutput {
            postings: budget.into_postings(),
            report,
        })
    }
}
