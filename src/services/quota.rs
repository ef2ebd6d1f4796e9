//! 配额分配器 - 业务能力层
//!
//! 全局上限 `max_jobs` 是最终闸门；各来源配额只限制该来源尝试处理的候选数。

use crate::models::{JobPosting, Source};
use std::collections::HashMap;

/// 跨来源共享的预算
///
/// 以 `&mut` 形式传入每个来源适配器，检查与计数在 [`QuotaAllocator::accept`] 中一步完成。
#[derive(Debug)]
pub struct QuotaAllocator {
    max_jobs: usize,
    quotas: HashMap<Source, usize>,
    accepted: Vec<JobPosting>,
}

impl QuotaAllocator {
    /// 按来源数整除分配配额，余数全部给最后一个来源
    pub fn new(max_jobs: usize, sources: &[Source]) -> Self {
        let mut quotas = HashMap::new();
        if let Some((last, rest)) = sources.split_last() {
            let share = max_jobs / sources.len();
            let remainder = max_jobs % sources.len();
            for source in rest {
                quotas.insert(*source, share);
            }
            quotas.insert(*last, share + remainder);
        }

        Self {
            max_jobs,
            quotas,
            accepted: Vec::new(),
        }
    }

    pub fn max_jobs(&self) -> usize {
        self.max_jobs
    }

    /// 某来源的配额，未参与分配的来源为 0
    pub fn quota_for(&self, source: Source) -> usize {
        self.quotas.get(&source).copied().unwrap_or(0)
    }

    pub fn quotas(&self) -> &HashMap<Source, usize> {
        &self.quotas
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    /// 是否还能接收
    pub fn can_accept(&self) -> bool {
        self.accepted.len() < self.max_jobs
    }

    /// 接收一条记录；已满时返回 `false` 且不产生任何副作用
    pub fn accept(&mut self, posting: JobPosting) -> bool {
        if !self.can_accept() {
            return false;
        }
        self.accepted.push(posting);
        true
    }

    /// 已接收的记录（只读）
    pub fn postings(&self) -> &[JobPosting] {
        &self.accepted
    }

    /// 取出全部已接收记录
    pub fn into_postings(self) -> Vec<JobPosting> {
        self.accepted
    }
}
