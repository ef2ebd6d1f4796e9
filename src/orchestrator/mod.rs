//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理资源生命周期（页面驱动、浏览器）
//! - 注册来源适配器
//! - 写出结果，输出全局统计信息
//!
//! ### `runner` - 来源调度器
//! - 按顺序调用各来源适配器
//! - 共享配额预算，达到上限即停止
//! - 决定来源失败时中止还是继续
//!
//! ## 层次关系
//!
//! ```text
//! app (资源 + 持久化)
//!     ↓
//! runner (处理 Vec<Source>)
//!     ↓
//! sources::SourceAdapter (处理单个来源)
//!     ↓
//! services (能力层：normalizer / date_filter / quota / structured / sitemap)
//!     ↓
//! infrastructure (基础设施：PageDriver)
//! ```

pub mod app;
pub mod runner;

// 重新导出主要类型
pub use app::{App, RunOptions};
pub use runner::{Orchestrator, RunOutput, RunReport};
