//! 业务能力层（Services）
//!
//! 每个服务只描述"我能做什么"，不关心来源的遍历顺序。

pub mod date_filter;
pub mod job_writer;
pub mod normalizer;
pub mod quota;
pub mod sitemap;
pub mod structured;

pub use date_filter::{parse_listing_date, DateRangeFilter};
pub use job_writer::JobWriter;
pub use normalizer::{clean_text, is_viable, normalize_description, MIN_DESCRIPTION_LEN};
pub use quota::QuotaAllocator;
pub use sitemap::{SitemapClient, SitemapDates};
pub use structured::StructuredJob;
