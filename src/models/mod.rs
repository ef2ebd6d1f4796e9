pub mod job;

pub use job::{JobFields, JobPosting, SearchQuery, Source, SourceSelection, NA};
