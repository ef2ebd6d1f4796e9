//! 结果写入服务 - 业务能力层
//!
//! 只负责"把最终结果写成 JSON 文件"，整个运行只调用一次

use crate::error::{AppError, AppResult};
use crate::models::JobPosting;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// JSON 结果写入服务
pub struct JobWriter {
    output_path: PathBuf,
}

impl JobWriter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.output_path
    }

    /// 以缩进格式写入 UTF-8 JSON 数组，非 ASCII 字符不转义
    pub fn write(&self, postings: &[JobPosting]) -> AppResult<()> {
        let json = serde_json::to_string_pretty(postings)?;
        debug!("写入 {} 字节到 {}", json.len(), self.output_path.display());

        fs::write(&self.output_path, json)
            .map_err(|e| AppError::file_write_failed(self.output_path.display().to_string(), e))?;

        info!(
            "💾 已保存 {} 条职位到 {}",
            postings.len(),
            self.output_path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobFields, Source};

    #[test]
    fn test_write_pretty_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        let posting = JobPosting::new(
            JobFields {
                title: Some("Lagerarbetare".into()),
                location: Some("Göteborg".into()),
                ..Default::default()
            },
            Source::Jobbsafari,
        );

        JobWriter::new(&path).write(&[posting]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[\n"));
        assert!(content.contains("Göteborg"));
        assert!(content.contains("\"source\": \"Jobbsafari\""));
        assert!(content.contains("\"deadline\": \"N/A\""));
    }

    #[test]
    fn test_empty_result_is_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        JobWriter::new(&path).write(&[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_unwritable_path_is_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saknas").join("jobs.json");
        let err = JobWriter::new(&path).write(&[]).unwrap_err();
        assert!(matches!(err, AppError::File(_)));
    }
}
