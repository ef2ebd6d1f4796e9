//! 命令行参数

use crate::config::{Config, DriverKind};
use crate::models::{SearchQuery, SourceSelection};
use crate::orchestrator::RunOptions;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "job_scraper",
    about = "Scrape job postings from Jobbsafari, Platsbanken and Demando into a JSON file",
    version
)]
pub struct Cli {
    /// Search keyword.
    #[arg(long)]
    pub keyword: String,

    /// Search location.
    #[arg(long)]
    pub location: String,

    /// Output JSON file.
    #[arg(long, default_value = "jobs.json")]
    pub output: PathBuf,

    /// Maximum number of postings across all sources.
    #[arg(long, default_value_t = 5)]
    pub max_jobs: usize,

    /// Only keep postings uploaded within this many days.
    #[arg(long)]
    pub days_back: Option<u32>,

    /// Source to scrape (jobbsafari, platsbanken, demando, all).
    #[arg(long, default_value = "all", value_parser = parse_selection)]
    pub source: SourceSelection,

    /// Reject Demando postings carrying this tag (repeatable).
    #[arg(long = "exclude-tag")]
    pub exclude_tags: Vec<String>,

    /// Continue with the next source after a source fails.
    #[arg(long)]
    pub keep_going: bool,

    /// TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Page driver (chromium, static).
    #[arg(long, value_parser = parse_driver)]
    pub driver: Option<DriverKind>,

    /// Verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_selection(value: &str) -> Result<SourceSelection, String> {
    SourceSelection::parse(value).ok_or_else(|| {
        format!(
            "unknown source '{}', expected one of: jobbsafari, platsbanken, demando, all",
            value
        )
    })
}

fn parse_driver(value: &str) -> Result<DriverKind, String> {
    DriverKind::parse(value)
        .ok_or_else(|| format!("unknown driver '{}', expected chromium or static", value))
}

impl Cli {
    /// 命令行参数是最高优先级的配置层
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(driver) = self.driver {
            config.driver = driver;
        }
        if self.verbose {
            config.verbose_logging = true;
        }
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            query: SearchQuery::new(self.keyword.trim(), self.location.trim()),
            selection: self.source,
            max_jobs: self.max_jobs,
            days_back: self.days_back,
            output: self.output.clone(),
            excluded_tags: self.exclude_tags.clone(),
            keep_going: self.keep_going,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Source;

    #[test]
    fn test_defaults() {
        let cli =
            Cli::try_parse_from(["job_scraper", "--keyword", "rust", "--location", "Malmö"])
                .unwrap();
        assert_eq!(cli.output, PathBuf::from("jobs.json"));
        assert_eq!(cli.max_jobs, 5);
        assert_eq!(cli.days_back, None);
        assert_eq!(cli.source, SourceSelection::All);
        assert!(!cli.keep_going);
    }

    #[test]
    fn test_source_and_overrides() {
        let cli = Cli::try_parse_from([
            "job_scraper",
            "--keyword",
            "rust",
            "--location",
            "Malmö",
            "--source",
            "Demando",
            "--exclude-tag",
            "konsult",
            "--exclude-tag",
            "php",
            "--driver",
            "static",
            "--days-back",
            "7",
        ])
        .unwrap();

        assert_eq!(cli.source, SourceSelection::Only(Source::Demando));
        assert_eq!(cli.exclude_tags, vec!["konsult", "php"]);
        assert_eq!(cli.days_back, Some(7));

        let mut config = Config::default();
        cli.apply_to(&mut config);
        assert_eq!(config.driver, DriverKind::Static);
    }

    #[test]
    fn test_unknown_source_is_rejected() {
        let result = Cli::try_parse_from([
            "job_scraper",
            "--keyword",
            "rust",
            "--location",
            "Malmö",
            "--source",
            "indeed",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_keyword_is_required() {
        assert!(Cli::try_parse_from(["job_scraper", "--location", "Malmö"]).is_err());
    }
}
