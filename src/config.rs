// SPDX-License-Identifier: PMPL-1.0-or-later
//! Configuration management for rgaabot

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Scan orchestration limits
    #[serde(default)]
    pub scan: ScanSettings,

    /// Crawler behavior
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Report output
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScanSettings {
    /// Maximum scans a single user may have in Pending or Running state
    #[serde(default = "default_max_concurrent_scans")]
    pub max_concurrent_scans: usize,

    /// Wall-clock budget for one scan, crawl included (seconds)
    #[serde(default = "default_scan_timeout")]
    pub scan_timeout_secs: u64,

    /// Maximum pages analyzed per scan, independent of the crawl cap
    #[serde(default = "default_max_pages_per_scan")]
    pub max_pages_per_scan: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            max_concurrent_scans: default_max_concurrent_scans(),
            scan_timeout_secs: default_scan_timeout(),
            max_pages_per_scan: default_max_pages_per_scan(),
        }
    }
}

impl ScanSettings {
    pub fn scan_timeout(&self) -> Duration {
        Duration::from_secs(self.scan_timeout_secs)
    }
}

fn default_max_concurrent_scans() -> usize {
    2
}

fn default_scan_timeout() -> u64 {
    600 // 10 minutes
}

fn default_max_pages_per_scan() -> usize {
    50
}

#[derive(Debug, Deserialize, Clone)]
pub struct CrawlerConfig {
    /// Per-request timeout (seconds)
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Hard ceiling on URLs discovered by one crawl
    #[serde(default = "default_max_urls_per_crawl")]
    pub max_urls_per_crawl: usize,

    /// New links expanded from a single page
    #[serde(default = "default_max_links_per_page")]
    pub max_links_per_page: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: default_fetch_timeout(),
            user_agent: default_user_agent(),
            max_urls_per_crawl: default_max_urls_per_crawl(),
            max_links_per_page: default_max_links_per_page(),
        }
    }
}

impl CrawlerConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "rgaabot/0.1 (accessibility scanner)".to_string()
}

fn default_max_urls_per_crawl() -> usize {
    100
}

fn default_max_links_per_page() -> usize {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    /// Directory report artifacts are written to
    #[serde(default = "default_report_dir")]
    pub output_dir: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_report_dir(),
        }
    }
}

fn default_report_dir() -> String {
    "./storage/reports".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &str) -> Result<Self> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::warn!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let builder = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("RGAABOT").separator("__"));

        let config = builder.build()?;
        let parsed: Config = config.try_deserialize()?;

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.scan.max_concurrent_scans, 2);
        assert_eq!(config.scan.scan_timeout_secs, 600);
        assert_eq!(config.scan.max_pages_per_scan, 50);
        assert_eq!(config.crawler.max_urls_per_crawl, 100);
        assert_eq!(config.crawler.max_links_per_page, 10);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Config::load("/nonexistent/rgaabot.toml").expect("defaults");
        assert_eq!(config.scan.max_pages_per_scan, 50);
    }

    #[test]
    fn test_timeout_conversion() {
        let settings = ScanSettings::default();
        assert_eq!(settings.scan_timeout(), Duration::from_secs(600));
    }
}
