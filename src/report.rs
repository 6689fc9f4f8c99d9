// SPDX-License-Identifier: PMPL-1.0-or-later
//! Report generation for completed scans.
//!
//! The scanner only records the artifact path a generator returns; the
//! format is the generator's business. Two renderers are provided:
//! - Text: human-readable summary with findings grouped by severity
//! - JSON: structured scan plus findings for programmatic consumption

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::model::{Finding, ScanRun, Severity};

/// Produces a downloadable artifact for a completed scan
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    /// Write the artifact and return its storage path
    async fn generate(&self, run: &ScanRun, findings: &[Finding]) -> Result<PathBuf>;
}

/// Writes plain-text reports under a configured directory
pub struct TextReportGenerator {
    output_dir: PathBuf,
}

impl TextReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl ReportGenerator for TextReportGenerator {
    async fn generate(&self, run: &ScanRun, findings: &[Finding]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let file_name = format!(
            "rgaa-report-{}-{}.txt",
            run.id,
            Utc::now().format("%Y%m%d%H%M%S")
        );
        let path = self.output_dir.join(file_name);

        tokio::fs::write(&path, render_text(run, findings)).await?;
        info!("report written to {}", path.display());

        Ok(path)
    }
}

/// Render a human-readable text report
pub fn render_text(run: &ScanRun, findings: &[Finding]) -> String {
    let mut output = String::new();

    output.push_str("=== RGAA AUDIT REPORT ===\n");
    output.push_str(&format!("Scan: {}\n", run.id));
    output.push_str(&format!(
        "Date: {}\n",
        run.completed_at
            .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "in progress".to_string())
    ));
    output.push_str(&format!("Status: {}\n\n", run.status));

    output.push_str("=== RESULTS ===\n");
    output.push_str(&format!("Score: {}/100\n", run.score));
    output.push_str(&format!("Grade: {}\n", run.grade));
    output.push_str(&format!("Pages scanned: {}\n", run.pages_scanned));
    if let Some(duration) = run.duration_ms() {
        output.push_str(&format!("Duration: {} ms\n", duration));
    }
    output.push('\n');

    output.push_str("=== ISSUES ===\n");
    output.push_str(&format!("Total: {}\n", run.total_issues));
    output.push_str(&format!("Critical: {}\n", run.critical_issues));
    output.push_str(&format!("Warnings: {}\n", run.warning_issues));
    output.push_str(&format!("Info: {}\n\n", run.info_issues));

    if findings.is_empty() {
        output.push_str("No accessibility issues found. All checks passed.\n");
        return output;
    }

    for severity in &[Severity::Critical, Severity::Warning, Severity::Info] {
        let group: Vec<&Finding> = findings.iter().filter(|f| f.severity == *severity).collect();
        if group.is_empty() {
            continue;
        }

        output.push_str(&format!("--- {} ({}) ---\n", severity, group.len()));
        for finding in group {
            output.push_str(&format!("[{}] {}\n", finding.rule, finding.title));
            output.push_str(&format!("  Page: {}\n", finding.page_url));
            if let Some(ref selector) = finding.element_selector {
                output.push_str(&format!("  Element: {}\n", selector));
            }
            if let Some(ref suggestion) = finding.fix_suggestion {
                output.push_str(&format!("  Fix: {}\n", suggestion));
            }
            output.push('\n');
        }
    }

    output
}

#[derive(Serialize)]
struct JsonReport<'a> {
    scan: &'a ScanRun,
    findings: &'a [Finding],
}

/// Render the scan and its findings as pretty-printed JSON
pub fn render_json(run: &ScanRun, findings: &[Finding]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonReport {
        scan: run,
        findings,
    })?)
}
