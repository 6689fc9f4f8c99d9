// SPDX-License-Identifier: PMPL-1.0-or-later
//! Domain model for scans, sites and accessibility findings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Severity levels for findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks access for some users
    Critical,
    /// Important but not blocking
    Warning,
    /// Improvement recommendation
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Info => write!(f, "INFO"),
        }
    }
}

/// Letter grade derived from the numeric score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Grade {
    /// Map a 0-100 score onto the grade bands.
    ///
    /// Total over the whole score range and monotonic: a higher score never
    /// yields a worse grade.
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Grade::A,
            80..=89 => Grade::B,
            70..=79 => Grade::C,
            60..=69 => Grade::D,
            50..=59 => Grade::E,
            _ => Grade::F,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grade::A => write!(f, "A"),
            Grade::B => write!(f, "B"),
            Grade::C => write!(f, "C"),
            Grade::D => write!(f, "D"),
            Grade::E => write!(f, "E"),
            Grade::F => write!(f, "F"),
        }
    }
}

/// Scan lifecycle status
///
/// Transitions are Pending -> Running -> Completed | Failed. Failed is
/// terminal; a retry is a fresh ScanRun.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl ScanStatus {
    /// Whether this scan still occupies a concurrency slot
    pub fn is_active(&self) -> bool {
        matches!(self, ScanStatus::Pending | ScanStatus::Running)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanStatus::Completed | ScanStatus::Failed)
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanStatus::Pending => write!(f, "pending"),
            ScanStatus::Running => write!(f, "running"),
            ScanStatus::Completed => write!(f, "completed"),
            ScanStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Unique scan identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanId(pub Uuid);

impl ScanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ScanId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ScanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique site identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SiteId(pub Uuid);

impl SiteId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SiteId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One detected rule violation on one page.
///
/// Findings are immutable once produced by the analyzer; the orchestrator
/// only tags them with the owning scan before persisting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Unique identifier
    pub id: Uuid,
    /// Owning scan, set by the orchestrator
    pub scan_id: Option<ScanId>,
    /// RGAA rule identifier (e.g. "RGAA_1_1")
    pub rule: String,
    /// Human-readable title
    pub title: String,
    /// Detailed message
    pub description: String,
    /// Severity level
    pub severity: Severity,
    /// Page the violation was found on
    pub page_url: String,
    /// CSS-like selector pointing at the offending element
    pub element_selector: Option<String>,
    /// Raw markup of the offending element
    pub element_html: Option<String>,
    /// Suggested fix
    pub fix_suggestion: Option<String>,
    /// Example of corrected markup
    pub code_example: Option<String>,
    /// When this finding was created
    pub detected_at: DateTime<Utc>,
}

impl Finding {
    /// Create a new finding
    pub fn new(rule: &str, severity: Severity, title: &str, description: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            scan_id: None,
            rule: rule.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            severity,
            page_url: String::new(),
            element_selector: None,
            element_html: None,
            fix_suggestion: None,
            code_example: None,
            detected_at: Utc::now(),
        }
    }

    /// Set the page the finding belongs to
    pub fn on_page(mut self, url: &str) -> Self {
        self.page_url = url.to_string();
        self
    }

    /// Set the element selector
    pub fn with_selector(mut self, selector: &str) -> Self {
        self.element_selector = Some(selector.to_string());
        self
    }

    /// Set the raw element markup
    pub fn with_element(mut self, element: &str) -> Self {
        self.element_html = Some(element.to_string());
        self
    }

    /// Set the fix suggestion
    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.fix_suggestion = Some(suggestion.to_string());
        self
    }

    /// Set the corrected-markup example
    pub fn with_code_example(mut self, example: &str) -> Self {
        self.code_example = Some(example.to_string());
        self
    }

    /// Tag the finding with its owning scan
    pub fn for_scan(mut self, scan_id: ScanId) -> Self {
        self.scan_id = Some(scan_id);
        self
    }
}

/// One end-to-end execution of crawl, analysis and scoring against a site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRun {
    pub id: ScanId,
    pub site_id: SiteId,
    pub user_id: String,
    pub status: ScanStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub pages_scanned: u32,
    /// Only meaningful once the run is Completed
    pub score: u32,
    pub grade: Grade,
    pub critical_issues: u32,
    pub warning_issues: u32,
    pub info_issues: u32,
    pub total_issues: u32,
    pub error_message: Option<String>,
    pub report_path: Option<PathBuf>,
}

impl ScanRun {
    pub fn new(site_id: SiteId, user_id: String) -> Self {
        Self {
            id: ScanId::new(),
            site_id,
            user_id,
            status: ScanStatus::Pending,
            started_at: Utc::now(),
            completed_at: None,
            pages_scanned: 0,
            score: 0,
            grade: Grade::F,
            critical_issues: 0,
            warning_issues: 0,
            info_issues: 0,
            total_issues: 0,
            error_message: None,
            report_path: None,
        }
    }

    /// Mark as running
    pub fn start(&mut self) {
        self.status = ScanStatus::Running;
    }

    /// Mark as completed with the final score and per-severity counts.
    ///
    /// Keeps the invariant total_issues == critical + warning + info.
    pub fn complete(&mut self, score: u32, grade: Grade, findings: &[Finding]) {
        self.score = score;
        self.grade = grade;
        self.critical_issues = count_severity(findings, Severity::Critical);
        self.warning_issues = count_severity(findings, Severity::Warning);
        self.info_issues = count_severity(findings, Severity::Info);
        self.total_issues = findings.len() as u32;
        self.completed_at = Some(Utc::now());
        self.status = ScanStatus::Completed;
    }

    /// Mark as failed with a reason
    pub fn fail(&mut self, reason: &str) {
        self.status = ScanStatus::Failed;
        self.error_message = Some(reason.to_string());
        self.completed_at = Some(Utc::now());
    }

    /// Wall-clock duration in milliseconds (if finished)
    pub fn duration_ms(&self) -> Option<i64> {
        self.completed_at
            .map(|end| (end - self.started_at).num_milliseconds().max(0))
    }
}

fn count_severity(findings: &[Finding], severity: Severity) -> u32 {
    findings.iter().filter(|f| f.severity == severity).count() as u32
}

/// A registered target site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    pub url: String,
    pub name: String,
    pub user_id: String,
    pub active: bool,
    pub max_depth: usize,
    pub include_subdomains: bool,
    pub created_at: DateTime<Utc>,
    pub last_scan_at: Option<DateTime<Utc>>,
}

impl Site {
    pub fn new(url: &str, name: &str, user_id: &str) -> Self {
        Self {
            id: SiteId::new(),
            url: url.to_string(),
            name: name.to_string(),
            user_id: user_id.to_string(),
            active: true,
            max_depth: 3,
            include_subdomains: false,
            created_at: Utc::now(),
            last_scan_at: None,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_subdomains(mut self, include: bool) -> Self {
        self.include_subdomains = include;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_is_total_and_monotonic() {
        let mut previous = Grade::from_score(0);
        for score in 0..=100u32 {
            let grade = Grade::from_score(score);
            // Grade derives Ord with A < F, so a higher score must not
            // produce a larger (worse) grade.
            assert!(grade <= previous, "score {} regressed to {}", score, grade);
            previous = grade;
        }
    }

    #[test]
    fn test_grade_bands() {
        assert_eq!(Grade::from_score(100), Grade::A);
        assert_eq!(Grade::from_score(90), Grade::A);
        assert_eq!(Grade::from_score(89), Grade::B);
        assert_eq!(Grade::from_score(80), Grade::B);
        assert_eq!(Grade::from_score(70), Grade::C);
        assert_eq!(Grade::from_score(60), Grade::D);
        assert_eq!(Grade::from_score(50), Grade::E);
        assert_eq!(Grade::from_score(49), Grade::F);
        assert_eq!(Grade::from_score(0), Grade::F);
    }

    #[test]
    fn test_scan_run_transitions() {
        let mut run = ScanRun::new(SiteId::new(), "user-1".to_string());
        assert_eq!(run.status, ScanStatus::Pending);
        assert!(run.status.is_active());
        assert!(run.completed_at.is_none());

        run.start();
        assert_eq!(run.status, ScanStatus::Running);
        assert!(run.status.is_active());

        run.complete(72, Grade::C, &[]);
        assert_eq!(run.status, ScanStatus::Completed);
        assert!(run.status.is_terminal());
        assert!(run.completed_at.is_some());
        assert_eq!(run.score, 72);
    }

    #[test]
    fn test_scan_run_failure_records_reason_and_timestamp() {
        let mut run = ScanRun::new(SiteId::new(), "user-1".to_string());
        run.start();
        run.fail("no accessible pages found");
        assert_eq!(run.status, ScanStatus::Failed);
        assert_eq!(
            run.error_message.as_deref(),
            Some("no accessible pages found")
        );
        assert!(run.completed_at.is_some());
    }

    #[test]
    fn test_complete_keeps_severity_count_invariant() {
        let findings = vec![
            Finding::new("RGAA_1_1", Severity::Critical, "t", "d"),
            Finding::new("RGAA_1_1", Severity::Critical, "t", "d"),
            Finding::new("RGAA_9_1", Severity::Warning, "t", "d"),
            Finding::new("RGAA_1_2", Severity::Info, "t", "d"),
        ];
        let mut run = ScanRun::new(SiteId::new(), "user-1".to_string());
        run.start();
        run.complete(60, Grade::D, &findings);

        assert_eq!(run.critical_issues, 2);
        assert_eq!(run.warning_issues, 1);
        assert_eq!(run.info_issues, 1);
        assert_eq!(
            run.total_issues,
            run.critical_issues + run.warning_issues + run.info_issues
        );
    }

    #[test]
    fn test_finding_builder() {
        let finding = Finding::new(
            "RGAA_8_5",
            Severity::Critical,
            "Missing page title",
            "This page has no title or the title is empty.",
        )
        .on_page("https://example.com/")
        .with_selector("title")
        .with_suggestion("Add a descriptive title to the page.")
        .for_scan(ScanId::new());

        assert_eq!(finding.rule, "RGAA_8_5");
        assert_eq!(finding.page_url, "https://example.com/");
        assert!(finding.scan_id.is_some());
        assert!(finding.element_html.is_none());
    }
}
