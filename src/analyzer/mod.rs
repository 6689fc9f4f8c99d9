// SPDX-License-Identifier: PMPL-1.0-or-later
//! RGAA rule engine.
//!
//! Each check module focuses on one RGAA criterion or a pair of related
//! criteria. Checks are registered in a fixed order so that findings for a
//! page always come out deterministically, and each check owns nothing but
//! its inspection logic: the tunable word lists and palettes live in
//! [`RuleTables`], owned by the [`Analyzer`].

pub mod contrast;
pub mod forms;
pub mod images;
pub mod landmarks;
pub mod links;
pub mod page;
pub mod structure;

use scraper::Html;
use tracing::debug;

use crate::model::{Finding, Grade, Severity};

/// Link texts that are not explicit out of context
const VAGUE_LINK_PHRASES: &[&str] = &[
    "click here",
    "here",
    "read more",
    "more",
    "see more",
    "learn more",
];

/// Inline-style declarations flagged as potentially low contrast
const LOW_CONTRAST_PATTERNS: &[&str] = &["color:#999", "color:#ccc", "color:#ddd"];

/// Source-path markers identifying decorative images
const DECORATIVE_SRC_MARKERS: &[&str] = &["decoration", "border", "spacer", "pixel.gif"];

/// Tunable tables shared by the checks
#[derive(Debug, Clone)]
pub struct RuleTables {
    pub vague_link_phrases: Vec<String>,
    pub low_contrast_patterns: Vec<String>,
    pub decorative_src_markers: Vec<String>,
}

impl Default for RuleTables {
    fn default() -> Self {
        Self {
            vague_link_phrases: to_owned(VAGUE_LINK_PHRASES),
            low_contrast_patterns: to_owned(LOW_CONTRAST_PATTERNS),
            decorative_src_markers: to_owned(DECORATIVE_SRC_MARKERS),
        }
    }
}

fn to_owned(table: &[&str]) -> Vec<String> {
    table.iter().map(|s| s.to_string()).collect()
}

/// Everything a check needs to inspect one page
pub struct CheckContext<'a> {
    pub page_url: &'a str,
    pub document: &'a Html,
    pub tables: &'a RuleTables,
}

/// Trait implemented by all checks
pub trait Check: Send + Sync {
    /// RGAA rule identifier this check reports under
    fn rule(&self) -> &'static str;

    /// Short description of what this check inspects
    fn description(&self) -> &'static str;

    /// Inspect a page and return findings (possibly none)
    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding>;
}

/// Build the check registry in its canonical execution order.
///
/// The order is part of the contract: findings for one page are emitted in
/// this sequence, so adding or removing a check is a data change here, not
/// a control-flow edit elsewhere.
pub fn registry() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(images::MissingAltText),
        Box::new(links::VagueLinkText),
        Box::new(forms::UnlabeledControl),
        Box::new(contrast::LowContrastStyle),
        Box::new(page::MissingTitle),
        Box::new(page::MissingLanguage),
        Box::new(structure::HeadingSkip),
        Box::new(landmarks::MissingMainLandmark),
        Box::new(images::SuspectDecorativeAlt),
        Box::new(structure::LooseListChildren),
    ]
}

/// Runs the RGAA checks over raw HTML and turns finding counts into a score
pub struct Analyzer {
    tables: RuleTables,
    checks: Vec<Box<dyn Check>>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self::with_tables(RuleTables::default())
    }

    pub fn with_tables(tables: RuleTables) -> Self {
        Self {
            tables,
            checks: registry(),
        }
    }

    /// Analyze one page.
    ///
    /// Malformed markup is handled by the HTML parser's error recovery;
    /// missing elements simply produce no findings. Never fails.
    pub fn analyze(&self, page_url: &str, html: &str) -> Vec<Finding> {
        let document = Html::parse_document(html);
        let ctx = CheckContext {
            page_url,
            document: &document,
            tables: &self.tables,
        };

        let mut findings = Vec::new();
        for check in &self.checks {
            findings.extend(check.run(&ctx));
        }

        debug!(
            "analyzed {}: {} finding(s) across {} checks",
            page_url,
            findings.len(),
            self.checks.len()
        );
        findings
    }

    /// Compute the 0-100 score from finding counts.
    ///
    /// Normalized penalty model: criticals cost 10, warnings 3, infos 1,
    /// against a budget of 50 penalty points per scanned page. Zero pages
    /// scanned is defined as score 0.
    pub fn score(&self, findings: &[Finding], pages_scanned: usize) -> u32 {
        if pages_scanned == 0 {
            return 0;
        }

        let critical = count(findings, Severity::Critical);
        let warning = count(findings, Severity::Warning);
        let info = count(findings, Severity::Info);

        let total_penalty = critical * 10 + warning * 3 + info;
        let max_penalty = pages_scanned as u64 * 50;

        let score = 100i64 - (total_penalty as f64 / max_penalty as f64 * 100.0) as i64;
        score.clamp(0, 100) as u32
    }

    /// Map a score onto the letter grade bands
    pub fn grade(&self, score: u32) -> Grade {
        Grade::from_score(score)
    }
}

fn count(findings: &[Finding], severity: Severity) -> u64 {
    findings.iter().filter(|f| f.severity == severity).count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn findings_with(critical: usize, warning: usize, info: usize) -> Vec<Finding> {
        let mut findings = Vec::new();
        for _ in 0..critical {
            findings.push(Finding::new("RGAA_1_1", Severity::Critical, "t", "d"));
        }
        for _ in 0..warning {
            findings.push(Finding::new("RGAA_9_1", Severity::Warning, "t", "d"));
        }
        for _ in 0..info {
            findings.push(Finding::new("RGAA_1_2", Severity::Info, "t", "d"));
        }
        findings
    }

    #[test]
    fn test_score_no_findings_is_best() {
        let analyzer = Analyzer::new();
        assert_eq!(analyzer.score(&[], 5), 100);
    }

    #[test]
    fn test_score_zero_pages_baseline() {
        let analyzer = Analyzer::new();
        assert_eq!(analyzer.score(&[], 0), 0);
        assert_eq!(analyzer.score(&findings_with(3, 2, 1), 0), 0);
    }

    #[test]
    fn test_score_stays_in_bounds() {
        let analyzer = Analyzer::new();
        for critical in [0usize, 1, 5, 50, 500] {
            let score = analyzer.score(&findings_with(critical, 0, 0), 1);
            assert!(score <= 100, "score {} out of range", score);
        }
    }

    #[test]
    fn test_score_monotonic_in_critical_count() {
        let analyzer = Analyzer::new();
        let mut previous = u32::MAX;
        for critical in 0..30usize {
            let score = analyzer.score(&findings_with(critical, 2, 1), 3);
            assert!(
                score <= previous,
                "score increased from {} to {} at {} criticals",
                previous,
                score,
                critical
            );
            previous = score;
        }
    }

    #[test]
    fn test_score_severity_weights() {
        let analyzer = Analyzer::new();
        // One page: 50-point budget. 10/3/1 weights.
        assert_eq!(analyzer.score(&findings_with(1, 0, 0), 1), 80);
        assert_eq!(analyzer.score(&findings_with(0, 1, 0), 1), 94);
        assert_eq!(analyzer.score(&findings_with(0, 0, 1), 1), 98);
    }

    #[test]
    fn test_analyze_malformed_html_does_not_panic() {
        let analyzer = Analyzer::new();
        let findings = analyzer.analyze("https://example.com/", "<div><p>unclosed<img");
        // The parser recovers; the img with no alt is still seen.
        assert!(findings.iter().any(|f| f.rule == "RGAA_1_1"));
    }

    #[test]
    fn test_findings_come_out_in_registry_order() {
        let analyzer = Analyzer::new();
        // Page violating image-alt (check 1), vague link (check 2) and
        // missing title (check 5), with lang/main present so no later
        // findings interleave.
        let html = r#"
            <html lang="en"><body><main>
                <img src="/hero.png">
                <a href="/next">click here</a>
            </main></body></html>
        "#;
        let findings = analyzer.analyze("https://example.com/", html);
        let rules: Vec<&str> = findings.iter().map(|f| f.rule.as_str()).collect();
        assert_eq!(rules, vec!["RGAA_1_1", "RGAA_6_1", "RGAA_8_5"]);
    }

    #[test]
    fn test_every_finding_carries_the_page_url() {
        let analyzer = Analyzer::new();
        let html = "<html><body><img src='/a.png'></body></html>";
        let findings = analyzer.analyze("https://example.com/about", html);
        assert!(!findings.is_empty());
        for finding in &findings {
            assert_eq!(finding.page_url, "https://example.com/about");
        }
    }
}
