// SPDX-License-Identifier: PMPL-1.0-or-later
//! Document structure checks - RGAA 9.1 (headings) and RGAA 9.3 (lists)
//!
//! - Heading levels must not skip (an h2 followed by an h4 hides a level
//!   from assistive-technology outlines)
//! - ul/ol elements must only have li element children

use scraper::{ElementRef, Selector};

use crate::analyzer::{Check, CheckContext};
use crate::model::{Finding, Severity};

/// RGAA 9.1: skipped levels in the heading hierarchy
pub struct HeadingSkip;

impl Check for HeadingSkip {
    fn rule(&self) -> &'static str {
        "RGAA_9_1"
    }

    fn description(&self) -> &'static str {
        "Heading levels must not skip"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let heading_sel = Selector::parse("h1, h2, h3, h4, h5, h6").expect("valid selector");

        // Document order, paired with the element for reporting
        let headings: Vec<(u8, ElementRef<'_>)> = ctx
            .document
            .select(&heading_sel)
            .filter_map(|el| {
                let level = el.value().name().strip_prefix('h')?.parse::<u8>().ok()?;
                Some((level, el))
            })
            .collect();

        let mut findings = Vec::new();
        for pair in headings.windows(2) {
            let (prev, _) = pair[0];
            let (curr, ref element) = pair[1];
            if curr <= prev + 1 {
                continue;
            }

            findings.push(
                Finding::new(
                    self.rule(),
                    Severity::Warning,
                    "Skipped level in the heading hierarchy",
                    &format!(
                        "Jump from h{} to h{} without an intermediate level.",
                        prev, curr
                    ),
                )
                .on_page(ctx.page_url)
                .with_selector(&format!("h{}", curr))
                .with_element(&element.html())
                .with_suggestion("Follow the heading hierarchy without skipping levels.")
                .with_code_example(&format!(
                    "<h{}>Heading</h{}>\n<h{}>Subheading</h{}>",
                    prev,
                    prev,
                    prev + 1,
                    prev + 1
                )),
            );
        }

        findings
    }
}

/// RGAA 9.3: lists whose direct element children are not all li
pub struct LooseListChildren;

impl Check for LooseListChildren {
    fn rule(&self) -> &'static str {
        "RGAA_9_3"
    }

    fn description(&self) -> &'static str {
        "Lists must only contain list items as direct children"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let list_sel = Selector::parse("ul, ol").expect("valid selector");
        let mut findings = Vec::new();

        for list in ctx.document.select(&list_sel) {
            let has_stray_children = list
                .children()
                .filter_map(ElementRef::wrap)
                .any(|child| child.value().name() != "li");
            if !has_stray_children {
                continue;
            }

            findings.push(
                Finding::new(
                    self.rule(),
                    Severity::Warning,
                    "Incorrect list structure",
                    "This list contains elements that are not list items (li).",
                )
                .on_page(ctx.page_url)
                .with_selector(list.value().name())
                .with_element(&list.html())
                .with_suggestion("Lists must only have li elements as direct children.")
                .with_code_example("<ul><li>Item 1</li><li>Item 2</li></ul>"),
            );
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::RuleTables;
    use scraper::Html;

    fn run_check(check: &dyn Check, html: &str) -> Vec<Finding> {
        let document = Html::parse_document(html);
        let tables = RuleTables::default();
        let ctx = CheckContext {
            page_url: "https://example.com/",
            document: &document,
            tables: &tables,
        };
        check.run(&ctx)
    }

    #[test]
    fn test_ordered_hierarchy_passes() {
        let html = r#"
            <html><body>
                <h1>Title</h1>
                <h2>Section</h2>
                <h3>Subsection</h3>
                <h2>Other section</h2>
            </body></html>
        "#;
        assert!(run_check(&HeadingSkip, html).is_empty());
    }

    #[test]
    fn test_skip_from_h1_to_h3_flagged() {
        let html = r#"<html><body><h1>Title</h1><h3>Deep</h3></body></html>"#;
        let findings = run_check(&HeadingSkip, html);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, "RGAA_9_1");
        assert_eq!(findings[0].severity, Severity::Warning);
        assert!(findings[0].description.contains("h1"));
        assert!(findings[0].description.contains("h3"));
    }

    #[test]
    fn test_going_back_up_is_allowed() {
        // h3 back to h2 is a descent in the outline, not a skip
        let html = r#"<html><body><h1>A</h1><h2>B</h2><h3>C</h3><h2>D</h2></body></html>"#;
        assert!(run_check(&HeadingSkip, html).is_empty());
    }

    #[test]
    fn test_each_skip_reported_separately() {
        let html = r#"<html><body><h1>A</h1><h3>B</h3><h5>C</h5></body></html>"#;
        assert_eq!(run_check(&HeadingSkip, html).len(), 2);
    }

    #[test]
    fn test_no_headings_no_findings() {
        assert!(run_check(&HeadingSkip, "<html><body><p>text</p></body></html>").is_empty());
    }

    #[test]
    fn test_clean_list_passes() {
        let html = r#"<html><body><ul><li>One</li><li>Two</li></ul></body></html>"#;
        assert!(run_check(&LooseListChildren, html).is_empty());
    }

    #[test]
    fn test_stray_div_in_list_flagged() {
        let html = r#"
            <html><body>
                <ul><li>One</li><div>stray</div><li>Two</li></ul>
            </body></html>
        "#;
        let findings = run_check(&LooseListChildren, html);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, "RGAA_9_3");
    }

    #[test]
    fn test_text_nodes_between_items_are_fine() {
        // Only element children count; whitespace text nodes do not
        let html = "<html><body><ol>\n  <li>One</li>\n  <li>Two</li>\n</ol></body></html>";
        assert!(run_check(&LooseListChildren, html).is_empty());
    }

    #[test]
    fn test_nested_list_inside_li_passes() {
        let html = r#"
            <html><body>
                <ul><li>One<ul><li>Nested</li></ul></li></ul>
            </body></html>
        "#;
        assert!(run_check(&LooseListChildren, html).is_empty());
    }
}
