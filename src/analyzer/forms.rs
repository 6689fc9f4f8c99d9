// SPDX-License-Identifier: PMPL-1.0-or-later
//! Form labeling check - RGAA 11.1
//!
//! Every input, textarea and select needs an accessible name: either a
//! `<label for>` pointing at its id, or a non-empty `aria-label`. Inputs of
//! type hidden, submit and button are exempt (their name comes from the
//! control itself).

use std::collections::HashSet;

use scraper::Selector;

use crate::analyzer::{Check, CheckContext};
use crate::model::{Finding, Severity};

/// Input types that need no associated label
const EXEMPT_INPUT_TYPES: &[&str] = &["hidden", "submit", "button"];

/// RGAA 11.1: form controls without an associated label
pub struct UnlabeledControl;

impl Check for UnlabeledControl {
    fn rule(&self) -> &'static str {
        "RGAA_11_1"
    }

    fn description(&self) -> &'static str {
        "Form controls must have an associated label"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let control_sel = Selector::parse("input, textarea, select").expect("valid selector");
        let label_sel = Selector::parse("label[for]").expect("valid selector");
        let mut findings = Vec::new();

        let label_targets: HashSet<&str> = ctx
            .document
            .select(&label_sel)
            .filter_map(|label| label.value().attr("for"))
            .collect();

        for control in ctx.document.select(&control_sel) {
            if control.value().name() == "input" {
                let input_type = control.value().attr("type").unwrap_or("text");
                if EXEMPT_INPUT_TYPES.contains(&input_type) {
                    continue;
                }
            }

            let labeled = control
                .value()
                .attr("id")
                .map(|id| !id.is_empty() && label_targets.contains(id))
                .unwrap_or(false);
            let aria_labeled = control
                .value()
                .attr("aria-label")
                .map(|label| !label.trim().is_empty())
                .unwrap_or(false);

            if labeled || aria_labeled {
                continue;
            }

            let name = control.value().attr("name").unwrap_or("");
            let id = control.value().attr("id").unwrap_or("field-id");
            findings.push(
                Finding::new(
                    self.rule(),
                    Severity::Critical,
                    "Form control without a label",
                    "This form control has no associated label.",
                )
                .on_page(ctx.page_url)
                .with_selector(&format!("{}[name='{}']", control.value().name(), name))
                .with_element(&control.html())
                .with_suggestion(
                    "Associate a label with the control via the for attribute or aria-label.",
                )
                .with_code_example(&format!(
                    "<label for=\"{}\">Field label</label>\n<input type=\"text\" id=\"{}\" name=\"{}\">",
                    id, id, name
                )),
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

    fn run_check(html: &str) -> Vec<Finding> {
        let document = Html::parse_document(html);
        let tables = RuleTables::default();
        let ctx = CheckContext {
            page_url: "https://example.com/",
            document: &document,
            tables: &tables,
        };
        UnlabeledControl.run(&ctx)
    }

    #[test]
    fn test_labeled_input_passes() {
        let html = r#"
            <html><body><form>
                <label for="email">Email address</label>
                <input type="email" id="email" name="email">
            </form></body></html>
        "#;
        assert!(run_check(html).is_empty());
    }

    #[test]
    fn test_aria_label_passes() {
        let html = r#"
            <html><body><form>
                <input type="search" name="q" aria-label="Search the site">
            </form></body></html>
        "#;
        assert!(run_check(html).is_empty());
    }

    #[test]
    fn test_unlabeled_input_flagged() {
        let html = r#"
            <html><body><form>
                <input type="text" name="city">
            </form></body></html>
        "#;
        let findings = run_check(html);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, "RGAA_11_1");
        assert_eq!(findings[0].severity, Severity::Critical);
    }

    #[test]
    fn test_exempt_input_types_ignored() {
        let html = r#"
            <html><body><form>
                <input type="hidden" name="csrf" value="x">
                <input type="submit" value="Send">
                <input type="button" value="Cancel">
            </form></body></html>
        "#;
        assert!(run_check(html).is_empty());
    }

    #[test]
    fn test_unlabeled_textarea_and_select_flagged() {
        let html = r#"
            <html><body><form>
                <textarea name="message"></textarea>
                <select name="country"><option>FR</option></select>
            </form></body></html>
        "#;
        let findings = run_check(html);
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn test_empty_aria_label_does_not_count() {
        let html = r#"
            <html><body><form>
                <input type="text" name="city" aria-label="  ">
            </form></body></html>
        "#;
        assert_eq!(run_check(html).len(), 1);
    }
}
