// SPDX-License-Identifier: PMPL-1.0-or-later
//! Color contrast check - RGAA 3.2
//!
//! Static approximation without a rendering engine: inline `<style>` blocks
//! that declare both a text color and a background are scanned for a fixed
//! palette of light-gray text colors known to fall below the 4.5:1 ratio on
//! common backgrounds. Matching is plain substring matching, the same
//! trade-off the palette table is written for.

use scraper::Selector;

use crate::analyzer::{Check, CheckContext};
use crate::model::{Finding, Severity};

/// RGAA 3.2: potentially insufficient text/background contrast
pub struct LowContrastStyle;

impl Check for LowContrastStyle {
    fn rule(&self) -> &'static str {
        "RGAA_3_2"
    }

    fn description(&self) -> &'static str {
        "Text color must contrast sufficiently with its background"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let style_sel = Selector::parse("style").expect("valid selector");
        let mut findings = Vec::new();

        for style in ctx.document.select(&style_sel) {
            let css = style.text().collect::<String>();

            if !css.contains("color:") || !css.contains("background") {
                continue;
            }

            let suspicious = ctx
                .tables
                .low_contrast_patterns
                .iter()
                .any(|pattern| css.contains(pattern.as_str()));
            if !suspicious {
                continue;
            }

            findings.push(
                Finding::new(
                    self.rule(),
                    Severity::Warning,
                    "Insufficient color contrast",
                    "The contrast between text and background could be insufficient.",
                )
                .on_page(ctx.page_url)
                .with_selector("style")
                .with_element(&css)
                .with_suggestion("Check that the contrast ratio is at least 4.5:1 for normal text.")
                .with_code_example("color: #333; background: #fff; /* 12.6:1 */"),
            );
        }

        findings
    }
}
