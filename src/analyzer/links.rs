// SPDX-License-Identifier: PMPL-1.0-or-later
//! Link text check - RGAA 6.1
//!
//! A link must make sense out of context. Empty link texts and texts built
//! around vague phrases ("click here", "read more") are flagged. Matching is
//! case-insensitive substring matching against the configured phrase table.

use scraper::Selector;

use crate::analyzer::{Check, CheckContext};
use crate::model::{Finding, Severity};

/// RGAA 6.1: links with empty or non-descriptive text
pub struct VagueLinkText;

impl Check for VagueLinkText {
    fn rule(&self) -> &'static str {
        "RGAA_6_1"
    }

    fn description(&self) -> &'static str {
        "Link text must be explicit out of context"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let link_sel = Selector::parse("a[href]").expect("valid selector");
        let mut findings = Vec::new();

        for link in ctx.document.select(&link_sel) {
            let text = link.text().collect::<String>();
            let text = text.trim();
            let lower = text.to_lowercase();

            let vague = ctx
                .tables
                .vague_link_phrases
                .iter()
                .any(|phrase| lower.contains(phrase.as_str()));

            if !text.is_empty() && !vague {
                continue;
            }

            let href = link.value().attr("href").unwrap_or("");
            findings.push(
                Finding::new(
                    self.rule(),
                    Severity::Critical,
                    "Link is not explicit",
                    "This link does not make sense out of context.",
                )
                .on_page(ctx.page_url)
                .with_selector(&format!("a[href='{}']", href))
                .with_element(&link.html())
                .with_suggestion(
                    "Use link text that describes the target content or the link's function.",
                )
                .with_code_example("<a href=\"/contact\">Contact our support team</a>"),
            );
        }

        findings
    }
}
