// SPDX-License-Identifier: PMPL-1.0-or-later
//! Landmark check - RGAA 12.6
//!
//! Pages must expose a main content region so assistive technologies can
//! jump straight to it.

use scraper::Selector;

use crate::analyzer::{Check, CheckContext};
use crate::model::{Finding, Severity};

/// RGAA 12.6: no main landmark on the page
pub struct MissingMainLandmark;

impl Check for MissingMainLandmark {
    fn rule(&self) -> &'static str {
        "RGAA_12_6"
    }

    fn description(&self) -> &'static str {
        "The main content region must be identified"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let main_sel = Selector::parse("main").expect("valid selector");

        if ctx.document.select(&main_sel).next().is_some() {
            return Vec::new();
        }

        vec![Finding::new(
            self.rule(),
            Severity::Warning,
            "Missing main content region",
            "The page has no identified main region.",
        )
        .on_page(ctx.page_url)
        .with_selector("body")
        .with_element("no main element found")
        .with_suggestion("Add a main element to identify the primary content.")
        .with_code_example("<main>Primary page content</main>")]
    }
}
