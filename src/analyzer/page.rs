// SPDX-License-Identifier: PMPL-1.0-or-later
//! Page metadata checks - RGAA 8.5 (title) and RGAA 8.3 (language)

use scraper::Selector;

use crate::analyzer::{Check, CheckContext};
use crate::model::{Finding, Severity};

/// RGAA 8.5: missing or empty page title
pub struct MissingTitle;

impl Check for MissingTitle {
    fn rule(&self) -> &'static str {
        "RGAA_8_5"
    }

    fn description(&self) -> &'static str {
        "Every page must have a relevant title"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let title_sel = Selector::parse("title").expect("valid selector");

        let title_text = ctx
            .document
            .select(&title_sel)
            .next()
            .map(|title| title.text().collect::<String>());

        let missing = match &title_text {
            None => true,
            Some(text) => text.trim().is_empty(),
        };
        if !missing {
            return Vec::new();
        }

        vec![Finding::new(
            self.rule(),
            Severity::Critical,
            "Missing page title",
            "This page has no title or the title is empty.",
        )
        .on_page(ctx.page_url)
        .with_selector("title")
        .with_element("<title></title>")
        .with_suggestion("Add a descriptive title to the page.")
        .with_code_example("<title>Home - My Website</title>")]
    }
}

/// RGAA 8.3: undeclared page language
pub struct MissingLanguage;

impl Check for MissingLanguage {
    fn rule(&self) -> &'static str {
        "RGAA_8_3"
    }

    fn description(&self) -> &'static str {
        "The main language of the page must be declared"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let html_sel = Selector::parse("html").expect("valid selector");

        let lang = ctx
            .document
            .select(&html_sel)
            .next()
            .and_then(|root| root.value().attr("lang"));

        let declared = lang.map(|value| !value.trim().is_empty()).unwrap_or(false);
        if declared {
            return Vec::new();
        }

        vec![Finding::new(
            self.rule(),
            Severity::Warning,
            "Page language not declared",
            "The main language of the page is not declared.",
        )
        .on_page(ctx.page_url)
        .with_selector("html")
        .with_element("<html>")
        .with_suggestion("Add the lang attribute to the html element.")
        .with_code_example("<html lang=\"fr\">")]
    }
}
