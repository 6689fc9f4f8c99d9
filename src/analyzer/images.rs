// SPDX-License-Identifier: PMPL-1.0-or-later
//! Image alternative-text checks - RGAA 1.1 and RGAA 1.2
//!
//! Two sides of the same criterion:
//! - An informative image must carry an `alt` attribute (RGAA 1.1)
//! - An image marked decorative with `alt=""` that does not look decorative
//!   may be hiding information from screen readers (RGAA 1.2)
//!
//! Both checks share the decorative heuristic: `role="presentation"` or a
//! source path containing one of the configured markers.

use scraper::{ElementRef, Selector};

use crate::analyzer::{Check, CheckContext};
use crate::model::{Finding, Severity};

/// RGAA 1.1: informative images without an alt attribute
pub struct MissingAltText;

impl Check for MissingAltText {
    fn rule(&self) -> &'static str {
        "RGAA_1_1"
    }

    fn description(&self) -> &'static str {
        "Informative images must carry a text alternative"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let img_sel = Selector::parse("img").expect("valid selector");
        let mut findings = Vec::new();

        for img in ctx.document.select(&img_sel) {
            if img.value().attr("alt").is_some() {
                continue;
            }
            if is_decorative(&img, &ctx.tables.decorative_src_markers) {
                continue;
            }

            let src = img.value().attr("src").unwrap_or("");
            findings.push(
                Finding::new(
                    self.rule(),
                    Severity::Critical,
                    "Image missing a text alternative",
                    "This informative image has no alt attribute.",
                )
                .on_page(ctx.page_url)
                .with_selector(&format!("img[src='{}']", src))
                .with_element(&img.html())
                .with_suggestion("Add an alt attribute describing the image content.")
                .with_code_example(&format!(
                    "<img src=\"{}\" alt=\"Description of the image\">",
                    src
                )),
            );
        }

        findings
    }
}

/// RGAA 1.2: empty-alt images that do not look decorative
pub struct SuspectDecorativeAlt;

impl Check for SuspectDecorativeAlt {
    fn rule(&self) -> &'static str {
        "RGAA_1_2"
    }

    fn description(&self) -> &'static str {
        "Images marked decorative should really be decorative"
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let img_sel = Selector::parse("img").expect("valid selector");
        let mut findings = Vec::new();

        for img in ctx.document.select(&img_sel) {
            if img.value().attr("alt") != Some("") {
                continue;
            }

            let src = img.value().attr("src").unwrap_or("");
            if src.trim().is_empty() || is_decorative(&img, &ctx.tables.decorative_src_markers) {
                continue;
            }

            findings.push(
                Finding::new(
                    self.rule(),
                    Severity::Info,
                    "Image possibly mis-tagged as decorative",
                    "This image with an empty alt could be carrying information.",
                )
                .on_page(ctx.page_url)
                .with_selector(&format!("img[src='{}']", src))
                .with_element(&img.html())
                .with_suggestion(
                    "Check whether this image is really decorative or needs a description.",
                )
                .with_code_example("<img src=\"decoration.png\" alt=\"\" role=\"presentation\">"),
            );
        }

        findings
    }
}

/// Shared decorative-image heuristic.
///
/// Markers are matched as case-insensitive substrings of the source path.
pub(crate) fn is_decorative(img: &ElementRef<'_>, markers: &[String]) -> bool {
    let role = img.value().attr("role").unwrap_or("");
    if role.eq_ignore_ascii_case("presentation") {
        return true;
    }

    let src = img.value().attr("src").unwrap_or("").to_lowercase();
    markers.iter().any(|marker| src.contains(marker.as_str()))
}
