// SPDX-License-Identifier: PMPL-1.0-or-later
//! Rgaabot - RGAA Website Accessibility Compliance Scanner
//!
//! Rgaabot audits public websites against a subset of the RGAA
//! (Référentiel Général d'Amélioration de l'Accessibilité) catalog and
//! produces a 0-100 score, an A-F grade, and a list of findings per page.
//!
//! ## Pipeline
//!
//! - **Crawler**: breadth-first same-site discovery under depth and size
//!   caps, raw HTML fetching (no rendering, no script execution)
//! - **Analyzer**: ten independent RGAA checks run in a fixed order over
//!   each page's DOM
//! - **Scanner**: orchestrates crawl, analysis and scoring as a background
//!   task with a wall-clock timeout and per-user concurrency limits
//!
//! ## Checks
//!
//! - **RGAA 1.1**: Images without a text alternative
//! - **RGAA 6.1**: Links with empty or vague text
//! - **RGAA 11.1**: Form controls without an associated label
//! - **RGAA 3.2**: Low-contrast color declarations in inline styles
//! - **RGAA 8.5**: Missing or empty page title
//! - **RGAA 8.3**: Undeclared page language
//! - **RGAA 9.1**: Heading hierarchy skips
//! - **RGAA 12.6**: Missing main landmark
//! - **RGAA 1.2**: Images possibly mis-tagged as decorative
//! - **RGAA 9.3**: Lists with stray non-item children

pub mod analyzer;
pub mod config;
pub mod crawler;
pub mod error;
pub mod model;
pub mod quota;
pub mod report;
pub mod scanner;
pub mod store;
