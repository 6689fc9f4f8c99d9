// SPDX-License-Identifier: PMPL-1.0-or-later
//! Breadth-first site crawler.
//!
//! Discovers same-site pages from a root URL under depth and size caps and
//! fetches raw HTML for the analyzer. No rendering, no script execution:
//! pages are inspected as served.
//!
//! Safety bounds are hard ceilings, not targets:
//! - at most `max_urls_per_crawl` URLs discovered per crawl (default 100)
//! - at most `max_links_per_page` new links expanded per page (default 10)
//!
//! The frontier (queue plus visited set) is local to each `crawl` call, so
//! concurrent crawls never share state.

use std::collections::{HashSet, VecDeque};
use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::CrawlerConfig;
use crate::error::{Error, Result};

/// Path extensions never worth analyzing as pages
const EXCLUDED_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png", "gif", "css", "js", "xml"];

/// Site discovery and page fetching
#[async_trait]
pub trait Crawler: Send + Sync {
    /// Discover in-scope URLs breadth-first from a root.
    ///
    /// Returns URLs in discovery order. An unreachable root yields an empty
    /// list, not an error.
    async fn crawl(
        &self,
        root_url: &str,
        max_depth: usize,
        include_subdomains: bool,
    ) -> Result<Vec<String>>;

    /// Fetch a page's raw HTML; fails on non-2xx or network errors
    async fn fetch_content(&self, url: &str) -> Result<String>;

    /// HEAD probe; false on any error, never fails
    async fn is_reachable(&self, url: &str) -> bool;
}

/// Caps and scope tables applied during one crawl
#[derive(Debug, Clone)]
pub struct CrawlPolicy {
    pub max_urls: usize,
    pub max_links_per_page: usize,
    pub excluded_extensions: Vec<String>,
}

impl Default for CrawlPolicy {
    fn default() -> Self {
        Self {
            max_urls: 100,
            max_links_per_page: 10,
            excluded_extensions: EXCLUDED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CrawlPolicy {
    fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_urls: config.max_urls_per_crawl,
            max_links_per_page: config.max_links_per_page,
            ..Self::default()
        }
    }
}

/// reqwest-backed crawler
pub struct HttpCrawler {
    client: Client,
    policy: CrawlPolicy,
}

impl HttpCrawler {
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.fetch_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            policy: CrawlPolicy::from_config(config),
        })
    }
}

#[async_trait]
impl Crawler for HttpCrawler {
    async fn crawl(
        &self,
        root_url: &str,
        max_depth: usize,
        include_subdomains: bool,
    ) -> Result<Vec<String>> {
        let root = Url::parse(root_url).map_err(|_| Error::InvalidUrl(root_url.to_string()))?;
        let root_host = root
            .host_str()
            .ok_or_else(|| Error::InvalidUrl(root_url.to_string()))?
            .to_string();

        let mut frontier = Frontier::new();
        frontier.enqueue(root_url.to_string(), 0);

        let mut discovered = Vec::new();

        while discovered.len() < self.policy.max_urls {
            let Some((current, depth)) = frontier.next() else {
                break;
            };
            if depth > max_depth {
                continue;
            }

            if !self.is_reachable(&current).await {
                debug!("skipping unreachable URL {}", current);
                continue;
            }

            discovered.push(current.clone());

            if depth < max_depth {
                match self.fetch_content(&current).await {
                    Ok(body) => {
                        let links = extract_links(
                            &body,
                            &current,
                            &root_host,
                            include_subdomains,
                            &self.policy,
                        );
                        for link in links.into_iter().take(self.policy.max_links_per_page) {
                            frontier.enqueue(link, depth + 1);
                        }
                    }
                    Err(err) => {
                        warn!("failed to expand links from {}: {}", current, err);
                    }
                }
            }
        }

        info!("crawl finished: {} URL(s) discovered", discovered.len());
        Ok(discovered)
    }

    async fn fetch_content(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Fetch {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    async fn is_reachable(&self, url: &str) -> bool {
        self.client
            .head(url)
            .send()
            .await
            .map(|response| response.status().is_success())
            .unwrap_or(false)
    }
}

/// Pending-URL queue with its visited set.
///
/// A URL is handed out at most once per crawl; duplicate enqueues are
/// tolerated and dropped on dequeue.
struct Frontier {
    queue: VecDeque<(String, usize)>,
    visited: HashSet<String>,
}

impl Frontier {
    fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            visited: HashSet::new(),
        }
    }

    fn enqueue(&mut self, url: String, depth: usize) {
        if !self.visited.contains(&url) {
            self.queue.push_back((url, depth));
        }
    }

    fn next(&mut self) -> Option<(String, usize)> {
        while let Some((url, depth)) = self.queue.pop_front() {
            if self.visited.insert(url.clone()) {
                return Some((url, depth));
            }
        }
        None
    }
}

/// Extract in-scope links from a page.
///
/// Links are resolved against the page URL, normalized to
/// `scheme://host/path` (query and fragment stripped), filtered to the root
/// host (or its subdomains when allowed) and to non-excluded extensions.
/// Malformed URLs are skipped silently. Deduplicated within the page.
fn extract_links(
    html: &str,
    page_url: &str,
    root_host: &str,
    include_subdomains: bool,
    policy: &CrawlPolicy,
) -> Vec<String> {
    let base = match Url::parse(page_url) {
        Ok(url) => url,
        Err(_) => return Vec::new(),
    };

    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").expect("valid selector");

    let mut links = Vec::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if href.trim().is_empty() {
            continue;
        }

        let Ok(resolved) = base.join(href) else {
            continue;
        };
        if resolved.scheme() != "http" && resolved.scheme() != "https" {
            continue;
        }
        let Some(host) = resolved.host_str() else {
            continue;
        };
        if !host_in_scope(host, root_host, include_subdomains) {
            continue;
        }
        if has_excluded_extension(resolved.path(), &policy.excluded_extensions) {
            continue;
        }

        let normalized = format!("{}://{}{}", resolved.scheme(), host, resolved.path());
        if !links.contains(&normalized) {
            links.push(normalized);
        }
    }

    links
}

fn host_in_scope(host: &str, root_host: &str, include_subdomains: bool) -> bool {
    if host == root_host {
        return true;
    }
    if !include_subdomains {
        return false;
    }

    let apex = root_host.trim_start_matches("www.");
    host == apex || host.ends_with(&format!(".{}", apex))
}

fn has_excluded_extension(path: &str, excluded: &[String]) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| excluded.iter().any(|entry| entry.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}
