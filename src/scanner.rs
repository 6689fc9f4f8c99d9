// SPDX-License-Identifier: PMPL-1.0-or-later
//! Scan orchestration.
//!
//! `ScanService` drives the pipeline: crawl the site, analyze each page,
//! score the result, persist as it goes. A scan runs as a detached tokio
//! task that owns clones of every collaborator handle, so it survives the
//! caller going away. One `tokio::time::timeout` budget covers the whole
//! execution; on expiry the run is marked failed and whatever progress was
//! already persisted stays put.
//!
//! Failure policy per phase:
//! - missing/unauthorized site: returned synchronously from `start_scan`
//! - inactive site, empty crawl, timeout: the run ends Failed with a reason
//! - a single page failing to fetch: logged, skipped, scan continues

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::analyzer::Analyzer;
use crate::config::ScanSettings;
use crate::crawler::Crawler;
use crate::error::{Error, Result};
use crate::model::{Finding, Grade, ScanId, ScanRun, ScanStatus, Site, SiteId};
use crate::quota::QuotaService;
use crate::report::ReportGenerator;
use crate::store::Store;

/// Persist the pages-scanned counter every N pages
const PROGRESS_FLUSH_INTERVAL: usize = 5;

/// Orchestrates crawl, analysis and scoring for scan runs
#[derive(Clone)]
pub struct ScanService {
    store: Arc<dyn Store>,
    crawler: Arc<dyn Crawler>,
    analyzer: Arc<Analyzer>,
    report: Arc<dyn ReportGenerator>,
    quota: Arc<dyn QuotaService>,
    settings: ScanSettings,
}

impl ScanService {
    pub fn new(
        store: Arc<dyn Store>,
        crawler: Arc<dyn Crawler>,
        analyzer: Arc<Analyzer>,
        report: Arc<dyn ReportGenerator>,
        quota: Arc<dyn QuotaService>,
        settings: ScanSettings,
    ) -> Self {
        Self {
            store,
            crawler,
            analyzer,
            report,
            quota,
            settings,
        }
    }

    /// Register a new target site for a user.
    ///
    /// Composes the external quota decision before touching the store.
    pub async fn register_site(&self, site: Site) -> Result<Site> {
        if !self.quota.can_user_add_site(&site.user_id).await? {
            return Err(Error::QuotaExceeded);
        }

        self.store.create_site(&site).await?;
        self.store.commit().await?;
        info!("site {} registered for user {}", site.id, site.user_id);
        Ok(site)
    }

    /// Create a scan run and launch its execution in the background.
    ///
    /// Returns the Pending record immediately; callers follow progress by
    /// polling `get_scan_result`.
    pub async fn start_scan(&self, site_id: SiteId, user_id: &str) -> Result<ScanRun> {
        let site = self
            .store
            .get_site(site_id)
            .await?
            .ok_or(Error::SiteNotFound(site_id))?;

        if site.user_id != user_id {
            return Err(Error::Unauthorized);
        }

        let run = ScanRun::new(site_id, user_id.to_string());
        self.store.create_scan(&run).await?;
        self.store.commit().await?;

        info!("scan {} created for site {}", run.id, site_id);

        // The spawned task owns its own collaborator handles; nothing is
        // borrowed from the caller's scope.
        let service = self.clone();
        let scan_id = run.id;
        tokio::spawn(async move {
            service.execute_scan(scan_id).await;
        });

        Ok(run)
    }

    /// Whether the user is below the concurrent-scan limit and the external
    /// quota allows another scan
    pub async fn can_user_start_scan(&self, user_id: &str) -> Result<bool> {
        let active = self.store.count_active_scans(user_id).await?;
        if active >= self.settings.max_concurrent_scans {
            warn!(
                "user {} reached the concurrent scan limit ({})",
                user_id, self.settings.max_concurrent_scans
            );
            return Ok(false);
        }

        self.quota.can_user_start_scan(user_id).await
    }

    /// Look up one scan run
    pub async fn get_scan_result(&self, scan_id: ScanId) -> Result<Option<ScanRun>> {
        self.store.get_scan(scan_id).await
    }

    /// Findings persisted for one scan
    pub async fn get_scan_findings(&self, scan_id: ScanId) -> Result<Vec<Finding>> {
        self.store.findings_for_scan(scan_id).await
    }

    /// A user's scans, most recently started first
    pub async fn get_user_scan_history(&self, user_id: &str, limit: usize) -> Result<Vec<ScanRun>> {
        self.store.list_scans_for_user(user_id, limit).await
    }

    /// Generate the report artifact for a completed scan and record its path
    pub async fn generate_report(&self, scan_id: ScanId) -> Result<std::path::PathBuf> {
        let mut run = self
            .store
            .get_scan(scan_id)
            .await?
            .ok_or(Error::ScanNotFound(scan_id))?;

        if run.status != ScanStatus::Completed {
            return Err(Error::InvalidState(
                "report generation requires a completed scan".to_string(),
            ));
        }

        let findings = self.store.findings_for_scan(scan_id).await?;
        let path = self.report.generate(&run, &findings).await?;

        run.report_path = Some(path.clone());
        self.store.update_scan(&run).await?;

        Ok(path)
    }

    /// Run the pipeline for one scan under the wall-clock budget.
    ///
    /// Every outcome ends with the run in a terminal state, except when even
    /// recording the failure fails; that is logged and given up on.
    async fn execute_scan(&self, scan_id: ScanId) {
        let outcome =
            tokio::time::timeout(self.settings.scan_timeout(), self.run_pipeline(scan_id)).await;

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                warn!("scan {} failed: {}", scan_id, err);
                self.record_failure(scan_id, &err.to_string()).await;
            }
            Err(_elapsed) => {
                warn!("scan {} hit the execution time budget", scan_id);
                self.record_failure(scan_id, &Error::Timeout.to_string())
                    .await;
            }
        }
    }

    async fn run_pipeline(&self, scan_id: ScanId) -> Result<()> {
        let mut run = self
            .store
            .get_scan(scan_id)
            .await?
            .ok_or(Error::ScanNotFound(scan_id))?;
        let mut site = self
            .store
            .get_site(run.site_id)
            .await?
            .ok_or(Error::SiteNotFound(run.site_id))?;

        if !site.active {
            return Err(Error::SiteInactive);
        }

        info!("starting scan {} for {}", run.id, site.url);
        run.start();
        self.store.update_scan(&run).await?;

        // Phase 1: crawl
        info!("phase 1: crawling {}", site.url);
        let urls = self
            .crawler
            .crawl(&site.url, site.max_depth, site.include_subdomains)
            .await?;

        if urls.is_empty() {
            return Err(Error::NoAccessiblePages);
        }
        info!("crawl found {} URL(s)", urls.len());

        // Phase 2: per-page analysis. Pages beyond the cap are dropped in
        // discovery order; a failing page is skipped, not fatal.
        info!("phase 2: accessibility analysis");
        let mut findings: Vec<Finding> = Vec::new();
        let mut pages_analyzed = 0usize;

        for url in urls.iter().take(self.settings.max_pages_per_scan) {
            match self.crawler.fetch_content(url).await {
                Ok(content) if content.trim().is_empty() => {
                    debug!("page {} is empty, counted without findings", url);
                    pages_analyzed += 1;
                }
                Ok(content) => {
                    let page_findings = self.analyzer.analyze(url, &content);
                    debug!("analyzed {}: {} issue(s)", url, page_findings.len());
                    findings.extend(page_findings.into_iter().map(|f| f.for_scan(scan_id)));
                    pages_analyzed += 1;
                }
                Err(err) => {
                    warn!("skipping page {}: {}", url, err);
                    continue;
                }
            }

            if pages_analyzed % PROGRESS_FLUSH_INTERVAL == 0 {
                run.pages_scanned = pages_analyzed as u32;
                self.store.update_scan(&run).await?;
                self.store.commit().await?;
            }
        }

        // Phase 3: scoring and finalization
        info!("phase 3: scoring");
        let score = self.analyzer.score(&findings, pages_analyzed);
        let grade = Grade::from_score(score);

        run.pages_scanned = pages_analyzed as u32;
        run.complete(score, grade, &findings);

        self.store.save_findings(&findings).await?;

        site.last_scan_at = Some(chrono::Utc::now());
        self.store.update_site(&site).await?;
        self.store.update_scan(&run).await?;
        self.store.commit().await?;

        info!(
            "scan {} completed: score {}/100, grade {}, {} issue(s) on {} page(s)",
            run.id, score, grade, run.total_issues, run.pages_scanned
        );
        Ok(())
    }

    /// Best-effort terminal failure record. If the run cannot be loaded or
    /// updated anymore, the error is logged and swallowed; the run keeps its
    /// last persisted state.
    async fn record_failure(&self, scan_id: ScanId, reason: &str) {
        match self.store.get_scan(scan_id).await {
            Ok(Some(mut run)) => {
                run.fail(reason);
                if let Err(err) = self.store.update_scan(&run).await {
                    error!("could not record failure of scan {}: {}", scan_id, err);
                }
            }
            Ok(None) => {
                error!("scan {} vanished while recording its failure", scan_id);
            }
            Err(err) => {
                error!("could not load scan {} to record failure: {}", scan_id, err);
            }
        }
    }
}
