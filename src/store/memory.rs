// SPDX-License-Identifier: PMPL-1.0-or-later
//! In-memory store backend
//!
//! Single RwLock over the whole state: scans are coarse-grained writers and
//! status pollers are cheap readers, so finer locking buys nothing here.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::model::{Finding, ScanId, ScanRun, Site, SiteId};
use crate::store::Store;

#[derive(Default)]
struct Inner {
    sites: HashMap<SiteId, Site>,
    scans: HashMap<ScanId, ScanRun>,
    findings: HashMap<ScanId, Vec<Finding>>,
}

/// In-memory reference implementation of [`Store`]
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_site(&self, site: &Site) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.sites.insert(site.id, site.clone());
        Ok(())
    }

    async fn get_site(&self, id: SiteId) -> Result<Option<Site>> {
        let inner = self.inner.read().await;
        Ok(inner.sites.get(&id).cloned())
    }

    async fn update_site(&self, site: &Site) -> Result<()> {
        let mut inner = self.inner.write().await;
        match inner.sites.get_mut(&site.id) {
            Some(existing) => {
                *existing = site.clone();
                Ok(())
            }
            None => Err(Error::SiteNotFound(site.id)),
        }
    }

    async fn list_sites_for_user(&self, user_id: &str) -> Result<Vec<Site>> {
        let inner = self.inner.read().await;
        Ok(inner
            .sites
            .values()
            .filter(|site| site.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_scan(&self, run: &ScanRun) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.scans.insert(run.id, run.clone());
        Ok(())
    }

    async fn get_scan(&self, id: ScanId) -> Result<Option<ScanRun>> {
        let inner = self.inner.read().await;
        Ok(inner.scans.get(&id).cloned())
    }

    async fn update_scan(&self, run: &ScanRun) -> Result<()> {
        let mut inner = self.inner.write().await;
        match inner.scans.get_mut(&run.id) {
            Some(existing) => {
                *existing = run.clone();
                Ok(())
            }
            None => Err(Error::ScanNotFound(run.id)),
        }
    }

    async fn list_scans_for_user(&self, user_id: &str, limit: usize) -> Result<Vec<ScanRun>> {
        let inner = self.inner.read().await;
        let mut scans: Vec<ScanRun> = inner
            .scans
            .values()
            .filter(|run| run.user_id == user_id)
            .cloned()
            .collect();
        scans.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        scans.truncate(limit);
        Ok(scans)
    }

    async fn count_active_scans(&self, user_id: &str) -> Result<usize> {
        let inner = self.inner.read().await;
        Ok(inner
            .scans
            .values()
            .filter(|run| run.user_id == user_id && run.status.is_active())
            .count())
    }

    async fn save_findings(&self, findings: &[Finding]) -> Result<()> {
        let mut inner = self.inner.write().await;
        for finding in findings {
            let Some(scan_id) = finding.scan_id else {
                return Err(Error::Store(
                    "cannot persist a finding without an owning scan".to_string(),
                ));
            };
            inner
                .findings
                .entry(scan_id)
                .or_default()
                .push(finding.clone());
        }
        Ok(())
    }

    async fn findings_for_scan(&self, scan_id: ScanId) -> Result<Vec<Finding>> {
        let inner = self.inner.read().await;
        Ok(inner.findings.get(&scan_id).cloned().unwrap_or_default())
    }

    async fn commit(&self) -> Result<()> {
        // Writes land directly in the maps; nothing to flush
        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Grade, ScanStatus, Severity};
    use chrono::Duration;

    #[tokio::test]
    async fn test_site_roundtrip() {
        let store = MemoryStore::new();
        let site = Site::new("https://example.com", "Example", "user-1");

        store.create_site(&site).await.unwrap();
        let loaded = store.get_site(site.id).await.unwrap().unwrap();
        assert_eq!(loaded.url, "https://example.com");

        assert!(store.get_site(SiteId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_scan_fails() {
        let store = MemoryStore::new();
        let run = ScanRun::new(SiteId::new(), "user-1".to_string());
        assert!(store.update_scan(&run).await.is_err());
    }

    #[tokio::test]
    async fn test_active_scan_count_tracks_status() {
        let store = MemoryStore::new();
        let site_id = SiteId::new();

        let mut first = ScanRun::new(site_id, "user-1".to_string());
        let second = ScanRun::new(site_id, "user-1".to_string());
        let other = ScanRun::new(site_id, "user-2".to_string());
        store.create_scan(&first).await.unwrap();
        store.create_scan(&second).await.unwrap();
        store.create_scan(&other).await.unwrap();

        assert_eq!(store.count_active_scans("user-1").await.unwrap(), 2);

        first.start();
        first.complete(100, Grade::A, &[]);
        store.update_scan(&first).await.unwrap();
        assert_eq!(store.count_active_scans("user-1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_scan_history_is_newest_first_and_limited() {
        let store = MemoryStore::new();
        let site_id = SiteId::new();

        let mut runs = Vec::new();
        for offset in 0..5i64 {
            let mut run = ScanRun::new(site_id, "user-1".to_string());
            run.started_at = run.started_at + Duration::seconds(offset);
            store.create_scan(&run).await.unwrap();
            runs.push(run);
        }

        let history = store.list_scans_for_user("user-1", 3).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].id, runs[4].id);
        assert_eq!(history[1].id, runs[3].id);
        assert_eq!(history[2].id, runs[2].id);
    }

    #[tokio::test]
    async fn test_findings_grouped_by_scan() {
        let store = MemoryStore::new();
        let scan_id = ScanId::new();
        let findings = vec![
            Finding::new("RGAA_1_1", Severity::Critical, "t", "d").for_scan(scan_id),
            Finding::new("RGAA_8_5", Severity::Critical, "t", "d").for_scan(scan_id),
        ];

        store.save_findings(&findings).await.unwrap();
        assert_eq!(store.findings_for_scan(scan_id).await.unwrap().len(), 2);
        assert!(store
            .findings_for_scan(ScanId::new())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_untagged_finding_rejected() {
        let store = MemoryStore::new();
        let findings = vec![Finding::new("RGAA_1_1", Severity::Critical, "t", "d")];
        assert!(store.save_findings(&findings).await.is_err());
    }

    #[tokio::test]
    async fn test_sites_listed_per_user() {
        let store = MemoryStore::new();
        store
            .create_site(&Site::new("https://a.example", "A", "user-1"))
            .await
            .unwrap();
        store
            .create_site(&Site::new("https://b.example", "B", "user-1"))
            .await
            .unwrap();
        store
            .create_site(&Site::new("https://c.example", "C", "user-2"))
            .await
            .unwrap();

        assert_eq!(store.list_sites_for_user("user-1").await.unwrap().len(), 2);
        assert_eq!(store.list_sites_for_user("user-2").await.unwrap().len(), 1);
        assert!(store.list_sites_for_user("user-3").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_and_health_check() {
        let store = MemoryStore::new();
        store.commit().await.unwrap();
        assert!(store.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_scan_status_visible_mid_run() {
        // Pollers may observe intermediate Running state with partial counts
        let store = MemoryStore::new();
        let mut run = ScanRun::new(SiteId::new(), "user-1".to_string());
        store.create_scan(&run).await.unwrap();

        run.start();
        run.pages_scanned = 5;
        store.update_scan(&run).await.unwrap();

        let seen = store.get_scan(run.id).await.unwrap().unwrap();
        assert_eq!(seen.status, ScanStatus::Running);
        assert_eq!(seen.pages_scanned, 5);
    }
}
