// SPDX-License-Identifier: PMPL-1.0-or-later
//! Persistent state store
//!
//! The scanner only talks to this trait. Relational backends live outside
//! the core; [`MemoryStore`] is the in-repo reference implementation used by
//! the CLI and the tests.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Finding, ScanId, ScanRun, Site, SiteId};

/// Abstract store trait for different database backends
#[async_trait]
pub trait Store: Send + Sync {
    // Site operations
    async fn create_site(&self, site: &Site) -> Result<()>;
    async fn get_site(&self, id: SiteId) -> Result<Option<Site>>;
    async fn update_site(&self, site: &Site) -> Result<()>;
    async fn list_sites_for_user(&self, user_id: &str) -> Result<Vec<Site>>;

    // Scan operations
    async fn create_scan(&self, run: &ScanRun) -> Result<()>;
    async fn get_scan(&self, id: ScanId) -> Result<Option<ScanRun>>;
    async fn update_scan(&self, run: &ScanRun) -> Result<()>;
    /// Scans for one user, most recently started first
    async fn list_scans_for_user(&self, user_id: &str, limit: usize) -> Result<Vec<ScanRun>>;
    /// Scans for one user currently in Pending or Running state
    async fn count_active_scans(&self, user_id: &str) -> Result<usize>;

    // Finding operations
    async fn save_findings(&self, findings: &[Finding]) -> Result<()>;
    async fn findings_for_scan(&self, scan_id: ScanId) -> Result<Vec<Finding>>;

    /// Flush a batch of mutations. Backends with write buffering or
    /// transactions hook in here; the scanner calls it after each batch and
    /// never assumes automatic flushing.
    async fn commit(&self) -> Result<()>;

    // Utility
    async fn health_check(&self) -> Result<bool>;
}
