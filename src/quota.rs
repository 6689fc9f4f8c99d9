// SPDX-License-Identifier: PMPL-1.0-or-later
//! Subscription quota collaborator
//!
//! Billing-tier quotas live outside the core. The scanner composes this
//! check with its own per-user concurrency gate; deployments plug in their
//! subscription backend behind the trait.

use async_trait::async_trait;

use crate::error::Result;

/// External quota decisions, answered from billing-tier data
#[async_trait]
pub trait QuotaService: Send + Sync {
    /// Whether the user's plan allows starting another scan
    async fn can_user_start_scan(&self, user_id: &str) -> Result<bool>;

    /// Whether the user's plan allows registering another site
    async fn can_user_add_site(&self, user_id: &str) -> Result<bool>;
}

/// Quota backend that allows everything; used by the CLI and tests
pub struct UnlimitedQuota;

#[async_trait]
impl QuotaService for UnlimitedQuota {
    async fn can_user_start_scan(&self, _user_id: &str) -> Result<bool> {
        Ok(true)
    }

    async fn can_user_add_site(&self, _user_id: &str) -> Result<bool> {
        Ok(true)
    }
}
