//! Backend integration API collaborators.
//!
//! The engine consumes these contracts as opaque request/response shapes; the
//! actual list/account CRUD and sync persistence live behind the backend. The
//! trait exists so the wizard and coordinator can be exercised against
//! in-process fakes.

mod client;
mod models;

use anyhow::Result;
use async_trait::async_trait;

use crate::platform::Platform;

pub use client::{ApiConfig, HttpIntegrationApi};
pub use models::{
    AccountsResponse, CreateResourceRequest, CreateResourceResponse, CreatedChannel, Customer,
    ResourcesResponse, STATUS_NOT_ADS_USER, STATUS_SUCCESS, SyncJobSpec, UserList,
};

/// Collaborator contract for one backend integration API.
#[async_trait]
pub trait IntegrationApi: Send + Sync {
    /// List the ad accounts available for an account-scoped platform.
    async fn list_accounts(&self, platform: Platform) -> Result<AccountsResponse>;

    /// List the audience resources, optionally scoped to an ad account.
    async fn list_resources(
        &self,
        platform: Platform,
        ad_account_id: Option<&str>,
    ) -> Result<ResourcesResponse>;

    /// Create a platform-side resource (list). Called only at submission
    /// time, never while the user is still drafting.
    async fn create_resource(
        &self,
        platform: Platform,
        request: &CreateResourceRequest,
    ) -> Result<CreateResourceResponse>;

    /// Persist a new sync job.
    async fn create_sync(&self, spec: &SyncJobSpec) -> Result<()>;

    /// Replace a previously persisted sync job.
    async fn update_sync(&self, sync_id: &str, spec: &SyncJobSpec) -> Result<()>;
}
