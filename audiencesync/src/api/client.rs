//! HTTP implementation of the integration API.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::debug;

use super::models::{
    AccountsResponse, CreateResourceRequest, CreateResourceResponse, ResourcesResponse,
    SyncJobSpec,
};
use super::IntegrationApi;
use crate::platform::Platform;

/// Connection settings for the backend API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Reqwest-backed [`IntegrationApi`].
pub struct HttpIntegrationApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpIntegrationApi {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn check_status(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("{what} failed with {status}: {body}");
    }
    Ok(response)
}

#[async_trait]
impl IntegrationApi for HttpIntegrationApi {
    async fn list_accounts(&self, platform: Platform) -> Result<AccountsResponse> {
        debug!("listing accounts for {}", platform.service_name());
        let response = self
            .http
            .get(self.url("/integrations/accounts"))
            .query(&[("service_name", platform.service_name())])
            .send()
            .await?;
        let response = check_status(response, "list accounts").await?;
        Ok(response.json().await?)
    }

    async fn list_resources(
        &self,
        platform: Platform,
        ad_account_id: Option<&str>,
    ) -> Result<ResourcesResponse> {
        debug!(
            "listing resources for {} (account: {:?})",
            platform.service_name(),
            ad_account_id
        );
        let mut query = vec![("service_name", platform.service_name())];
        if let Some(account_id) = ad_account_id {
            query.push(("ad_account_id", account_id));
        }
        let response = self
            .http
            .get(self.url("/integrations/lists"))
            .query(&query)
            .send()
            .await?;
        let response = check_status(response, "list resources").await?;
        Ok(response.json().await?)
    }

    async fn create_resource(
        &self,
        platform: Platform,
        request: &CreateResourceRequest,
    ) -> Result<CreateResourceResponse> {
        debug!(
            "creating resource {:?} on {}",
            request.name,
            platform.service_name()
        );
        let response = self
            .http
            .post(self.url("/integrations/lists"))
            .query(&[("service_name", platform.service_name())])
            .json(request)
            .send()
            .await?;
        let response = check_status(response, "create resource").await?;
        Ok(response.json().await?)
    }

    async fn create_sync(&self, spec: &SyncJobSpec) -> Result<()> {
        debug!("creating sync for {}", spec.service_name);
        let response = self
            .http
            .post(self.url("/integrations/syncs"))
            .query(&[("service_name", spec.service_name.as_str())])
            .json(spec)
            .send()
            .await?;
        check_status(response, "create sync").await?;
        Ok(())
    }

    async fn update_sync(&self, sync_id: &str, spec: &SyncJobSpec) -> Result<()> {
        debug!("updating sync {} for {}", sync_id, spec.service_name);
        let response = self
            .http
            .put(self.url("/integrations/syncs"))
            .query(&[
                ("service_name", spec.service_name.as_str()),
                ("integrations_users_sync_id", sync_id),
            ])
            .json(spec)
            .send()
            .await?;
        check_status(response, "update sync").await?;
        Ok(())
    }
}
