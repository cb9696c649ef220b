//! Sync submission coordinator.
//!
//! Two-phase commit: create the platform-side list when the selection is
//! still a draft, then persist the sync job spec. Side effects are strictly
//! ordered; no sync request is issued before resource creation resolves to a
//! real id, and the wizard only reaches its submitted state after the backend
//! acknowledges.

use log::{info, warn};
use thiserror::Error;

use crate::api::{CreateResourceRequest, IntegrationApi, STATUS_SUCCESS, SyncJobSpec};
use crate::mapping::Violation;
use crate::platform::{Platform, StepKind};
use crate::selector::ExternalResourceRef;
use crate::session::SyncSession;
use crate::wizard::Mode;

/// A platform resource that was created but whose sync submission failed.
/// Returned for manual follow-up; no automatic compensating delete is
/// attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanedResource {
    pub platform: Platform,
    pub list_id: String,
    pub list_name: String,
}

/// Submission failure taxonomy. Resource-creation failures leave the wizard
/// untouched so the user can retry; submission failures after a successful
/// creation carry the orphaned resource.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("mapping has unresolved validation errors")]
    MappingInvalid(Vec<Violation>),
    #[error("missing required selection: {0}")]
    MissingSelection(&'static str),
    #[error("list creation failed: {0}")]
    CreateList(String),
    #[error("sync submission failed: {message}")]
    SubmitSync {
        message: String,
        orphaned: Option<OrphanedResource>,
    },
}

/// Drives one submission attempt against the backend collaborators.
pub struct SubmissionCoordinator<'a> {
    api: &'a dyn IntegrationApi,
}

impl<'a> SubmissionCoordinator<'a> {
    pub fn new(api: &'a dyn IntegrationApi) -> Self {
        Self { api }
    }

    /// Validate, resolve a draft list to a real resource, and persist the
    /// sync job. On success returns the spec that was sent and marks the
    /// wizard submitted. All gating happens before the first network call.
    pub async fn submit(&self, session: &mut SyncSession) -> Result<SyncJobSpec, SubmitError> {
        let wizard = session.wizard();
        let violations = wizard.mapping.validate();
        if !violations.is_empty() {
            return Err(SubmitError::MappingInvalid(violations));
        }
        let profile = wizard.profile();
        if profile.requires_account && wizard.account.selection().is_none() {
            return Err(SubmitError::MissingSelection("account"));
        }
        if wizard.list.selection().is_none() {
            return Err(SubmitError::MissingSelection("list"));
        }
        if profile.has_step(StepKind::SelectFilter) && wizard.filter().is_none() {
            return Err(SubmitError::MissingSelection("contact filter"));
        }

        session.set_submit_loading(true);
        let result = self.run(session).await;
        session.set_submit_loading(false);
        result
    }

    async fn run(&self, session: &mut SyncSession) -> Result<SyncJobSpec, SubmitError> {
        let platform = session.platform();
        let account_id = session
            .wizard()
            .account
            .selection()
            .map(|r| r.wire_id().to_string());

        // Phase 1: resolve a draft list to a real platform resource. On
        // failure the selection stays a draft and the attempt can be retried
        // without re-entering prior steps.
        let mut created: Option<OrphanedResource> = None;
        if let Some(ExternalResourceRef::Draft { name }) =
            session.wizard().list.selection().cloned()
        {
            let request = CreateResourceRequest {
                name: name.clone(),
                customer_id: account_id.clone(),
            };
            let response = self
                .api
                .create_resource(platform, &request)
                .await
                .map_err(|e| SubmitError::CreateList(e.to_string()))?;
            if response.status() != STATUS_SUCCESS {
                return Err(SubmitError::CreateList(response.status().to_string()));
            }
            let resource = response.into_option();
            info!(
                "created list {:?} on {} with id {}",
                resource.name,
                platform.service_name(),
                resource.id
            );
            created = Some(OrphanedResource {
                platform,
                list_id: resource.id.clone(),
                list_name: resource.name.clone(),
            });
            session
                .wizard_mut()
                .list
                .select(ExternalResourceRef::existing(resource.id, resource.name));
        }

        // Phase 2: build the spec from the now fully resolved state.
        let Some(ExternalResourceRef::Existing { id, name }) =
            session.wizard().list.selection().cloned()
        else {
            return Err(SubmitError::MissingSelection("list"));
        };
        let spec = SyncJobSpec {
            service_name: platform.service_name().to_string(),
            ad_account_id: account_id,
            list_id: id,
            list_name: name,
            contact_filter: session.wizard().filter(),
            field_mappings: session.wizard().mapping.rows().to_vec(),
            premium_source_id: session.source().premium_source_id.clone(),
            integration_id: session.source().integration_id,
        };

        // Phase 3: persist. Edit mode replaces the existing sync (PUT).
        let result = match session.wizard().mode().clone() {
            Mode::Create => self.api.create_sync(&spec).await,
            Mode::Edit { sync_id } => self.api.update_sync(&sync_id, &spec).await,
        };
        if let Err(e) = result {
            if let Some(orphan) = &created {
                warn!(
                    "sync submission failed after creating list {} ({}); manual cleanup required",
                    orphan.list_id, orphan.list_name
                );
            }
            return Err(SubmitError::SubmitSync {
                message: e.to_string(),
                orphaned: created,
            });
        }

        session.wizard_mut().mark_submitted();
        info!("sync submitted for {}", platform.service_name());
        Ok(spec)
    }
}
