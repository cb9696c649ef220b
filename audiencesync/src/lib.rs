//! Integration sync configuration engine.
//!
//! Guides a user through mapping a pixel-collected contact dataset onto an
//! external marketing platform's audience/list concept: selecting or creating
//! platform resources, validating a field-mapping table, and submitting a
//! normalized sync job specification to the backend runner.
//!
//! Platform differences (step order, field catalog, account scoping) live in
//! static [`platform::PlatformProfile`] data; the state machine itself is
//! shared across all platforms.

pub mod api;
pub mod mapping;
pub mod platform;
pub mod selector;
pub mod session;
pub mod submit;
pub mod wizard;

pub use api::{ApiConfig, HttpIntegrationApi, IntegrationApi, SyncJobSpec};
pub use mapping::{FieldMappingRow, MappingTable, RowField, Violation, ViolationKind};
pub use platform::{
    AvailableEntry, CONSTANT_TARGET, ContactFilter, FieldCatalog, FieldCatalogEntry, Platform,
    PlatformProfile, StepKind,
};
pub use selector::{
    ExternalResourceRef, ResourceOption, ResourceSelector, SENTINEL_NEW, SelectorError,
};
pub use session::{
    Eligibility, ListFetchToken, LoadingFlags, SourceContext, SyncSession, refresh_accounts,
    refresh_lists,
};
pub use submit::{OrphanedResource, SubmissionCoordinator, SubmitError};
pub use wizard::{Mode, Wizard};
