//! Wizard state machine.
//!
//! Orders the platform-specific steps, gates forward navigation on step
//! validity, and supports edit-mode entry seeded from a persisted sync job.
//! One wizard owns one in-progress configuration; nothing is persisted until
//! the submission coordinator runs.

use log::debug;

use crate::api::SyncJobSpec;
use crate::mapping::MappingTable;
use crate::platform::{ContactFilter, Platform, PlatformProfile, StepKind};
use crate::selector::{ExternalResourceRef, ResourceSelector};

/// Whether the wizard configures a new sync or edits a persisted one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Create,
    Edit { sync_id: String },
}

/// The sync configuration wizard for one (source, platform) pair.
#[derive(Debug)]
pub struct Wizard {
    profile: &'static PlatformProfile,
    current: usize,
    /// Steps validated at least once; gates forward jumps.
    validated: Vec<bool>,
    pub account: ResourceSelector,
    pub list: ResourceSelector,
    pub mapping: MappingTable,
    filter: Option<ContactFilter>,
    /// Set when `next()` is attempted on the filter step without a choice.
    filter_error: bool,
    mode: Mode,
    submitted: bool,
}

impl Wizard {
    /// Fresh wizard in create mode, starting on the platform's first step
    /// with the default mapping pre-populated.
    pub fn new(platform: Platform) -> Self {
        let profile = PlatformProfile::for_platform(platform);
        Self {
            profile,
            current: 0,
            validated: vec![false; profile.steps.len()],
            account: ResourceSelector::new(false),
            list: ResourceSelector::new(true),
            mapping: MappingTable::with_defaults(profile),
            filter: None,
            filter_error: false,
            mode: Mode::Create,
            submitted: false,
        }
    }

    /// Wizard seeded from a persisted sync job. Steps whose data is already
    /// known are pre-validated and entry lands on the mapping step, or on the
    /// earliest step whose prerequisite is missing.
    pub fn edit(platform: Platform, sync_id: impl Into<String>, spec: &SyncJobSpec) -> Self {
        let mut wizard = Self::new(platform);
        wizard.mode = Mode::Edit { sync_id: sync_id.into() };

        if let Some(account_id) = &spec.ad_account_id {
            // Display name is recovered once the account fetch resolves.
            wizard
                .account
                .seed(ExternalResourceRef::existing(account_id, account_id));
        }
        wizard
            .list
            .seed(ExternalResourceRef::from_wire(&spec.list_id, &spec.list_name));
        wizard.filter = spec.contact_filter;
        wizard.mapping = MappingTable::from_rows(wizard.profile, spec.field_mappings.clone());

        for (i, step) in wizard.profile.steps.iter().enumerate() {
            if *step != StepKind::MapFields && wizard.is_step_valid(*step) {
                wizard.validated[i] = true;
            }
        }
        wizard.current = wizard
            .profile
            .steps
            .iter()
            .position(|s| *s != StepKind::MapFields && !wizard.is_step_valid(*s))
            .unwrap_or(wizard.profile.steps.len() - 1);

        debug!(
            "edit wizard for {} entering at {:?}",
            platform.service_name(),
            wizard.current_step()
        );
        wizard
    }

    pub fn profile(&self) -> &'static PlatformProfile {
        self.profile
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn current_step(&self) -> StepKind {
        self.profile.steps[self.current]
    }

    pub fn step_index(&self) -> usize {
        self.current
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn filter(&self) -> Option<ContactFilter> {
        self.filter
    }

    pub fn set_filter(&mut self, filter: ContactFilter) {
        self.filter = Some(filter);
        self.filter_error = false;
    }

    pub fn filter_error(&self) -> bool {
        self.filter_error
    }

    /// Step-specific validity. Pure; recomputing never touches the network.
    pub fn is_step_valid(&self, step: StepKind) -> bool {
        match step {
            StepKind::SelectAccount => self.account.is_valid(),
            StepKind::SelectOrCreateList => self.list.is_valid(),
            StepKind::SelectFilter => self.filter.is_some(),
            StepKind::MapFields => self.mapping.validate().is_empty(),
        }
    }

    /// Whether every step of the profile is currently valid; the submission
    /// gate.
    pub fn all_steps_valid(&self) -> bool {
        self.profile.steps.iter().all(|s| self.is_step_valid(*s))
    }

    /// Advance one step. Refused (and `current_step` untouched) while the
    /// current step is invalid; an invalid filter step raises its local error
    /// flag instead of erroring. Returns whether the wizard advanced.
    pub fn next(&mut self) -> bool {
        let step = self.current_step();
        if !self.is_step_valid(step) {
            if step == StepKind::SelectFilter {
                self.filter_error = true;
            }
            debug!("next() refused: {:?} invalid", step);
            return false;
        }
        self.validated[self.current] = true;
        if self.current + 1 < self.profile.steps.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Jump to a step: backward always, forward only onto steps already
    /// validated once.
    pub fn go_to(&mut self, step: StepKind) -> bool {
        let Some(index) = self.profile.step_index(step) else {
            return false;
        };
        if index <= self.current || self.validated[index] {
            self.current = index;
            true
        } else {
            false
        }
    }

    pub fn back(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Return to the first step and clear every captured selection. Invoked
    /// when the wizard is dismissed without submitting.
    pub fn reset(&mut self) {
        self.current = 0;
        self.validated = vec![false; self.profile.steps.len()];
        self.account.clear();
        self.list.clear();
        self.mapping = MappingTable::with_defaults(self.profile);
        self.filter = None;
        self.filter_error = false;
        self.submitted = false;
    }

    pub(crate) fn mark_submitted(&mut self) {
        self.submitted = true;
    }

    pub(crate) fn invalidate_step(&mut self, step: StepKind) {
        if let Some(index) = self.profile.step_index(step) {
            self.validated[index] = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{FieldMappingRow, RowField};
    use crate::platform::CONSTANT_TARGET;
    use crate::selector::ResourceOption;

    fn hubspot_spec() -> SyncJobSpec {
        SyncJobSpec {
            service_name: "hubspot".into(),
            ad_account_id: None,
            list_id: "55".into(),
            list_name: "Newsletter".into(),
            contact_filter: Some(ContactFilter::Visitors),
            field_mappings: vec![FieldMappingRow {
                source_field: "email".into(),
                target_field: "email".into(),
                is_constant: false,
            }],
            premium_source_id: Some("ps_1".into()),
            integration_id: None,
        }
    }

    #[test]
    fn starts_on_first_step_with_clean_defaults() {
        let wizard = Wizard::new(Platform::HubSpot);
        assert_eq!(wizard.current_step(), StepKind::SelectOrCreateList);
        assert_eq!(wizard.mode(), &Mode::Create);
        assert!(wizard.mapping.validate().is_empty());
        assert!(!wizard.is_submitted());
    }

    #[test]
    fn next_refused_on_invalid_step_does_not_move() {
        let mut wizard = Wizard::new(Platform::HubSpot);
        assert!(!wizard.next());
        assert_eq!(wizard.current_step(), StepKind::SelectOrCreateList);
    }

    #[test]
    fn next_advances_exactly_one_step_when_valid() {
        let mut wizard = Wizard::new(Platform::HubSpot);
        wizard.list.select(ExternalResourceRef::existing("7", "Spring"));
        assert!(wizard.next());
        assert_eq!(wizard.current_step(), StepKind::SelectFilter);
    }

    #[test]
    fn invalid_filter_step_sets_local_error_flag() {
        let mut wizard = Wizard::new(Platform::HubSpot);
        wizard.list.select(ExternalResourceRef::existing("7", "Spring"));
        wizard.next();

        assert!(!wizard.next());
        assert!(wizard.filter_error());
        assert_eq!(wizard.current_step(), StepKind::SelectFilter);

        wizard.set_filter(ContactFilter::AllContacts);
        assert!(!wizard.filter_error());
        assert!(wizard.next());
        assert_eq!(wizard.current_step(), StepKind::MapFields);
    }

    #[test]
    fn forward_jump_requires_prior_validation() {
        let mut wizard = Wizard::new(Platform::HubSpot);
        assert!(!wizard.go_to(StepKind::MapFields));

        wizard.list.select(ExternalResourceRef::existing("7", "Spring"));
        wizard.next();
        wizard.set_filter(ContactFilter::AllContacts);
        wizard.next();
        assert_eq!(wizard.current_step(), StepKind::MapFields);

        // Backward is always free, and the validated step accepts a forward
        // jump back onto it.
        assert!(wizard.go_to(StepKind::SelectOrCreateList));
        assert!(wizard.go_to(StepKind::SelectFilter));
    }

    #[test]
    fn go_to_rejects_steps_outside_the_profile() {
        let mut wizard = Wizard::new(Platform::HubSpot);
        assert!(!wizard.go_to(StepKind::SelectAccount));
    }

    #[test]
    fn map_fields_step_blocks_on_violations() {
        let mut wizard = Wizard::new(Platform::HubSpot);
        wizard.list.select(ExternalResourceRef::existing("7", "Spring"));
        wizard.next();
        wizard.set_filter(ContactFilter::AllContacts);
        wizard.next();

        wizard.mapping.add_row();
        wizard.mapping.set_row_field(6, RowField::TargetField, CONSTANT_TARGET);
        wizard.mapping.set_row_field(6, RowField::SourceField, "My Field");
        wizard.mapping.set_row_field(6, RowField::TargetField, "Acme");
        assert!(!wizard.is_step_valid(StepKind::MapFields));
        assert!(!wizard.next());

        wizard.mapping.set_row_field(6, RowField::SourceField, "my_field");
        assert!(wizard.is_step_valid(StepKind::MapFields));
    }

    #[test]
    fn reset_returns_to_first_step_and_clears_selections() {
        let mut wizard = Wizard::new(Platform::HubSpot);
        wizard.list.select(ExternalResourceRef::existing("7", "Spring"));
        wizard.next();
        wizard.set_filter(ContactFilter::Visitors);

        wizard.reset();
        assert_eq!(wizard.current_step(), StepKind::SelectOrCreateList);
        assert!(wizard.list.selection().is_none());
        assert!(wizard.filter().is_none());
        assert!(!wizard.go_to(StepKind::MapFields));
    }

    #[test]
    fn edit_mode_enters_at_map_fields_with_steps_prevalidated() {
        let wizard = Wizard::edit(Platform::HubSpot, "sync_9", &hubspot_spec());
        assert_eq!(wizard.current_step(), StepKind::MapFields);
        assert_eq!(wizard.mode(), &Mode::Edit { sync_id: "sync_9".into() });
        assert_eq!(
            wizard.list.selection(),
            Some(&ExternalResourceRef::existing("55", "Newsletter"))
        );
        assert_eq!(wizard.filter(), Some(ContactFilter::Visitors));
        assert_eq!(wizard.mapping.rows().len(), 1);
    }

    #[test]
    fn edit_mode_falls_back_to_first_missing_step() {
        let mut spec = hubspot_spec();
        spec.contact_filter = None;
        let wizard = Wizard::edit(Platform::HubSpot, "sync_9", &spec);
        assert_eq!(wizard.current_step(), StepKind::SelectFilter);
    }

    #[test]
    fn edit_mode_with_sentinel_list_id_seeds_a_pending_name() {
        let mut spec = hubspot_spec();
        spec.list_id = "-1".into();
        let mut wizard = Wizard::edit(Platform::HubSpot, "sync_9", &spec);
        // Creation never completed: the list step must be re-resolved.
        assert_eq!(wizard.current_step(), StepKind::SelectOrCreateList);

        wizard.list.set_options(vec![ResourceOption {
            id: "60".into(),
            name: "Newsletter".into(),
        }]);
        assert_eq!(
            wizard.list.selection(),
            Some(&ExternalResourceRef::existing("60", "Newsletter"))
        );
    }

    #[test]
    fn account_scoped_edit_seeds_account_by_id() {
        let spec = SyncJobSpec {
            service_name: "google_ads".into(),
            ad_account_id: Some("123".into()),
            list_id: "7".into(),
            list_name: "Spring".into(),
            contact_filter: Some(ContactFilter::AllContacts),
            field_mappings: vec![FieldMappingRow {
                source_field: "email".into(),
                target_field: "hashed_email".into(),
                is_constant: false,
            }],
            premium_source_id: None,
            integration_id: Some(4),
        };
        let wizard = Wizard::edit(Platform::GoogleAds, "sync_1", &spec);
        assert_eq!(wizard.account.selection().map(|r| r.wire_id()), Some("123"));
        assert_eq!(wizard.current_step(), StepKind::MapFields);
    }
}
