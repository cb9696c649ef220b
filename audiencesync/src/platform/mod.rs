//! Static per-platform configuration.
//!
//! Each supported platform is described by a [`PlatformProfile`]: the ordered
//! wizard steps it requires, its field catalog, and whether list resources are
//! scoped to an ad account. Profiles are immutable and shared; the engine
//! reads platform differences from this data rather than from forked code.

use serde::{Deserialize, Serialize};

mod catalog;

pub use catalog::{AvailableEntry, CONSTANT_TARGET, FieldCatalog, FieldCatalogEntry};

/// Supported external integration targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    HubSpot,
    GreenArrow,
    GoogleAds,
    Meta,
}

impl Platform {
    /// Wire identifier sent as the `service_name` query parameter.
    pub fn service_name(&self) -> &'static str {
        match self {
            Self::HubSpot => "hubspot",
            Self::GreenArrow => "greenarrow",
            Self::GoogleAds => "google_ads",
            Self::Meta => "meta",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::HubSpot => "HubSpot",
            Self::GreenArrow => "GreenArrow",
            Self::GoogleAds => "Google Ads",
            Self::Meta => "Meta",
        }
    }
}

/// A single step in the sync configuration wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// Pick the ad account that scopes list resources.
    SelectAccount,
    /// Pick an existing audience list or draft a new one.
    SelectOrCreateList,
    /// Pick which contact segment feeds the sync.
    SelectFilter,
    /// Build and validate the field-mapping table.
    MapFields,
}

impl StepKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::SelectAccount => "Select Account",
            Self::SelectOrCreateList => "Select List",
            Self::SelectFilter => "Select Contacts",
            Self::MapFields => "Map Fields",
        }
    }
}

/// Contact segment selection for platforms with a filter step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactFilter {
    AllContacts,
    Visitors,
    ViewedProduct,
    AbandonedCart,
    ConvertedSales,
}

impl ContactFilter {
    pub fn label(&self) -> &'static str {
        match self {
            Self::AllContacts => "All Contacts",
            Self::Visitors => "Visitors",
            Self::ViewedProduct => "Viewed Product",
            Self::AbandonedCart => "Abandoned Cart",
            Self::ConvertedSales => "Converted Sales",
        }
    }

    pub const ALL: &'static [ContactFilter] = &[
        Self::AllContacts,
        Self::Visitors,
        Self::ViewedProduct,
        Self::AbandonedCart,
        Self::ConvertedSales,
    ];
}

/// Static configuration for one platform.
#[derive(Debug)]
pub struct PlatformProfile {
    pub platform: Platform,
    /// Wizard steps in the order the user walks through them.
    pub steps: &'static [StepKind],
    /// Whether list resources are scoped to an ad account.
    pub requires_account: bool,
    /// Whether mapping rows may target a constant literal value.
    pub allow_constant_fields: bool,
    pub catalog: &'static FieldCatalog,
}

impl PlatformProfile {
    pub fn for_platform(platform: Platform) -> &'static PlatformProfile {
        match platform {
            Platform::HubSpot => &HUBSPOT,
            Platform::GreenArrow => &GREENARROW,
            Platform::GoogleAds => &GOOGLE_ADS,
            Platform::Meta => &META,
        }
    }

    pub fn has_step(&self, step: StepKind) -> bool {
        self.steps.contains(&step)
    }

    pub fn step_index(&self, step: StepKind) -> Option<usize> {
        self.steps.iter().position(|s| *s == step)
    }
}

static HUBSPOT: PlatformProfile = PlatformProfile {
    platform: Platform::HubSpot,
    steps: &[
        StepKind::SelectOrCreateList,
        StepKind::SelectFilter,
        StepKind::MapFields,
    ],
    requires_account: false,
    allow_constant_fields: true,
    catalog: &catalog::HUBSPOT_CATALOG,
};

static GREENARROW: PlatformProfile = PlatformProfile {
    platform: Platform::GreenArrow,
    steps: &[StepKind::SelectOrCreateList, StepKind::MapFields],
    requires_account: false,
    allow_constant_fields: true,
    catalog: &catalog::GREENARROW_CATALOG,
};

static GOOGLE_ADS: PlatformProfile = PlatformProfile {
    platform: Platform::GoogleAds,
    steps: &[
        StepKind::SelectAccount,
        StepKind::SelectOrCreateList,
        StepKind::SelectFilter,
        StepKind::MapFields,
    ],
    requires_account: true,
    allow_constant_fields: false,
    catalog: &catalog::GOOGLE_ADS_CATALOG,
};

static META: PlatformProfile = PlatformProfile {
    platform: Platform::Meta,
    steps: &[
        StepKind::SelectAccount,
        StepKind::SelectOrCreateList,
        StepKind::SelectFilter,
        StepKind::MapFields,
    ],
    requires_account: true,
    allow_constant_fields: false,
    catalog: &catalog::META_CATALOG,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_end_on_map_fields() {
        for platform in [
            Platform::HubSpot,
            Platform::GreenArrow,
            Platform::GoogleAds,
            Platform::Meta,
        ] {
            let profile = PlatformProfile::for_platform(platform);
            assert_eq!(profile.steps.last(), Some(&StepKind::MapFields));
            assert!(profile.has_step(StepKind::SelectOrCreateList));
        }
    }

    #[test]
    fn account_step_matches_scoping_flag() {
        for platform in [
            Platform::HubSpot,
            Platform::GreenArrow,
            Platform::GoogleAds,
            Platform::Meta,
        ] {
            let profile = PlatformProfile::for_platform(platform);
            assert_eq!(
                profile.requires_account,
                profile.has_step(StepKind::SelectAccount)
            );
        }
    }

    #[test]
    fn contact_filter_wire_names_are_snake_case() {
        let json = serde_json::to_string(&ContactFilter::AbandonedCart).unwrap();
        assert_eq!(json, "\"abandoned_cart\"");
    }
}
