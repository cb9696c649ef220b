//! Field mapping catalogs.
//!
//! Each platform exposes a fixed set of target fields a mapping row may
//! populate. Entries pair the internal contact attribute (the default source
//! projection) with the platform-side field name. Catalogs are read-only for
//! the lifetime of a wizard session.

/// Synthetic target used to switch a mapping row into constant mode.
///
/// Never a real platform field; only offered on platforms whose profile
/// allows constant fields.
pub const CONSTANT_TARGET: &str = "__constant__";

/// One allowed target field on the platform side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldCatalogEntry {
    /// Internal contact attribute this entry projects by default.
    pub source: &'static str,
    /// Platform-side field name.
    pub target_field: &'static str,
    /// Human-readable label.
    pub label: &'static str,
}

/// The allowed target fields for one platform.
#[derive(Debug)]
pub struct FieldCatalog {
    pub entries: &'static [FieldCatalogEntry],
}

impl FieldCatalog {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_target(&self, target_field: &str) -> bool {
        self.entries.iter().any(|e| e.target_field == target_field)
    }

    pub fn entry_for_source(&self, source: &str) -> Option<&'static FieldCatalogEntry> {
        self.entries.iter().find(|e| e.source == source)
    }
}

/// A catalog entry projected for one mapping row: entries claimed by other
/// rows are reported disabled rather than removed.
#[derive(Debug, Clone, Copy)]
pub struct AvailableEntry {
    pub entry: &'static FieldCatalogEntry,
    pub disabled: bool,
}

pub(crate) static HUBSPOT_CATALOG: FieldCatalog = FieldCatalog {
    entries: &[
        FieldCatalogEntry { source: "email", target_field: "email", label: "Email" },
        FieldCatalogEntry { source: "first_name", target_field: "firstname", label: "First Name" },
        FieldCatalogEntry { source: "last_name", target_field: "lastname", label: "Last Name" },
        FieldCatalogEntry { source: "phone", target_field: "phone", label: "Phone Number" },
        FieldCatalogEntry { source: "company", target_field: "company", label: "Company" },
        FieldCatalogEntry { source: "city", target_field: "city", label: "City" },
    ],
};

pub(crate) static GREENARROW_CATALOG: FieldCatalog = FieldCatalog {
    entries: &[
        FieldCatalogEntry { source: "email", target_field: "email", label: "Email" },
        FieldCatalogEntry { source: "first_name", target_field: "first_name", label: "First Name" },
        FieldCatalogEntry { source: "last_name", target_field: "last_name", label: "Last Name" },
        FieldCatalogEntry { source: "company", target_field: "organization", label: "Organization" },
    ],
};

pub(crate) static GOOGLE_ADS_CATALOG: FieldCatalog = FieldCatalog {
    entries: &[
        FieldCatalogEntry { source: "email", target_field: "hashed_email", label: "Email" },
        FieldCatalogEntry { source: "phone", target_field: "hashed_phone_number", label: "Phone Number" },
        FieldCatalogEntry { source: "first_name", target_field: "hashed_first_name", label: "First Name" },
        FieldCatalogEntry { source: "last_name", target_field: "hashed_last_name", label: "Last Name" },
        FieldCatalogEntry { source: "country", target_field: "country_code", label: "Country" },
        FieldCatalogEntry { source: "zip", target_field: "postal_code", label: "Postal Code" },
    ],
};

pub(crate) static META_CATALOG: FieldCatalog = FieldCatalog {
    entries: &[
        FieldCatalogEntry { source: "email", target_field: "EMAIL", label: "Email" },
        FieldCatalogEntry { source: "phone", target_field: "PHONE", label: "Phone Number" },
        FieldCatalogEntry { source: "first_name", target_field: "FN", label: "First Name" },
        FieldCatalogEntry { source: "last_name", target_field: "LN", label: "Last Name" },
        FieldCatalogEntry { source: "city", target_field: "CT", label: "City" },
        FieldCatalogEntry { source: "zip", target_field: "ZIP", label: "Postal Code" },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hubspot_catalog_has_six_entries() {
        assert_eq!(HUBSPOT_CATALOG.len(), 6);
    }

    #[test]
    fn catalog_lookup_by_source_and_target() {
        assert!(HUBSPOT_CATALOG.contains_target("firstname"));
        assert!(!HUBSPOT_CATALOG.contains_target("nonexistent"));
        let entry = HUBSPOT_CATALOG.entry_for_source("email").unwrap();
        assert_eq!(entry.target_field, "email");
    }

    #[test]
    fn constant_target_is_not_a_real_catalog_entry() {
        for catalog in [
            &HUBSPOT_CATALOG,
            &GREENARROW_CATALOG,
            &GOOGLE_ADS_CATALOG,
            &META_CATALOG,
        ] {
            assert!(!catalog.contains_target(CONSTANT_TARGET));
        }
    }
}
