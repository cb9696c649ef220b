//! Field mapping table model.
//!
//! An ordered collection of mapping rows with two invariants: non-constant
//! rows may not map the same internal attribute twice (case-sensitive), and
//! constant rows must use a lower-snake-case field name. Validation is pure
//! and returns violations as data; nothing here touches the network.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::platform::{AvailableEntry, CONSTANT_TARGET, FieldCatalog, PlatformProfile};

static CONSTANT_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[a-z][a-z0-9_]*$").expect("constant name pattern"));

/// One row of the mapping table.
///
/// For non-constant rows, `source_field` is the internal contact attribute
/// and `target_field` the platform-side field. For constant rows,
/// `source_field` is the user-chosen literal field name and `target_field`
/// the literal value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMappingRow {
    pub source_field: String,
    pub target_field: String,
    pub is_constant: bool,
}

impl FieldMappingRow {
    pub fn empty() -> Self {
        Self {
            source_field: String::new(),
            target_field: String::new(),
            is_constant: false,
        }
    }
}

/// Which half of a row an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowField {
    SourceField,
    TargetField,
}

/// Why a row failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Another non-constant row maps the same internal attribute.
    Duplicate,
    /// Constant field name is not lower-snake-case.
    BadConstantName,
    /// Required source side is empty.
    MissingSource,
    /// Required target side is empty.
    MissingTarget,
}

/// A single validation failure, addressed by row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    pub row: usize,
    pub kind: ViolationKind,
}

/// Ordered mapping rows plus the catalog they draw from.
#[derive(Debug)]
pub struct MappingTable {
    rows: Vec<FieldMappingRow>,
    catalog: &'static FieldCatalog,
    allow_constant: bool,
}

impl MappingTable {
    pub fn empty(profile: &'static PlatformProfile) -> Self {
        Self {
            rows: Vec::new(),
            catalog: profile.catalog,
            allow_constant: profile.allow_constant_fields,
        }
    }

    /// Table pre-populated with one row per catalog entry, mapping each
    /// entry's default source onto its target. Always validates clean.
    pub fn with_defaults(profile: &'static PlatformProfile) -> Self {
        let rows = profile
            .catalog
            .entries
            .iter()
            .map(|entry| FieldMappingRow {
                source_field: entry.source.to_string(),
                target_field: entry.target_field.to_string(),
                is_constant: false,
            })
            .collect();
        Self {
            rows,
            catalog: profile.catalog,
            allow_constant: profile.allow_constant_fields,
        }
    }

    /// Table seeded from previously persisted rows (edit mode).
    pub fn from_rows(profile: &'static PlatformProfile, rows: Vec<FieldMappingRow>) -> Self {
        Self {
            rows,
            catalog: profile.catalog,
            allow_constant: profile.allow_constant_fields,
        }
    }

    pub fn rows(&self) -> &[FieldMappingRow] {
        &self.rows
    }

    pub fn catalog(&self) -> &'static FieldCatalog {
        self.catalog
    }

    /// Whether another row may be added. Platforms without constant fields
    /// cap the table at one row per catalog entry.
    pub fn can_add_more(&self) -> bool {
        self.allow_constant || self.rows.len() < self.catalog.len()
    }

    /// Append an empty row. No-op when the table is at capacity.
    pub fn add_row(&mut self) -> bool {
        if !self.can_add_more() {
            return false;
        }
        self.rows.push(FieldMappingRow::empty());
        true
    }

    /// Update one half of a row. Setting the target to [`CONSTANT_TARGET`]
    /// switches the row into constant mode instead of recording a literal
    /// target; the source resets so the user names the constant field fresh.
    pub fn set_row_field(&mut self, index: usize, field: RowField, value: &str) {
        let Some(row) = self.rows.get_mut(index) else {
            return;
        };
        match field {
            RowField::SourceField => row.source_field = value.to_string(),
            RowField::TargetField => {
                if value == CONSTANT_TARGET {
                    if self.allow_constant {
                        row.is_constant = true;
                        row.source_field.clear();
                        row.target_field.clear();
                    }
                } else {
                    row.target_field = value.to_string();
                }
            }
        }
    }

    pub fn delete_row(&mut self, index: usize) {
        if index < self.rows.len() {
            self.rows.remove(index);
        }
    }

    /// Catalog entries assignable to `row_index`, with entries claimed by
    /// other non-constant rows marked disabled. Recomputed on every mutation;
    /// the catalog itself never changes.
    pub fn available_entries(&self, row_index: usize) -> Vec<AvailableEntry> {
        self.catalog
            .entries
            .iter()
            .map(|entry| {
                let disabled = self.rows.iter().enumerate().any(|(i, row)| {
                    i != row_index && !row.is_constant && row.source_field == entry.source
                });
                AvailableEntry { entry, disabled }
            })
            .collect()
    }

    /// Validate every row. Pure: same rows, same report, no mutation.
    ///
    /// Non-constant rows are checked for duplicate sources (case-sensitive,
    /// empty sources never count) and for empty halves. Constant rows are
    /// checked only against the lower-snake-case name pattern and for empty
    /// halves, never for uniqueness of the literal name.
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        for (i, row) in self.rows.iter().enumerate() {
            if row.is_constant {
                if row.source_field.is_empty() {
                    violations.push(Violation { row: i, kind: ViolationKind::MissingSource });
                } else if !CONSTANT_NAME_RE.is_match(&row.source_field) {
                    violations.push(Violation { row: i, kind: ViolationKind::BadConstantName });
                }
                if row.target_field.is_empty() {
                    violations.push(Violation { row: i, kind: ViolationKind::MissingTarget });
                }
                continue;
            }

            if row.source_field.is_empty() {
                violations.push(Violation { row: i, kind: ViolationKind::MissingSource });
            } else {
                let duplicated = self.rows.iter().enumerate().any(|(j, other)| {
                    j != i && !other.is_constant && other.source_field == row.source_field
                });
                if duplicated {
                    violations.push(Violation { row: i, kind: ViolationKind::Duplicate });
                }
            }
            if row.target_field.is_empty() {
                violations.push(Violation { row: i, kind: ViolationKind::MissingTarget });
            }
        }
        violations
    }

    pub fn is_clean(&self) -> bool {
        self.validate().is_empty()
    }
}
