//! Select-or-create resource selector.
//!
//! Generic over any named external resource (audience list, ad account,
//! campaign). A selection is either an existing platform resource or a named
//! draft; the platform-side creation call is deferred to submission time so
//! cancelling the wizard never leaves an orphaned resource behind.

use log::debug;
use thiserror::Error;

/// Reserved wire id meaning "not yet created; the name is a creation request".
pub const SENTINEL_NEW: &str = "-1";

/// Reference to an external resource.
///
/// `Existing` is already addressable on the platform; `Draft` carries the
/// desired name and must be created before use. The legacy `"-1"` sentinel id
/// exists only at the wire boundary, via [`wire_id`](Self::wire_id) and
/// [`from_wire`](Self::from_wire).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalResourceRef {
    Existing { id: String, name: String },
    Draft { name: String },
}

impl ExternalResourceRef {
    pub fn existing(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Existing { id: id.into(), name: name.into() }
    }

    pub fn draft(name: impl Into<String>) -> Self {
        Self::Draft { name: name.into() }
    }

    pub fn from_wire(id: &str, name: &str) -> Self {
        if id == SENTINEL_NEW {
            Self::Draft { name: name.to_string() }
        } else {
            Self::Existing { id: id.to_string(), name: name.to_string() }
        }
    }

    pub fn wire_id(&self) -> &str {
        match self {
            Self::Existing { id, .. } => id,
            Self::Draft { .. } => SENTINEL_NEW,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Existing { name, .. } | Self::Draft { name } => name,
        }
    }

    pub fn is_draft(&self) -> bool {
        matches!(self, Self::Draft { .. })
    }
}

/// One fetched option the user may pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceOption {
    pub id: String,
    pub name: String,
}

/// Errors from confirming a creation draft. Local and blocking; never sent
/// over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("name is required")]
    EmptyName,
    #[error("name must be unique")]
    NameTaken,
}

/// Owns the per-field selection state for one resource kind.
#[derive(Debug, Default)]
pub struct ResourceSelector {
    options: Vec<ResourceOption>,
    selection: Option<ExternalResourceRef>,
    draft_name: Option<String>,
    /// Name pre-seeded from edit mode, resolved against fetched options.
    pending_name: Option<String>,
    is_open: bool,
    allow_create: bool,
}

impl ResourceSelector {
    pub fn new(allow_create: bool) -> Self {
        Self { allow_create, ..Self::default() }
    }

    pub fn options(&self) -> &[ResourceOption] {
        &self.options
    }

    /// Replace the fetched options. Resolves any pending edit-mode seed whose
    /// name matches an option, and refreshes the display name of an existing
    /// selection that was seeded by id alone.
    pub fn set_options(&mut self, options: Vec<ResourceOption>) {
        self.options = options;

        if let Some(pending) = self.pending_name.take() {
            if let Some(opt) = self.options.iter().find(|o| o.name == pending) {
                debug!("selector: resolved seeded name {:?} to id {}", pending, opt.id);
                self.selection = Some(ExternalResourceRef::existing(&opt.id, &opt.name));
            } else {
                // Keep waiting: a later fetch (other account page) may match.
                self.pending_name = Some(pending);
            }
        }

        if let Some(ExternalResourceRef::Existing { id, name }) = &mut self.selection {
            if let Some(opt) = self.options.iter().find(|o| &o.id == id) {
                *name = opt.name.clone();
            }
        }
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Record a chosen resource, clearing any create-mode draft.
    pub fn select(&mut self, resource: ExternalResourceRef) {
        self.draft_name = None;
        self.pending_name = None;
        self.selection = Some(resource);
        self.is_open = false;
    }

    /// Enter create mode with the given draft name. No external call yet.
    pub fn begin_create(&mut self, draft_name: &str) {
        if !self.allow_create {
            return;
        }
        self.draft_name = Some(draft_name.to_string());
    }

    pub fn draft_name(&self) -> Option<&str> {
        self.draft_name.as_deref()
    }

    /// Validate the draft name and, on success, select a draft reference.
    /// Collisions are checked case-sensitively against fetched options only;
    /// a name merely drafted before does not collide with itself.
    pub fn confirm_create(&mut self) -> Result<ExternalResourceRef, SelectorError> {
        let name = self.draft_name.clone().ok_or(SelectorError::EmptyName)?;
        if name.is_empty() {
            return Err(SelectorError::EmptyName);
        }
        if self.options.iter().any(|o| o.name == name) {
            return Err(SelectorError::NameTaken);
        }
        let resource = ExternalResourceRef::draft(name);
        self.select(resource.clone());
        Ok(resource)
    }

    /// Seed the selection from a persisted sync (edit mode). A draft seed is
    /// held as a pending name so a fetched option with the same name
    /// auto-resolves instead of leaving the field blank.
    pub fn seed(&mut self, resource: ExternalResourceRef) {
        match resource {
            ExternalResourceRef::Draft { name } => {
                self.pending_name = Some(name);
            }
            existing => {
                self.selection = Some(existing);
            }
        }
    }

    pub fn selection(&self) -> Option<&ExternalResourceRef> {
        self.selection.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.selection.is_some()
    }

    pub fn clear(&mut self) {
        self.options.clear();
        self.selection = None;
        self.draft_name = None;
        self.pending_name = None;
        self.is_open = false;
    }

    /// Drop options and selection but keep the selector usable; used when the
    /// scoping account changes and previously fetched lists become stale.
    pub fn reset_options(&mut self) {
        self.options.clear();
        self.selection = None;
        self.draft_name = None;
    }
}
