//! Decides which week the selector shows and whether the visitor has to be
//! sent elsewhere. Pure functions of the annotated catalog and the location.

use crate::catalog::{CandidateEntry, Catalog};

/// Outcome of resolving the current page against the catalog.
///
/// Both fields hold catalog indices. At most one is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    pub selected: Option<usize>,
    pub redirect_to: Option<usize>,
}

impl Resolution {
    pub fn select(index: usize) -> Self {
        Self {
            selected: Some(index),
            redirect_to: None,
        }
    }

    pub fn redirect(index: usize) -> Self {
        Self {
            selected: None,
            redirect_to: Some(index),
        }
    }

    pub fn needs_redirect(&self) -> bool {
        self.redirect_to.is_some()
    }

    pub fn selected_entry<'a>(&self, catalog: &'a Catalog) -> Option<&'a CandidateEntry> {
        self.selected.and_then(|i| catalog.get(i))
    }

    pub fn redirect_entry<'a>(&self, catalog: &'a Catalog) -> Option<&'a CandidateEntry> {
        self.redirect_to.and_then(|i| catalog.get(i))
    }
}

/// Reduce a location path to the lowercase identifier it names.
///
/// `/site/October-13-2025.html?v=1#top` becomes `october-13-2025.html`.
pub fn normalize_identifier(location: &str) -> String {
    let path = location
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or_default();
    path.rsplit('/').next().unwrap_or_default().to_lowercase()
}

/// Index of the latest entry confirmed to exist, falling back to the head
/// of the catalog when nothing does. `None` only for an empty catalog.
pub fn most_recent_existing_index(catalog: &Catalog) -> Option<usize> {
    catalog
        .iter()
        .rposition(|entry| entry.exists)
        .or_else(|| (!catalog.is_empty()).then_some(0))
}

pub fn most_recent_existing(catalog: &Catalog) -> Option<&CandidateEntry> {
    most_recent_existing_index(catalog).and_then(|i| catalog.get(i))
}

/// Pick the entry to show for `current_location`, or the entry to redirect to.
pub fn resolve_current(catalog: &Catalog, current_location: &str) -> Resolution {
    let current = normalize_identifier(current_location);

    if let Some(index) = catalog.position(&current) {
        if catalog.get(index).is_some_and(|entry| entry.exists) {
            return Resolution::select(index);
        }
    }

    let Some(target) = most_recent_existing_index(catalog) else {
        return Resolution::default();
    };
    let Some(entry) = catalog.get(target) else {
        return Resolution::default();
    };

    // Already on the landing page: settle instead of redirecting to ourselves
    if entry.identifier.is_empty() || entry.matches(&current) {
        Resolution::select(target)
    } else {
        Resolution::redirect(target)
    }
}
