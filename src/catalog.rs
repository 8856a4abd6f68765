//! The ordered list of week pages the selector knows about.
//!
//! Order is chronological; the resolver relies on scanning it back to front.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One navigable week page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEntry {
    /// Filename-like key, unique within a catalog
    pub identifier: String,
    /// Display text, usually a human date range
    pub label: String,
    #[serde(default)]
    pub exists: bool,
}

impl CandidateEntry {
    pub fn new(identifier: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            label: label.into(),
            exists: false,
        }
    }

    pub fn with_exists(mut self, exists: bool) -> Self {
        self.exists = exists;
        self
    }

    /// Case-insensitive identifier comparison
    pub fn matches(&self, identifier: &str) -> bool {
        self.identifier.eq_ignore_ascii_case(identifier)
    }
}

const BUILTIN_WEEKS: &[(&str, &str, bool)] = &[
    ("august-11-2025.html", "Mon, 8/11/2025 — Thu, 8/14/2025", false),
    ("august-18-2025.html", "Mon, 8/18/2025 — Thu, 8/21/2025", false),
    ("august-25-2025.html", "Mon, 8/25/2025 — Thu, 8/28/2025", false),
    ("september-1-2025.html", "Mon, 9/1/2025 — Fri, 9/5/2025", false),
    ("september-8-2025.html", "Mon, 9/8/2025 — Fri, 9/12/2025", false),
    ("september-15-2025.html", "Mon, 9/15/2025 — Fri, 9/19/2025", false),
    ("september-22-2025.html", "Mon, 9/22/2025 — Fri, 9/26/2025", false),
    ("september-29-2025.html", "Mon, 9/29/2025 — Fri, 10/3/2025", false),
    ("october-6-2025.html", "Mon, 10/6/2025 — Fri, 10/10/2025", false),
    ("october-13-2025.html", "Mon, 10/13/2025 — Fri, 10/17/2025", true),
    ("october-20-2025.html", "Mon, 10/20/2025 — Fri, 10/24/2025", false),
    ("october-27-2025.html", "Mon, 10/27/2025 — Fri, 10/31/2025", false),
    ("november-3-2025.html", "Mon, 11/3/2025 — Fri, 11/7/2025", false),
    ("november-10-2025.html", "Mon, 11/10/2025 — Fri, 11/14/2025", false),
    ("november-17-2025.html", "Mon, 11/17/2025 — Fri, 11/21/2025", false),
    ("november-24-2025.html", "Mon, 11/24/2025 — Fri, 11/28/2025", false),
    ("december-1-2025.html", "Mon, 12/1/2025 — Fri, 12/5/2025", false),
    ("december-8-2025.html", "Mon, 12/8/2025 — Fri, 12/12/2025", false),
    ("december-15-2025.html", "Mon, 12/15/2025 — Fri, 12/19/2025", false),
    ("december-22-2025.html", "Mon, 12/22/2025 — Fri, 12/26/2025", false),
    ("december-29-2025.html", "Mon, 12/29/2025 — Fri, 1/2/2026", false),
];

/// Ordered, session-lifetime collection of candidate entries.
///
/// Entries are never added or removed after construction; only the
/// `exists` flag changes, through [`Catalog::mark_exists`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CandidateEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CandidateEntry>) -> Self {
        Self { entries }
    }

    /// The fall 2025 week list shipped with the site
    pub fn builtin() -> Self {
        let entries = BUILTIN_WEEKS
            .iter()
            .map(|(identifier, label, exists)| {
                CandidateEntry::new(*identifier, *label).with_exists(*exists)
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[CandidateEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<&CandidateEntry> {
        self.entries.first()
    }

    pub fn get(&self, index: usize) -> Option<&CandidateEntry> {
        self.entries.get(index)
    }

    /// Index of the entry whose identifier matches, ignoring case
    pub fn position(&self, identifier: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.matches(identifier))
    }

    pub fn find(&self, identifier: &str) -> Option<&CandidateEntry> {
        self.position(identifier).map(|i| &self.entries[i])
    }

    /// Entry whose identifier is exactly `identifier`
    pub fn find_exact(&self, identifier: &str) -> Option<&CandidateEntry> {
        self.entries.iter().find(|e| e.identifier == identifier)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CandidateEntry> {
        self.entries.iter()
    }

    /// Overwrite the existence flag of the entry at `index`.
    /// Out-of-range indices are ignored.
    pub(crate) fn mark_exists(&mut self, index: usize, exists: bool) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.exists = exists;
        }
    }

    /// Identifiers that appear more than once, compared case-insensitively
    pub fn duplicate_identifiers(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for entry in &self.entries {
            let key = entry.identifier.to_lowercase();
            if !seen.insert(key.clone()) && !duplicates.contains(&key) {
                duplicates.push(key);
            }
        }
        duplicates
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CandidateEntry;
    type IntoIter = std::slice::Iter<'a, CandidateEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
