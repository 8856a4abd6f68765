use serde::Serialize;
use tracing::{info, warn};

use crate::app::ports::EnvironmentPort;
use crate::app::resolver::{most_recent_existing, Resolution};
use crate::catalog::{CandidateEntry, Catalog};
use crate::constants::{CACHE_BUST_PARAM, COMING_SOON_SUFFIX, MUTED_COLOR};

/// One item of the week dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
    pub disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Model of the page's select control
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectControl {
    pub name: String,
    pub options: Vec<SelectOption>,
    pub selected_index: Option<usize>,
}

impl SelectControl {
    pub fn selected(&self) -> Option<&SelectOption> {
        self.selected_index.and_then(|i| self.options.get(i))
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.selected().map(|o| o.value.as_str())
    }
}

/// What applying a resolution did to the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The control shows its final selection and stays interactive
    Settled,
    /// Navigation was issued to the contained URL
    Redirecting(String),
}

/// Build one option per catalog entry; missing weeks are disabled and muted.
pub fn render(catalog: &Catalog, name: &str) -> SelectControl {
    let options = catalog
        .iter()
        .map(|entry| {
            if entry.exists {
                SelectOption {
                    value: entry.identifier.clone(),
                    text: entry.label.clone(),
                    disabled: false,
                    color: None,
                }
            } else {
                SelectOption {
                    value: entry.identifier.clone(),
                    text: format!("{}{}", entry.label, COMING_SOON_SUFFIX),
                    disabled: true,
                    color: Some(MUTED_COLOR.to_string()),
                }
            }
        })
        .collect();

    SelectControl {
        name: name.to_string(),
        options,
        selected_index: None,
    }
}

/// `identifier` plus a cache-busting parameter, keeping any existing query.
pub fn navigation_target(identifier: &str, token: &str) -> String {
    let separator = if identifier.contains('?') { '&' } else { '?' };
    format!("{}{}{}={}", identifier, separator, CACHE_BUST_PARAM, token)
}

fn navigate_to(entry: &CandidateEntry, env: &dyn EnvironmentPort) -> String {
    let url = navigation_target(&entry.identifier, &env.cache_token());
    if !entry.exists {
        // Nothing confirmed to exist; the head of the list may 404 as well
        warn!(target_page = %entry.identifier, "Navigating to a week that is not confirmed to exist");
    }
    info!(url = %url, "Navigating");
    env.navigate(&url);
    url
}

/// Redirect if the resolution asks for it, otherwise mark the selection.
///
/// A redirect leaves the control untouched since the page is going away.
pub fn apply_resolution(
    control: &mut SelectControl,
    catalog: &Catalog,
    resolution: &Resolution,
    env: &dyn EnvironmentPort,
) -> Outcome {
    if let Some(entry) = resolution.redirect_entry(catalog) {
        return Outcome::Redirecting(navigate_to(entry, env));
    }

    if let Some(index) = resolution.selected {
        if index < control.options.len() {
            control.selected_index = Some(index);
        }
    }
    Outcome::Settled
}

/// React to the user picking `value` in the dropdown.
///
/// `value` must match an identifier exactly, as rendered option values do.
/// Entries that are unknown or not confirmed to exist send the visitor to
/// the most recent existing week instead. Returns the URL navigated to, or
/// `None` when the catalog is empty.
pub fn handle_change(catalog: &Catalog, value: &str, env: &dyn EnvironmentPort) -> Option<String> {
    match catalog.find_exact(value) {
        Some(entry) if entry.exists => Some(navigate_to(entry, env)),
        _ => {
            info!(value, "Selected week is unavailable, falling back to most recent");
            most_recent_existing(catalog).map(|entry| navigate_to(entry, env))
        }
    }
}
