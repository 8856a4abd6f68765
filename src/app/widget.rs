use std::sync::Arc;

use reqwest::Url;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::app::ports::{EnvironmentPort, HttpClientPort};
use crate::app::presenter::{self, Outcome, SelectControl};
use crate::app::prober::{self, ProbeSummary};
use crate::app::resolver::{self, Resolution};
use crate::catalog::Catalog;
use crate::constants::DEFAULT_CONTROL_NAME;

/// How a page run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    NoRedirect,
    Redirecting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Init,
    Probing,
    Resolved(Settlement),
}

/// The week dropdown for one page session.
///
/// Owns the catalog for the whole session; the prober, resolver and
/// presenter only ever borrow it.
pub struct WeekDropdown {
    catalog: Catalog,
    http: Arc<dyn HttpClientPort>,
    base_url: Url,
    control_name: String,
    control: Option<SelectControl>,
    resolution: Option<Resolution>,
    probe_summary: Option<ProbeSummary>,
    state: PageState,
}

impl WeekDropdown {
    pub fn new(catalog: Catalog, http: Arc<dyn HttpClientPort>, base_url: Url) -> Self {
        Self {
            catalog,
            http,
            base_url,
            control_name: DEFAULT_CONTROL_NAME.to_string(),
            control: None,
            resolution: None,
            probe_summary: None,
            state: PageState::Init,
        }
    }

    pub fn with_control_name(mut self, name: impl Into<String>) -> Self {
        self.control_name = name.into();
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn control(&self) -> Option<&SelectControl> {
        self.control.as_ref()
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    pub fn probe_summary(&self) -> Option<ProbeSummary> {
        self.probe_summary
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    /// Probe, render, resolve and apply. Runs once; later calls return the
    /// state reached by the first run.
    pub async fn run(&mut self, env: &dyn EnvironmentPort) -> PageState {
        if self.state != PageState::Init {
            return self.state;
        }
        if !env.has_control(&self.control_name) {
            debug!(control = %self.control_name, "No week selector on this page");
            return self.state;
        }

        self.state = PageState::Probing;
        let summary =
            prober::probe_all(&mut self.catalog, Arc::clone(&self.http), &self.base_url).await;
        self.probe_summary = Some(summary);

        let mut control = presenter::render(&self.catalog, &self.control_name);
        let location = env.current_location();
        let resolution = resolver::resolve_current(&self.catalog, &location);
        let outcome = presenter::apply_resolution(&mut control, &self.catalog, &resolution, env);
        self.control = Some(control);
        self.resolution = Some(resolution);

        self.state = match outcome {
            Outcome::Settled => PageState::Resolved(Settlement::NoRedirect),
            Outcome::Redirecting(_) => PageState::Resolved(Settlement::Redirecting),
        };
        info!(location = %location, state = ?self.state, "Week selector resolved");
        self.state
    }

    /// User picked `value` in the dropdown. Ignored unless the widget
    /// settled without redirecting.
    pub fn handle_change(&self, value: &str, env: &dyn EnvironmentPort) -> Option<String> {
        if self.state != PageState::Resolved(Settlement::NoRedirect) {
            debug!(value, state = ?self.state, "Ignoring selection change");
            return None;
        }
        presenter::handle_change(&self.catalog, value, env)
    }
}

/// Run the widget once the document is ready: immediately if `ready`
/// already holds `true`, otherwise after it flips. If the sender goes away
/// before that, the widget never starts.
pub async fn run_when_ready(
    mut ready: watch::Receiver<bool>,
    widget: &mut WeekDropdown,
    env: &dyn EnvironmentPort,
) -> PageState {
    while !*ready.borrow_and_update() {
        if ready.changed().await.is_err() {
            debug!("Document readiness signal dropped before ready");
            return widget.state();
        }
    }
    widget.run(env).await
}
