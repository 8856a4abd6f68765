use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use crate::app::ports::EnvironmentPort;

/// Environment for running the widget outside a browser.
///
/// Navigations are recorded instead of performed, and cache tokens are
/// epoch milliseconds forced strictly increasing so two navigations in the
/// same millisecond still differ.
pub struct HeadlessEnvironment {
    location: String,
    control_name: String,
    navigations: Mutex<Vec<String>>,
    last_token: AtomicI64,
}

impl HeadlessEnvironment {
    pub fn new(location: impl Into<String>, control_name: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            control_name: control_name.into(),
            navigations: Mutex::new(Vec::new()),
            last_token: AtomicI64::new(0),
        }
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn last_navigation(&self) -> Option<String> {
        self.navigations().pop()
    }
}

impl EnvironmentPort for HeadlessEnvironment {
    fn current_location(&self) -> String {
        self.location.clone()
    }

    fn navigate(&self, url: &str) {
        if let Ok(mut navigations) = self.navigations.lock() {
            navigations.push(url.to_string());
        }
    }

    fn has_control(&self, name: &str) -> bool {
        self.control_name == name
    }

    fn cache_token(&self) -> String {
        let now = chrono::Utc::now().timestamp_millis();
        let previous = self
            .last_token
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now.max(last + 1)))
            .unwrap_or(now);
        now.max(previous + 1).to_string()
    }
}
