use std::sync::Arc;

use reqwest::Url;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::app::ports::HttpClientPort;
use crate::catalog::Catalog;
use crate::error::{Result, WeekPickerError};

/// Counts from one probing pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeSummary {
    pub checked: usize,
    pub existing: usize,
}

/// Parse the directory URL week identifiers are resolved against.
///
/// A missing trailing slash is added so `base.join("week.html")` stays
/// inside the directory instead of replacing its last segment.
pub fn site_root(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    Url::parse(&with_slash).map_err(|e| WeekPickerError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Single existence check: any 2xx status means the page exists.
/// Transport errors and every other status count as missing.
pub async fn check_exists(http: &dyn HttpClientPort, url: &str) -> bool {
    match http.head(url).await {
        Ok(status) => {
            debug!(url, status, "Existence check completed");
            (200..=299).contains(&status)
        }
        Err(e) => {
            debug!(url, error = %e, "Existence check failed");
            false
        }
    }
}

/// Probe every catalog entry concurrently and record the outcome on it.
///
/// Returns once every check has settled. Flags are cleared before the
/// batch starts, so an entry whose task never reports back stays missing.
pub async fn probe_all(
    catalog: &mut Catalog,
    http: Arc<dyn HttpClientPort>,
    base_url: &Url,
) -> ProbeSummary {
    let mut tasks = JoinSet::new();

    for index in 0..catalog.len() {
        catalog.mark_exists(index, false);
        let Some(entry) = catalog.get(index) else {
            continue;
        };
        let identifier = entry.identifier.clone();
        let target = base_url.join(&identifier);
        let http = Arc::clone(&http);

        tasks.spawn(async move {
            let exists = match target {
                Ok(url) => check_exists(http.as_ref(), url.as_str()).await,
                Err(e) => {
                    debug!(identifier = %identifier, error = %e, "Could not build probe URL");
                    false
                }
            };
            (index, exists)
        });
    }

    let mut summary = ProbeSummary::default();
    while let Some(joined) = tasks.join_next().await {
        summary.checked += 1;
        match joined {
            Ok((index, exists)) => {
                if exists {
                    summary.existing += 1;
                }
                catalog.mark_exists(index, exists);
            }
            Err(e) => warn!(error = %e, "Existence probe task did not complete"),
        }
    }

    info!(
        checked = summary.checked,
        existing = summary.existing,
        "Probed week pages"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CandidateEntry;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Answers from a fixed status table; unknown URLs fail at the transport
    struct MockHttp {
        statuses: HashMap<String, u16>,
        requested: Mutex<Vec<String>>,
        delay: Option<Duration>,
    }

    impl MockHttp {
        fn new(statuses: &[(&str, u16)]) -> Self {
            Self {
                statuses: statuses
                    .iter()
                    .map(|(url, status)| (url.to_string(), *status))
                    .collect(),
                requested: Mutex::new(Vec::new()),
                delay: None,
            }
        }
    }

    #[async_trait]
    impl HttpClientPort for MockHttp {
        async fn head(&self, url: &str) -> std::result::Result<u16, String> {
            self.requested.lock().unwrap().push(url.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.statuses
                .get(url)
                .copied()
                .ok_or_else(|| "connection refused".to_string())
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            CandidateEntry::new("a.html", "A").with_exists(true),
            CandidateEntry::new("b.html", "B"),
            CandidateEntry::new("c.html", "C"),
            CandidateEntry::new("d.html", "D"),
        ])
    }

    #[test]
    fn test_site_root_appends_trailing_slash() {
        let root = site_root("https://example.org/weeks").unwrap();
        assert_eq!(root.as_str(), "https://example.org/weeks/");
        assert_eq!(
            root.join("a.html").unwrap().as_str(),
            "https://example.org/weeks/a.html"
        );
        assert!(matches!(
            site_root("not a url"),
            Err(WeekPickerError::InvalidBaseUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_only_success_statuses_count_as_existing() {
        let http = MockHttp::new(&[
            ("http://x/ok", 200),
            ("http://x/nc", 204),
            ("http://x/gone", 404),
            ("http://x/moved", 301),
            ("http://x/err", 500),
        ]);
        assert!(check_exists(&http, "http://x/ok").await);
        assert!(check_exists(&http, "http://x/nc").await);
        assert!(!check_exists(&http, "http://x/gone").await);
        assert!(!check_exists(&http, "http://x/moved").await);
        assert!(!check_exists(&http, "http://x/err").await);
        assert!(!check_exists(&http, "http://x/unreachable").await);
    }

    #[tokio::test]
    async fn test_probe_all_annotates_every_entry() {
        let http = Arc::new(MockHttp::new(&[
            ("https://site.test/w/a.html", 404),
            ("https://site.test/w/b.html", 200),
            ("https://site.test/w/c.html", 503),
        ]));
        let mut catalog = catalog();
        let base = site_root("https://site.test/w").unwrap();

        let summary = probe_all(&mut catalog, http.clone(), &base).await;

        assert_eq!(summary, ProbeSummary { checked: 4, existing: 1 });
        let flags: Vec<bool> = catalog.iter().map(|e| e.exists).collect();
        // The seeded flag on a.html is overwritten by the probe result
        assert_eq!(flags, vec![false, true, false, false]);
        assert_eq!(http.requested.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_probe_all_is_idempotent() {
        let http: Arc<dyn HttpClientPort> =
            Arc::new(MockHttp::new(&[("https://site.test/c.html", 200)]));
        let base = site_root("https://site.test/").unwrap();
        let mut catalog = catalog();

        probe_all(&mut catalog, http.clone(), &base).await;
        let first = catalog.clone();
        probe_all(&mut catalog, http, &base).await;

        assert_eq!(catalog, first);
        assert!(catalog.find("c.html").unwrap().exists);
    }

    #[tokio::test(start_paused = true)]
    async fn test_probes_run_concurrently() {
        let mut http = MockHttp::new(&[
            ("https://site.test/a.html", 200),
            ("https://site.test/b.html", 200),
            ("https://site.test/c.html", 200),
            ("https://site.test/d.html", 200),
        ]);
        http.delay = Some(Duration::from_secs(10));
        let base = site_root("https://site.test").unwrap();
        let mut catalog = catalog();

        let started = tokio::time::Instant::now();
        let summary = probe_all(&mut catalog, Arc::new(http), &base).await;

        assert_eq!(summary.existing, 4);
        // Sequential checks would need 40s of virtual time
        assert!(started.elapsed() < Duration::from_secs(20));
    }

    #[tokio::test]
    async fn test_empty_catalog_probes_nothing() {
        let http = Arc::new(MockHttp::new(&[]));
        let mut catalog = Catalog::default();
        let base = site_root("https://site.test").unwrap();
        let summary = probe_all(&mut catalog, http.clone(), &base).await;
        assert_eq!(summary, ProbeSummary::default());
        assert!(http.requested.lock().unwrap().is_empty());
    }
}
