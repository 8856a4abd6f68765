use async_trait::async_trait;

/// Network boundary used by the existence prober
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    /// Issue a body-less request and report the response status
    async fn head(&self, url: &str) -> Result<u16, String>;
}

/// What the widget needs from the hosting page
pub trait EnvironmentPort: Send + Sync {
    /// Path (possibly with query string) of the page being viewed
    fn current_location(&self) -> String;

    /// Leave the current page for `url`
    fn navigate(&self, url: &str);

    /// Whether the page carries a select control under `name`
    fn has_control(&self, name: &str) -> bool;

    /// Fresh value for the cache-busting query parameter
    fn cache_token(&self) -> String {
        chrono::Utc::now().timestamp_millis().to_string()
    }
}
