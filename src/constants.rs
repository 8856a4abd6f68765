//! Shared names and values used across the widget and the CLI

// Element id of the select control in the hosting page
pub const DEFAULT_CONTROL_NAME: &str = "weekSelect";

// Query parameter carrying the cache-busting token
pub const CACHE_BUST_PARAM: &str = "v";

// Label suffix and colour for weeks that are not published yet
pub const COMING_SOON_SUFFIX: &str = " (Coming Soon)";
pub const MUTED_COLOR: &str = "#999";

/// Environment variable overriding the configured site base URL
pub const BASE_URL_ENV: &str = "WEEK_PICKER_BASE_URL";

pub const DEFAULT_CONFIG_PATH: &str = "week_picker.toml";
pub const DEFAULT_LOG_DIR: &str = "logs";
