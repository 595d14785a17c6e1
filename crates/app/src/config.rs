use planboard_client::ClientConfig;
use planboard_core::project::{is_valid_display_format, DEFAULT_DISPLAY_FORMAT};

/// Client application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Remote store connection settings.
    pub client: ClientConfig,
    /// chrono strftime format for due dates in the list.
    pub date_format: String,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default                              |
    /// |-----------------------|--------------------------------------|
    /// | `PROJECTS_API_URL`    | `http://localhost:5000/api/projects` |
    /// | `HTTP_TIMEOUT_SECS`   | unset (no timeout)                   |
    /// | `DATE_DISPLAY_FORMAT` | `%-m/%-d/%Y`                         |
    pub fn from_env() -> Self {
        let client = ClientConfig::from_env();

        let date_format =
            std::env::var("DATE_DISPLAY_FORMAT").unwrap_or_else(|_| DEFAULT_DISPLAY_FORMAT.into());
        assert!(
            is_valid_display_format(&date_format),
            "DATE_DISPLAY_FORMAT must be a valid strftime format, got '{date_format}'"
        );

        Self {
            client,
            date_format,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            date_format: DEFAULT_DISPLAY_FORMAT.to_string(),
        }
    }
}
