use std::time::Duration;

/// Default collection URL of the projects resource.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/projects";

/// Remote store connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Collection URL of the projects resource.
    pub api_url: String,
    /// Per-request timeout in seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var             | Default                              |
    /// |---------------------|--------------------------------------|
    /// | `PROJECTS_API_URL`  | `http://localhost:5000/api/projects` |
    /// | `HTTP_TIMEOUT_SECS` | unset (no timeout)                   |
    pub fn from_env() -> Self {
        let api_url = std::env::var("PROJECTS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());

        let timeout_secs = std::env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse::<u64>()
                    .expect("HTTP_TIMEOUT_SECS must be a valid u64")
            });

        Self {
            api_url,
            timeout_secs,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: None,
        }
    }
}
