use std::time::Duration;

/// Default per-request timeout applied by the HTTP client.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime configuration describing where the scoreboard documents are served.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl ApiConfig {
    /// Construct a configuration from the base URL of the `api/` directory.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Override the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Base URL normalised to end with exactly one slash.
    pub(super) fn normalized_base(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_always_ends_with_single_slash() {
        assert_eq!(ApiConfig::new("http://scoreboard/api").normalized_base(), "http://scoreboard/api/");
        assert_eq!(ApiConfig::new("http://scoreboard/api//").normalized_base(), "http://scoreboard/api/");
    }
}
