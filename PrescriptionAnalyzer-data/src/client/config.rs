use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default base URL of the analysis service
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Path of the prescription analysis endpoint
pub const ANALYZE_PATH: &str = "/api/analyze-prescription";

/// Path of the reminder endpoint
pub const REMINDER_PATH: &str = "/api/set-reminder";

/// Connection settings for [`PrescriptionClient`](super::PrescriptionClient)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme, host and optional path prefix of the service
    pub base_url: String,
    /// Request timeout; `None` keeps the HTTP client's own default
    pub timeout: Option<Duration>,
    /// Path of the analysis endpoint, relative to `base_url`
    pub analyze_path: String,
    /// Path of the reminder endpoint, relative to `base_url`
    pub reminder_path: String,
}

impl ClientConfig {
    /// Create a configuration for the given base URL with the standard endpoint paths
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            analyze_path: ANALYZE_PATH.to_string(),
            reminder_path: REMINDER_PATH.to_string(),
        }
    }

    /// Set a request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        match Url::parse(&self.base_url) {
            Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
                errors.push(format!(
                    "PRESCRIPTION_API_URL must use http or https, got '{}'",
                    url.scheme()
                ));
            }
            Ok(_) => {}
            Err(e) => errors.push(format!("PRESCRIPTION_API_URL is not a valid URL: {}", e)),
        }

        if self.timeout == Some(Duration::ZERO) {
            errors.push("PRESCRIPTION_API_TIMEOUT_SECS must be greater than zero".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Full URL of the analysis endpoint
    pub fn analyze_url(&self) -> Result<Url, url::ParseError> {
        self.endpoint(&self.analyze_path)
    }

    /// Full URL of the reminder endpoint
    pub fn reminder_url(&self) -> Result<Url, url::ParseError> {
        self.endpoint(&self.reminder_path)
    }

    /// Join an endpoint path onto the base URL, keeping any path prefix of the base
    fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        let base = if self.base_url.ends_with('/') {
            self.base_url.clone()
        } else {
            format!("{}/", self.base_url)
        };
        Url::parse(&base)?.join(path.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        // Read the environment on every call so tests can change it between runs
        let base_url = std::env::var("PRESCRIPTION_API_URL").unwrap_or_else(|_| {
            debug!("PRESCRIPTION_API_URL not set - using {}", DEFAULT_BASE_URL);
            DEFAULT_BASE_URL.to_string()
        });

        let timeout = std::env::var("PRESCRIPTION_API_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| match raw.trim().parse::<u64>() {
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    warn!("PRESCRIPTION_API_TIMEOUT_SECS '{}' is not a number - ignoring it", raw);
                    None
                }
            });

        let config = Self {
            timeout,
            ..Self::new(base_url)
        };

        // Log validation warnings but don't fail
        if let Err(errors) = config.validate() {
            for error in &errors {
                warn!("Client configuration warning: {}", error);
            }
        }

        config
    }
}
