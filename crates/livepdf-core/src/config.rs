use std::path::PathBuf;
use std::time::Duration;

use crate::debounce::DEFAULT_QUIET_PERIOD;
use crate::service::DEFAULT_SERVICE_URL;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the rendering service (without `/convert`)
    pub service_url: String,
    /// Quiet period between the last edit and the conversion
    pub debounce: Duration,
    /// Per-request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
    /// Where exported PDFs are saved (~/Downloads)
    pub export_dir: PathBuf,
}

impl Config {
    /// Load configuration or use defaults
    pub fn load_or_default() -> Self {
        let export_dir = dirs::download_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            debounce: DEFAULT_QUIET_PERIOD,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            export_dir,
        }
    }

    pub fn with_service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url = url.into();
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    /// Ensure the export directory exists
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.export_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::load_or_default()
    }
}
