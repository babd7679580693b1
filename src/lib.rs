// Re-export modules
pub mod config;
pub mod detect;
pub mod drivers;
pub mod postman;
pub mod results;
pub mod session;

// Re-export commonly used types for convenience
pub use drivers::{Trigger, Watch};
pub use results::Detection;
pub use session::PageSession;

use config::DetectorConfig;

/// Where the page under inspection comes from
#[derive(Debug, Clone)]
pub enum SourceType {
    /// Live page loaded through a WebDriver session
    Web(String),
    /// Local HTML file
    File(String),
}

/// Builder for a detection watch over a single page
pub struct Scan {
    source: SourceType,
    config: DetectorConfig,
}

impl Scan {
    /// Create a new Scan builder for the given source
    pub fn new(source: SourceType) -> Self {
        Self {
            source,
            config: DetectorConfig::default(),
        }
    }

    /// Apply a configuration
    pub fn with_config(mut self, config: DetectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(
        mut self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        self.config = DetectorConfig::from_file(path)?;
        Ok(self)
    }

    /// Apply configuration from a JSON string
    pub fn with_config_str(mut self, json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        self.config = DetectorConfig::from_json(json)?;
        Ok(self)
    }

    /// Override the delayed re-check interval
    pub fn with_recheck_delay(mut self, delay_ms: u64) -> Self {
        self.config.recheck_delay_ms = delay_ms;
        self
    }

    /// Override the page-load timeout
    pub fn with_page_load_timeout(mut self, timeout_secs: u64) -> Self {
        self.config.page_load_timeout_secs = timeout_secs;
        self
    }

    /// Override the page URL the session resolves candidates against
    pub fn with_page_url(mut self, page_url: &str) -> Self {
        self.config.page_url = Some(page_url.to_string());
        self
    }

    /// Start the watch and get its result/trigger handles
    pub async fn generate(mut self) -> Result<Watch, Box<dyn std::error::Error>> {
        match self.source {
            SourceType::Web(url) => {
                // Override the WebDriver URL with an environment variable if provided
                if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
                    if !webdriver_url.is_empty() {
                        self.config.webdriver_url = webdriver_url;
                    }
                }

                Ok(drivers::webdriver::start(&self.config, &url).await)
            }
            SourceType::File(path) => Ok(drivers::file::start(&self.config, &path).await),
        }
    }
}
