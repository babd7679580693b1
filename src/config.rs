use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Configuration for the detection drivers.
///
/// The classifier's signal set and the locator's method order are fixed and
/// deliberately not configurable; this covers driver concerns only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Delay before the re-check that catches client-side-rendered UIs
    #[serde(default = "default_recheck_delay_ms")]
    pub recheck_delay_ms: u64,

    /// Upper bound on navigation and page-source retrieval
    #[serde(default = "default_page_load_timeout_secs")]
    pub page_load_timeout_secs: u64,

    /// Page URL override, used by the file driver where no natural
    /// http(s) URL exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            recheck_delay_ms: default_recheck_delay_ms(),
            page_load_timeout_secs: default_page_load_timeout_secs(),
            page_url: None,
        }
    }
}

impl DetectorConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

/// Default re-check delay, matching the interval Swagger UIs typically need
/// to finish client-side rendering
fn default_recheck_delay_ms() -> u64 {
    1500
}

/// Default page-load timeout
fn default_page_load_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = DetectorConfig::from_json("{}").unwrap();
        assert_eq!(config.webdriver_url, "http://localhost:4444");
        assert_eq!(config.recheck_delay_ms, 1500);
        assert_eq!(config.page_load_timeout_secs, 30);
        assert_eq!(config.page_url, None);
    }

    #[test]
    fn test_explicit_fields_win() {
        let config = DetectorConfig::from_json(
            r#"{ "webdriver_url": "http://localhost:9515", "recheck_delay_ms": 250 }"#,
        )
        .unwrap();
        assert_eq!(config.webdriver_url, "http://localhost:9515");
        assert_eq!(config.recheck_delay_ms, 250);
        assert_eq!(config.page_load_timeout_secs, 30);
    }
}
