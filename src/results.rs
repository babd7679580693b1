use serde::{Deserialize, Serialize};

/// Outcome of running the detection pipeline against one page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// URL of the inspected page
    pub page_url: String,

    /// Title of the page (if available)
    pub title: Option<String>,

    /// Whether the page was classified as a Swagger/OpenAPI UI
    pub is_swagger_ui: bool,

    /// Names of the classifier signals that matched
    pub matched_signals: Vec<String>,

    /// Discovered definition document URL, absolute (if any)
    pub definition_url: Option<String>,

    /// Ready-to-use Postman import link for the definition (if any)
    pub postman_import_url: Option<String>,
}

impl Detection {
    /// Creates a positive detection outcome
    pub fn detected(
        page_url: String,
        title: Option<String>,
        matched_signals: Vec<String>,
        definition_url: Option<String>,
        postman_import_url: Option<String>,
    ) -> Self {
        Self {
            page_url,
            title,
            is_swagger_ui: true,
            matched_signals,
            definition_url,
            postman_import_url,
        }
    }

    /// Creates a negative outcome for a page that never classified
    pub fn not_detected(page_url: String, title: Option<String>) -> Self {
        Self {
            page_url,
            title,
            is_swagger_ui: false,
            matched_signals: Vec::new(),
            definition_url: None,
            postman_import_url: None,
        }
    }
}
