use crate::detect::classifier::{self, PageSignals};
use crate::detect::locator;
use crate::postman;
use crate::results::Detection;
use scraper::Html;
use url::Url;

/// Per-page detection session.
///
/// Owns the idempotency latch for one loaded page: triggers may fire any
/// number of times (DOM-ready, delayed re-check, external re-check), but
/// classification plus enhancement runs to completion at most once. The
/// latch lives here rather than in module state, so reused execution
/// contexts cannot leak it across pages; navigation means a fresh session.
pub struct PageSession {
    page_url: Url,
    processed: bool,
}

impl PageSession {
    /// Creates a session for a freshly loaded page
    pub fn new(page_url: Url) -> Self {
        Self {
            page_url,
            processed: false,
        }
    }

    /// The page URL this session inspects
    pub fn page_url(&self) -> &Url {
        &self.page_url
    }

    /// Whether this page has already been processed
    pub fn is_processed(&self) -> bool {
        self.processed
    }

    /// Runs the detection pipeline against a snapshot of the page source.
    ///
    /// Returns `Some(Detection)` on the first positive classification and
    /// `None` otherwise. A negative classification leaves the latch open, so
    /// a later trigger can still catch a UI that rendered asynchronously.
    /// Once latched, every further call is a no-op.
    pub fn check(&mut self, html: &str) -> Option<Detection> {
        if self.processed {
            ::log::debug!("Page already processed, skipping: {}", self.page_url);
            return None;
        }

        let doc = Html::parse_document(html);
        let signals = PageSignals::scan(&doc);
        if !signals.is_swagger_ui() {
            ::log::debug!("No classifier signal matched for: {}", self.page_url);
            return None;
        }

        ::log::info!(
            "Swagger UI detected at {} (signals: {:?})",
            self.page_url,
            signals.matched_names()
        );

        let definition_url = locator::locate(&doc, &self.page_url);
        let postman_import_url = definition_url.as_ref().map(postman::import_url);
        match &definition_url {
            Some(url) => ::log::info!("Definition document: {}", url),
            None => ::log::info!("Could not find definition URL for: {}", self.page_url),
        }

        // Latched on classification, not on URL discovery: a Swagger page
        // with an undiscoverable definition is still done.
        self.processed = true;

        Some(Detection::detected(
            self.page_url.to_string(),
            classifier::page_title(&doc),
            signals.matched_names(),
            definition_url.map(|u| u.to_string()),
            postman_import_url.map(|u| u.to_string()),
        ))
    }

    /// Builds the negative outcome for a page that never classified,
    /// reported once all triggers are exhausted.
    pub fn not_detected(&self, html: &str) -> Detection {
        let doc = Html::parse_document(html);
        Detection::not_detected(self.page_url.to_string(), classifier::page_title(&doc))
    }
}
