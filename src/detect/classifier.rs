use scraper::{Html, Selector};

/// One heuristic check contributing to the page-type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// An element carrying the Swagger UI root class (`.swagger-ui`)
    RootClass,
    /// An element naming the Swagger UI component (`[data-name="SwaggerUI"]`)
    ComponentAttr,
    /// An element with the conventional root identifier (`#swagger-ui`)
    RootId,
    /// Page title contains "swagger" (case-insensitive)
    TitleSwagger,
    /// Page title contains "api documentation" (case-insensitive)
    TitleApiDocs,
}

impl Signal {
    /// Short name used when logging which signals fired
    pub fn name(&self) -> &'static str {
        match self {
            Signal::RootClass => "root-class",
            Signal::ComponentAttr => "component-attr",
            Signal::RootId => "root-id",
            Signal::TitleSwagger => "title-swagger",
            Signal::TitleApiDocs => "title-api-docs",
        }
    }
}

/// Selector signals checked against the document tree, paired with the
/// signal they assert. The set is fixed; there is no configuration knob.
const SELECTOR_SIGNALS: [(&str, Signal); 3] = [
    (".swagger-ui", Signal::RootClass),
    (r#"[data-name="SwaggerUI"]"#, Signal::ComponentAttr),
    ("#swagger-ui", Signal::RootId),
];

/// Derived, read-only view of a document: which classifier signals matched
/// and the lower-cased title. Recomputed on every check, never cached.
#[derive(Debug)]
pub struct PageSignals {
    /// Signals that fired, in evaluation order
    pub matched: Vec<Signal>,
    /// Lower-cased document title, if the document has one
    pub title: Option<String>,
}

impl PageSignals {
    /// Scans a document for all classifier signals
    pub fn scan(doc: &Html) -> Self {
        let mut matched = Vec::new();

        for (css, signal) in SELECTOR_SIGNALS {
            let selector = Selector::parse(css).expect("Fixed selectors should be valid");
            if doc.select(&selector).next().is_some() {
                matched.push(signal);
            }
        }

        let title = page_title(doc).map(|t| t.to_lowercase());
        if let Some(title) = &title {
            if title.contains("swagger") {
                matched.push(Signal::TitleSwagger);
            }
            if title.contains("api documentation") {
                matched.push(Signal::TitleApiDocs);
            }
        }

        Self { matched, title }
    }

    /// True if any signal fired. Logical OR over the fixed signal set; no
    /// weighting and no negative signals.
    pub fn is_swagger_ui(&self) -> bool {
        !self.matched.is_empty()
    }

    /// Names of the matched signals, for logging and reporting
    pub fn matched_names(&self) -> Vec<String> {
        self.matched.iter().map(|s| s.name().to_string()).collect()
    }
}

/// Decides whether a document is a Swagger/OpenAPI UI.
///
/// This is a heuristic: a page merely titled "API Documentation" passes, and
/// a fully rebranded Swagger UI with no matching selectors does not.
pub fn classify(doc: &Html) -> bool {
    let signals = PageSignals::scan(doc);
    ::log::debug!("Classifier signals matched: {:?}", signals.matched_names());
    signals.is_swagger_ui()
}

/// Extracts the document title, whitespace-trimmed
pub fn page_title(doc: &Html) -> Option<String> {
    let selector = Selector::parse("title").expect("Fixed selectors should be valid");
    doc.select(&selector).next().map(|el| {
        el.text()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    })
}
