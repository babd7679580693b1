use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// Conventional locations for an API definition document, ordered by how
/// commonly frameworks serve them. Existence is never probed (a cross-origin
/// check from inside a page is unreliable), so the first entry is the one
/// the fallback actually returns.
const DEFINITION_PATHS: [&str; 6] = [
    "/swagger/v1/swagger.json",
    "/api-docs/swagger.json",
    "/swagger/docs/v1",
    "/api/swagger.json",
    "/openapi.json",
    "/swagger.json",
];

/// Quoted-value patterns seen in Swagger UI initialization scripts
const URL_KEY_PATTERN: &str = r#"url\s*:\s*["']([^"']+)["']"#;
const SPEC_KEY_PATTERN: &str = r#"spec\s*:\s*["']([^"']+)["']"#;

/// Discovers the URL of the page's OpenAPI/Swagger definition document.
///
/// Three methods run in fixed priority order, short-circuiting on the first
/// hit: inline-script scan, conventional-path fallback, link-element
/// fallback. The result is absolute; relative candidates are resolved
/// against the page origin. Pure read of the document and location state,
/// no network access.
pub fn locate(doc: &Html, page_url: &Url) -> Option<Url> {
    let candidate = scan_inline_scripts(doc)
        .or_else(|| conventional_path(page_url))
        .or_else(|| link_element_href(doc))?;

    normalize(&candidate, page_url)
}

/// Method 1: scan inline script blocks for a quoted `url:` or `spec:` value
/// with a definition-file suffix.
///
/// Scripts are visited in document order; within each script the `url`
/// pattern is tried before the `spec` pattern, and the first accepted match
/// ends the scan.
fn scan_inline_scripts(doc: &Html) -> Option<String> {
    let script_selector = Selector::parse("script").expect("Fixed selectors should be valid");
    let url_re = Regex::new(URL_KEY_PATTERN).expect("Fixed patterns should be valid");
    let spec_re = Regex::new(SPEC_KEY_PATTERN).expect("Fixed patterns should be valid");

    for script in doc.select(&script_selector) {
        // Only scripts with embedded source; externally referenced scripts
        // have no text to scan.
        if script.value().attr("src").is_some() {
            continue;
        }
        let text = script.text().collect::<String>();

        for re in [&url_re, &spec_re] {
            if let Some(captures) = re.captures(&text) {
                let value = &captures[1];
                if has_definition_suffix(value) {
                    ::log::debug!("Inline script yielded definition candidate: {}", value);
                    return Some(value.to_string());
                }
            }
        }
    }

    None
}

/// Method 2: fall back to a conventional definition path under the page
/// origin. Returns the first entry of `DEFINITION_PATHS` unverified; pages
/// without a scheme/host origin (e.g. `file:`) yield nothing.
fn conventional_path(page_url: &Url) -> Option<String> {
    let origin = page_url.origin();
    if !origin.is_tuple() {
        return None;
    }

    DEFINITION_PATHS
        .first()
        .map(|path| format!("{}{}", origin.ascii_serialization(), path))
}

/// Method 3: look for a link element advertising the definition
fn link_element_href(doc: &Html) -> Option<String> {
    let selector = Selector::parse(
        r#"link[rel="swagger"], link[type="application/json"], link[type="application/yaml"]"#,
    )
    .expect("Fixed selectors should be valid");

    doc.select(&selector)
        .filter_map(|el| el.value().attr("href"))
        .find(|href| !href.is_empty())
        .map(|href| href.to_string())
}

/// Accepts only values whose path ends in a definition-file suffix
fn has_definition_suffix(value: &str) -> bool {
    value.ends_with(".json") || value.ends_with(".yaml") || value.ends_with(".yml")
}

/// Resolves a candidate to an absolute URL. Candidates already carrying a
/// recognized scheme prefix are parsed as-is; everything else is resolved
/// relative to the page origin. Unparseable candidates collapse to None.
fn normalize(candidate: &str, page_url: &Url) -> Option<Url> {
    if candidate.starts_with("http") {
        return Url::parse(candidate).ok();
    }

    let origin = page_url.origin();
    if !origin.is_tuple() {
        return Url::parse(candidate).ok();
    }

    let base = Url::parse(&origin.ascii_serialization()).ok()?;
    base.join(candidate).ok()
}
