use crate::detect::classifier::classify;
use crate::detect::locator::locate;
use crate::session::PageSession;
use scraper::Html;
use url::Url;

#[test]
fn test_title_only_page_falls_back_to_conventional_path() {
    // Title matches, no selectors, no scripts, no link elements: the page
    // classifies and the locator falls back to the first conventional path
    // rooted at the page origin.
    let html = "<html><head><title>My API Documentation</title></head>\
         <body><h1>Endpoints</h1></body></html>";
    let doc = Html::parse_document(html);
    let page_url = Url::parse("https://host.example/docs").unwrap();

    assert!(classify(&doc));
    let found = locate(&doc, &page_url).unwrap();
    assert_eq!(
        found.as_str(),
        "https://host.example/swagger/v1/swagger.json"
    );
}

#[test]
fn test_full_session_over_a_typical_swagger_page() {
    let html = "<html><head><title>Petstore - Swagger UI</title></head>\
         <body><div id=\"swagger-ui\"></div>\
         <script src=\"/swagger-ui-bundle.js\"></script>\
         <script>window.ui = SwaggerUIBundle({ url: \"/v3/api-docs.json\", \
         dom_id: '#swagger-ui' });</script></body></html>";

    let mut session = PageSession::new(Url::parse("https://petstore.example/ui").unwrap());
    let detection = session.check(html).unwrap();

    assert!(detection.is_swagger_ui);
    assert_eq!(
        detection.definition_url,
        Some("https://petstore.example/v3/api-docs.json".to_string())
    );
    assert_eq!(
        detection.postman_import_url,
        Some(
            "https://app.getpostman.com/run-collection/import\
             ?collection=https%3A%2F%2Fpetstore.example%2Fv3%2Fapi-docs.json"
                .to_string()
        )
    );

    // Further triggers on the same page instance are no-ops
    assert!(session.check(html).is_none());
}

#[test]
fn test_client_rendered_page_detected_on_recheck() {
    // Initial snapshot is an empty shell; the re-check snapshot has the
    // rendered UI. The session must stay unlatched across the negative
    // check and succeed on the second.
    let shell = "<html><head><title>loading</title></head><body><div id=\"root\"></div>\
         </body></html>";
    let rendered = "<html><head><title>loading</title></head>\
         <body><div id=\"root\"><div class=\"swagger-ui\"></div></div></body></html>";

    let mut session = PageSession::new(Url::parse("https://spa.example/docs").unwrap());
    assert!(session.check(shell).is_none());
    assert!(!session.is_processed());

    let detection = session.check(rendered).unwrap();
    assert!(detection.is_swagger_ui);
    assert_eq!(
        detection.definition_url,
        Some("https://spa.example/swagger/v1/swagger.json".to_string())
    );
}

#[test]
fn test_unrelated_page_yields_nothing() {
    let html = "<html><head><title>Store front</title></head>\
         <body><script>var cart = { url: \"/cart.json\" };</script></body></html>";
    let doc = Html::parse_document(html);

    // The script mentions a .json URL, but classification gates the whole
    // pipeline: no signal, no enhancement.
    assert!(!classify(&doc));

    let mut session = PageSession::new(Url::parse("https://shop.example/").unwrap());
    assert!(session.check(html).is_none());
    assert!(!session.is_processed());
}
