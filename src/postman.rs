use url::Url;

/// Postman's collection-import endpoint
pub const IMPORT_ENDPOINT: &str = "https://app.getpostman.com/run-collection/import";

/// Builds the Postman import link for a definition document.
///
/// The definition URL travels url-encoded in the `collection` query
/// parameter, which is all the endpoint needs to pull the spec in.
pub fn import_url(definition_url: &Url) -> Url {
    let mut link = Url::parse(IMPORT_ENDPOINT).expect("Import endpoint should be a valid URL");
    link.query_pairs_mut()
        .append_pair("collection", definition_url.as_str());
    link
}
