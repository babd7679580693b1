use crate::config::DetectorConfig;
use crate::drivers::{Trigger, Watch};
use crate::results::Detection;
use crate::session::PageSession;
use std::path::Path;
use tokio::sync::mpsc;
use url::Url;

/// Starts a detection watch over a local HTML file.
///
/// The file is read fresh on the initial trigger and on every external
/// re-check. There is no delayed re-check: a saved file cannot render
/// anything after the fact. The page URL defaults to the file's own `file:`
/// URL; set `page_url` in the config when the origin-dependent fallbacks
/// should resolve against a real host.
pub async fn start(config: &DetectorConfig, path: &str) -> Watch {
    ::log::info!("Starting file watch for: {}", path);

    let (result_tx, result_rx) = mpsc::channel::<Detection>(4);
    let (trigger_tx, trigger_rx) = mpsc::channel::<Trigger>(16);

    trigger_tx
        .send(Trigger::DomReady)
        .await
        .expect("Trigger channel should be open at startup");

    let config = config.clone();
    let path = path.to_string();
    tokio::spawn(async move {
        run(config, path, trigger_rx, result_tx).await;
    });

    Watch {
        results: result_rx,
        triggers: trigger_tx,
    }
}

/// Drives one file watch to completion
async fn run(
    config: DetectorConfig,
    path: String,
    mut triggers: mpsc::Receiver<Trigger>,
    results: mpsc::Sender<Detection>,
) {
    let Some(page_url) = resolve_page_url(&config, &path).await else {
        return;
    };

    let mut session = PageSession::new(page_url);
    let mut last_source = String::new();

    while let Some(trigger) = triggers.recv().await {
        ::log::debug!("Processing trigger {:?} for: {}", trigger, path);
        if session.is_processed() {
            continue;
        }

        let source = match tokio::fs::read_to_string(&path).await {
            Ok(source) => source,
            Err(e) => {
                ::log::error!("Failed to read {}: {}", path, e);
                continue;
            }
        };

        let outcome = session.check(&source);
        last_source = source;

        if let Some(detection) = outcome {
            if let Err(e) = results.send(detection).await {
                ::log::error!("Failed to send detection result: {}", e);
            }
            break;
        }
    }

    if !session.is_processed() {
        let detection = session.not_detected(&last_source);
        if let Err(e) = results.send(detection).await {
            ::log::error!("Failed to send negative result: {}", e);
        }
    }
}

/// Resolves the URL the session treats as the page location: the config
/// override if given, otherwise the file's own `file:` URL.
async fn resolve_page_url(config: &DetectorConfig, path: &str) -> Option<Url> {
    if let Some(override_url) = &config.page_url {
        match Url::parse(override_url) {
            Ok(url) => return Some(url),
            Err(e) => {
                ::log::error!("Invalid page_url override {}: {}", override_url, e);
                return None;
            }
        }
    }

    let absolute = match tokio::fs::canonicalize(Path::new(path)).await {
        Ok(absolute) => absolute,
        Err(e) => {
            ::log::error!("Failed to resolve path {}: {}", path, e);
            return None;
        }
    };

    match Url::from_file_path(&absolute) {
        Ok(url) => Some(url),
        Err(()) => {
            ::log::error!("Path has no file URL representation: {}", absolute.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_override_wins() {
        let config = DetectorConfig {
            page_url: Some("https://host.example/docs".to_string()),
            ..DetectorConfig::default()
        };

        let url = tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(resolve_page_url(&config, "ignored.html"))
            .unwrap();
        assert_eq!(url.as_str(), "https://host.example/docs");
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let config = DetectorConfig {
            page_url: Some("not a url".to_string()),
            ..DetectorConfig::default()
        };

        let url = tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(resolve_page_url(&config, "ignored.html"));
        assert!(url.is_none());
    }

    const PLAIN_PAGE: &str =
        "<html><head><title>Weather</title></head><body><p>Sunny</p></body></html>";

    const SWAGGER_PAGE: &str = "<html><head><title>Petstore Swagger</title></head>\
         <body><div id=\"swagger-ui\"></div></body></html>";

    fn temp_page(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("swagger-scout-{}-{}.html", name, std::process::id()))
    }

    #[test]
    fn test_recheck_reads_the_file_fresh() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let path = temp_page("recheck");
            tokio::fs::write(&path, PLAIN_PAGE).await.unwrap();

            let config = DetectorConfig {
                page_url: Some("https://host.example/docs".to_string()),
                ..DetectorConfig::default()
            };
            let mut watch = start(&config, path.to_str().unwrap()).await;

            // The page gains a Swagger UI after the initial load; an
            // external re-check must pick up the rewritten content.
            tokio::fs::write(&path, SWAGGER_PAGE).await.unwrap();
            watch.triggers.send(Trigger::Recheck).await.unwrap();
            drop(watch.triggers);

            let detection = watch.results.recv().await.unwrap();
            assert!(detection.is_swagger_ui);
            assert_eq!(detection.page_url, "https://host.example/docs");
            assert_eq!(
                detection.definition_url,
                Some("https://host.example/swagger/v1/swagger.json".to_string())
            );

            tokio::fs::remove_file(&path).await.ok();
        });
    }

    #[test]
    fn test_queue_drain_reports_not_detected() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let path = temp_page("drain");
            tokio::fs::write(&path, PLAIN_PAGE).await.unwrap();

            let watch = start(&DetectorConfig::default(), path.to_str().unwrap()).await;
            let mut results = watch.results;
            drop(watch.triggers);

            // No trigger ever classified the page, so draining the queue
            // must still end the watch with an explicit negative record.
            let detection = results.recv().await.unwrap();
            assert!(!detection.is_swagger_ui);
            assert_eq!(detection.title, Some("Weather".to_string()));
            assert_eq!(detection.definition_url, None);
            assert!(results.recv().await.is_none());

            tokio::fs::remove_file(&path).await.ok();
        });
    }
}
