use crate::config::DetectorConfig;
use crate::drivers::{Trigger, Watch};
use crate::results::Detection;
use crate::session::PageSession;
use fantoccini::{Client, ClientBuilder};
use tokio::sync::mpsc;
use tokio::time::{Duration, sleep, timeout};
use url::Url;

/// Starts a detection watch on a live page loaded through WebDriver.
///
/// The driver queues an immediate DOM-ready trigger and schedules one
/// delayed re-check (for Swagger UIs rendered asynchronously on the
/// client); the caller may inject further re-checks through the returned
/// trigger sender. Triggers are processed one at a time, each against a
/// fresh page-source snapshot.
pub async fn start(config: &DetectorConfig, page_url: &str) -> Watch {
    ::log::info!("Starting WebDriver watch for: {}", page_url);

    let (result_tx, result_rx) = mpsc::channel::<Detection>(4);
    let (trigger_tx, trigger_rx) = mpsc::channel::<Trigger>(16);

    // The initial trigger; the channel buffer makes this send immediate
    trigger_tx
        .send(Trigger::DomReady)
        .await
        .expect("Trigger channel should be open at startup");
    schedule_delayed_recheck(trigger_tx.clone(), config.recheck_delay_ms);

    let config = config.clone();
    let url = page_url.to_string();
    tokio::spawn(async move {
        run(config, url, trigger_rx, result_tx).await;
    });

    Watch {
        results: result_rx,
        triggers: trigger_tx,
    }
}

/// Schedules the fixed-delay re-check trigger. Once scheduled it always
/// fires; the session latch turns a redundant run into a no-op.
fn schedule_delayed_recheck(trigger_tx: mpsc::Sender<Trigger>, delay_ms: u64) {
    tokio::spawn(async move {
        sleep(Duration::from_millis(delay_ms)).await;
        if trigger_tx.send(Trigger::DelayedRecheck).await.is_err() {
            ::log::debug!("Watch ended before the delayed re-check fired");
        }
    });
}

/// Drives one page watch to completion
async fn run(
    config: DetectorConfig,
    url: String,
    mut triggers: mpsc::Receiver<Trigger>,
    results: mpsc::Sender<Detection>,
) {
    let Some(client) = connect_to_webdriver(&config.webdriver_url).await else {
        report_failure(&results, &url).await;
        return;
    };

    let load_timeout = Duration::from_secs(config.page_load_timeout_secs);
    if !navigate(&client, &url, load_timeout).await {
        close_client(client).await;
        report_failure(&results, &url).await;
        return;
    }

    // Prefer the post-redirect URL the browser actually landed on
    let page_url = match client.current_url().await {
        Ok(resolved) => resolved,
        Err(e) => {
            ::log::warn!("Failed to read current URL, using the requested one: {}", e);
            match Url::parse(&url) {
                Ok(parsed) => parsed,
                Err(e) => {
                    ::log::error!("Invalid page URL {}: {}", url, e);
                    close_client(client).await;
                    report_failure(&results, &url).await;
                    return;
                }
            }
        }
    };

    let mut session = PageSession::new(page_url);
    let mut last_source = String::new();

    while let Some(trigger) = triggers.recv().await {
        ::log::debug!("Processing trigger {:?} for: {}", trigger, url);
        if session.is_processed() {
            continue;
        }

        let Some(source) = page_source(&client, load_timeout).await else {
            continue;
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
        if last_source.is_empty() {
            ::log::debug!("Negative record carries no page snapshot for: {}", url);
        }
        let detection = session.not_detected(&last_source);
        if let Err(e) = results.send(detection).await {
            ::log::error!("Failed to send negative result: {}", e);
        }
    }

    close_client(client).await;
}

/// Terminal negative record for driver failures that happen before any page
/// snapshot exists. The results channel never closes without an outcome.
async fn report_failure(results: &mpsc::Sender<Detection>, url: &str) {
    let detection = Detection::not_detected(url.to_string(), None);
    if let Err(e) = results.send(detection).await {
        ::log::error!("Failed to send negative result: {}", e);
    }
}

/// Connects to the WebDriver instance
async fn connect_to_webdriver(webdriver_url: &str) -> Option<Client> {
    match ClientBuilder::native().connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Some(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
        }
    }

    // If we couldn't connect, try with common alternative URLs
    let fallback_urls = [
        "http://localhost:9515", // ChromeDriver default
        "http://localhost:4444", // Selenium/GeckoDriver default
        "http://127.0.0.1:4444", // Try with IP instead of localhost
    ];

    for url in fallback_urls.iter() {
        if *url == webdriver_url {
            continue; // Skip if it's the same as the one we already tried
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = ClientBuilder::native().connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Some(client);
        }
    }

    ::log::error!("Failed to connect to any WebDriver server");
    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    None
}

/// Navigates to the page, bounded by the load timeout
async fn navigate(client: &Client, url: &str, load_timeout: Duration) -> bool {
    match timeout(load_timeout, client.goto(url)).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            ::log::error!("Failed to navigate to {}: {}", url, e);
            false
        }
        Err(_) => {
            ::log::error!("Timed out navigating to: {}", url);
            false
        }
    }
}

/// Takes a fresh snapshot of the page source
async fn page_source(client: &Client, load_timeout: Duration) -> Option<String> {
    match timeout(load_timeout, client.source()).await {
        Ok(Ok(source)) => Some(source),
        Ok(Err(e)) => {
            ::log::error!("Failed to get page source: {}", e);
            None
        }
        Err(_) => {
            ::log::error!("Timed out getting page source");
            None
        }
    }
}

/// Closes the WebDriver session
async fn close_client(client: Client) {
    if let Err(e) = client.close().await {
        ::log::warn!("Failed to close WebDriver client: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_server_still_reports_an_outcome() {
        // Whether the connect fails outright or a fallback server connects
        // and then cannot navigate, the watch must end with a terminal
        // negative record instead of a silently closed channel.
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let config = DetectorConfig {
                webdriver_url: "http://127.0.0.1:1".to_string(),
                page_load_timeout_secs: 5,
                ..DetectorConfig::default()
            };

            let watch = start(&config, "http://127.0.0.1:1/docs").await;
            let mut results = watch.results;
            drop(watch.triggers);

            let detection = results.recv().await.unwrap();
            assert!(!detection.is_swagger_ui);
            assert_eq!(detection.page_url, "http://127.0.0.1:1/docs");
            assert_eq!(detection.definition_url, None);
        });
    }
}
