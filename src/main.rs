use clap::Parser;
use swagger_scout::Scan;
use swagger_scout::results::Detection;

mod args;
use args::{Args, convert_source_type};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    ::log::info!("Inspecting source: {}", args.source);

    // Convert from CLI argument source type to internal source type
    let source = convert_source_type(args.type_, &args.source);

    // Print WebDriver info message for web sources
    if let swagger_scout::SourceType::Web(_) = &source {
        println!("Note: Inspecting live pages requires a WebDriver server (e.g., ChromeDriver).");
        println!(
            "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
        );
    };

    // Build the scan from arguments, letting a config file set the baseline
    let mut scan = Scan::new(source);
    if let Some(path) = &args.config {
        scan = match scan.with_config_file(path) {
            Ok(scan) => scan,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                return;
            }
        };
    }
    scan = scan
        .with_recheck_delay(args.recheck_delay)
        .with_page_load_timeout(args.timeout);
    if let Some(page_url) = &args.page_url {
        scan = scan.with_page_url(page_url);
    }

    // Start the watch and get handles for results and triggers
    let watch = match scan.generate().await {
        Ok(watch) => watch,
        Err(e) => {
            ::log::error!("Failed to start watch: {}", e);
            return;
        }
    };

    // The CLI injects no external re-checks; dropping the sender lets the
    // driver wind down once its own triggers are exhausted.
    let mut results = watch.results;
    drop(watch.triggers);

    while let Some(detection) = results.recv().await {
        report_detection(&detection);
    }

    ::log::info!("Watch complete");
}

/// Prints one detection outcome as a JSON line
fn report_detection(detection: &Detection) {
    match serde_json::to_string(detection) {
        Ok(json) => println!("{}", json),
        Err(e) => ::log::error!("Failed to serialize detection: {}", e),
    }
}
