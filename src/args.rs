use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use swagger_scout::SourceType;

#[derive(Parser, Debug)]
#[command(name = "swagger-scout")]
#[command(about = "Detects Swagger/OpenAPI UI pages and discovers their definition URL")]
#[command(version)]
pub struct Args {
    /// Page to inspect (web URL or local HTML file path)
    pub source: String,

    /// Source type (web, file)
    #[arg(short, long, value_enum, default_value_t = SourceTypeArg::Web)]
    pub type_: SourceTypeArg,

    /// Page URL to resolve relative candidates against (file sources only)
    #[arg(long)]
    pub page_url: Option<String>,

    /// Delay in milliseconds before the re-check for client-rendered UIs
    #[arg(long, default_value_t = 1500)]
    pub recheck_delay: u64,

    /// Page-load timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceTypeArg {
    Web,
    File,
}

/// Convert from CLI argument source type to internal source type
pub fn convert_source_type(arg_type: SourceTypeArg, source: &str) -> SourceType {
    match arg_type {
        SourceTypeArg::Web => SourceType::Web(source.to_string()),
        SourceTypeArg::File => SourceType::File(source.to_string()),
    }
}
