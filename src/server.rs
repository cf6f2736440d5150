use std::sync::Arc;

use clap::Parser;
use omicscloud_backend::StorageConfig;
use omicscloud_backend::api::SharedService;
use omicscloud_backend::logging::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "omicscloud", version, about = "Gene expression explorer")]
pub struct Cli {
    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
    #[command(flatten)]
    pub storage: StorageConfig,
}

pub struct AppState {
    pub service: SharedService,
    pub tissues: Vec<String>,
}

pub type GlobalAppState = Arc<AppState>;
