use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser};
use omics_core::postgres::PostgresStore;
use omics_core::{MAX_ROWS, QueryService, SharedStore};
use tracing::info;

use crate::logging::LogFormat;

#[derive(Debug, Clone, Args)]
pub struct StorageConfig {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,
    /// Maximum database connections
    #[arg(long, env = "MAX_CONNECTIONS", default_value_t = 10)]
    pub max_connections: u32,
    /// Deadline for one storage round-trip, e.g. "10s" or "1500ms"
    #[arg(long, env = "QUERY_TIMEOUT", default_value = "10s", value_parser = humantime::parse_duration)]
    pub query_timeout: Duration,
    /// Maximum rows per lookup (at most 500)
    #[arg(long, env = "ROW_LIMIT", default_value_t = MAX_ROWS)]
    pub row_limit: u32,
    /// Tissue types offered by the interactive filter
    #[arg(long, env = "TISSUES", value_delimiter = ',', default_value = "Lung,Liver,Blood")]
    pub tissues: Vec<String>,
}

impl StorageConfig {
    pub fn effective_row_limit(&self) -> u32 {
        self.row_limit.clamp(1, MAX_ROWS)
    }

    /// Trimmed, de-duplicated tissue options; blanks and the `All` sentinel
    /// are dropped since the UI always offers `All` itself.
    pub fn tissue_options(&self) -> Vec<String> {
        let mut options: Vec<String> = Vec::new();
        for tissue in &self.tissues {
            let tissue = tissue.trim();
            if tissue.is_empty() || tissue.eq_ignore_ascii_case("all") {
                continue;
            }
            if !options.iter().any(|t| t == tissue) {
                options.push(tissue.to_string());
            }
        }
        options
    }

    /// Opens the Postgres pool and wraps it in the lookup service.
    pub async fn build_service(&self) -> Result<QueryService<SharedStore>> {
        let store = PostgresStore::connect(
            &self.database_url,
            self.max_connections,
            self.query_timeout,
        )
        .await
        .context("failed to connect to postgres")?;

        info!(
            event = "storage.connected",
            max_connections = self.max_connections,
            query_timeout_ms = self.query_timeout.as_millis(),
            row_limit = self.effective_row_limit(),
            "storage pool ready"
        );

        let store: SharedStore = Arc::new(store);
        Ok(QueryService::new(store)
            .with_timeout(self.query_timeout)
            .with_row_limit(self.effective_row_limit()))
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "omicscloud-backend",
    version,
    about = "Gene expression lookup API"
)]
pub struct ServerConfig {
    /// Address to bind the HTTP server to
    #[arg(long, env = "BIND_ADDRESS", default_value = "127.0.0.1:8080")]
    pub bind: String,
    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
    #[command(flatten)]
    pub storage: StorageConfig,
}
