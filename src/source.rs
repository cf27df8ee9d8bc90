//! Loading the raw sheet export.
//!
//! The data source is either an HTTP(S) URL (a published spreadsheet) or a
//! local file path. There is a single attempt: any failure ends the load.

use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// True when the source should be fetched over HTTP
pub fn is_remote(source: &str) -> bool {
    let lower = source.trim().to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Fetch the raw text for the configured data source
pub async fn load_text(config: &CatalogConfig) -> Result<String> {
    let source = config.data_source.trim();
    if source.is_empty() {
        return Err(CatalogError::Configuration {
            message: "no data source configured".to_string(),
        });
    }

    if is_remote(source) {
        fetch_remote(source, config).await
    } else {
        read_local(Path::new(source)).await
    }
}

async fn fetch_remote(url: &str, config: &CatalogConfig) -> Result<String> {
    info!("Fetching repertoire from {}", url);

    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;

    let response = client
        .get(url)
        .header(reqwest::header::CACHE_CONTROL, "no-store")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::FetchFailure {
            source_name: url.to_string(),
            status: status.as_u16(),
        });
    }

    let text = response.text().await?;
    debug!("Fetched {} bytes", text.len());
    Ok(text)
}

async fn read_local(path: &Path) -> Result<String> {
    info!("Reading repertoire from {}", path.display());
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CatalogError::SourceRead {
            path: path.display().to_string(),
            source: e,
        })?;
    debug!("Read {} bytes", text.len());
    Ok(text)
}
