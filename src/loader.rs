//! Loading the release export
//!
//! This is the only asynchronous step. The text comes from a local file or,
//! with the `fetch` feature, from an http(s) URL. Any failure here is terminal
//! for the caller; there is no partial load and no retry.

use crate::error::{DashboardError, Result};
use std::fmt;
use std::path::PathBuf;
#[cfg(feature = "fetch")]
use std::time::Duration;
use tracing::{debug, info};

/// Where the export lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(String),
}

impl Source {
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            Source::Url(location.to_string())
        } else {
            Source::File(PathBuf::from(location))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Url(url) => f.write_str(url),
        }
    }
}

/// Read the raw export text from `source`
pub async fn load_text(source: &Source, timeout_secs: u64) -> Result<String> {
    info!(%source, "Loading release export");
    let text = match source {
        Source::File(path) => tokio::fs::read_to_string(path).await?,
        Source::Url(url) => fetch_url(url, timeout_secs).await?,
    };
    debug!(%source, bytes = text.len(), "Release export loaded");
    Ok(text)
}

#[cfg(feature = "fetch")]
async fn fetch_url(url: &str, timeout_secs: u64) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    fetch_text(&client, url).await
}

#[cfg(not(feature = "fetch"))]
async fn fetch_url(url: &str, _timeout_secs: u64) -> Result<String> {
    Err(DashboardError::UnsupportedSource(format!(
        "{} (built without the `fetch` feature)",
        url
    )))
}

/// GET `url` with an existing client; any non-2xx status is an error
#[cfg(feature = "fetch")]
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(DashboardError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_parse() {
        assert_eq!(
            Source::parse("https://example.com/releases.csv"),
            Source::Url("https://example.com/releases.csv".to_string())
        );
        assert_eq!(
            Source::parse(" data/releases.csv "),
            Source::File(PathBuf::from("data/releases.csv"))
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let source = Source::File(PathBuf::from("/definitely/not/here/releases.csv"));
        let err = load_text(&source, 5).await.unwrap_err();
        assert!(matches!(err, DashboardError::Io(_)));
        assert!(err.is_load_failure());
    }
}
