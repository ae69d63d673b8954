// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use genetable_app::Dataset;
use reqwest::blocking::Client as HttpClient;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::{ParseOptions, parse_records};

pub const DEFAULT_DATASET_URL: &str =
    "https://github.com/dvgodoy/genelengthdatabase/raw/refs/heads/main/database/genes.csv";
pub const DEFAULT_ARCHIVE_URL: &str = "https://github.com/dvgodoy/genelengthdatabase/raw/refs/heads/main/database/gene_length_database.zip";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(Url),
}

impl DataSource {
    pub fn parse(raw: &str) -> Result<Self> {
        validate_source(raw)?;
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            let url = Url::parse(raw).with_context(|| format!("parse source URL {raw:?}"))?;
            return Ok(Self::Url(url));
        }
        Ok(Self::File(PathBuf::from(raw)))
    }

    /// Last path segment, used as the default export file name.
    pub fn file_name(&self) -> Option<String> {
        match self {
            Self::File(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            Self::Url(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|segment| !segment.is_empty())
                .map(str::to_owned),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

pub fn validate_source(raw: &str) -> Result<()> {
    let raw = raw.trim();
    if raw.is_empty() {
        bail!("dataset source must not be empty");
    }

    if raw.starts_with("file:") {
        bail!("dataset source {raw:?} uses file: URI syntax; pass a plain filesystem path");
    }

    if let Some(index) = raw.find("://")
        && index > 0
    {
        let scheme = &raw[..index];
        if scheme.chars().all(char::is_alphabetic) && scheme != "http" && scheme != "https" {
            bail!(
                "dataset source {raw:?} uses unsupported scheme {scheme}://; use http(s) or a filesystem path"
            );
        }
    }

    Ok(())
}

/// Reads sources from disk or over blocking HTTP.
#[derive(Debug, Clone)]
pub struct Fetcher {
    http: HttpClient,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;
        Ok(Self { http })
    }

    pub fn fetch_bytes(&self, source: &DataSource) -> Result<Vec<u8>> {
        match source {
            DataSource::File(path) => {
                fs::read(path).with_context(|| format!("read {}", path.display()))
            }
            DataSource::Url(url) => {
                let response = self
                    .http
                    .get(url.clone())
                    .send()
                    .map_err(|error| anyhow!("cannot reach {url} -- check the network ({error})"))?;
                let status = response.status();
                if !status.is_success() {
                    bail!("{url} returned {}", status.as_u16());
                }
                let bytes = response
                    .bytes()
                    .with_context(|| format!("read response body from {url}"))?;
                Ok(bytes.to_vec())
            }
        }
    }

    pub fn fetch_text(&self, source: &DataSource) -> Result<String> {
        let bytes = self.fetch_bytes(source)?;
        String::from_utf8(bytes).with_context(|| format!("{source} is not UTF-8 text"))
    }
}

/// Fetches and parses the full dataset; any failure leaves no dataset.
pub fn load_dataset(fetcher: &Fetcher, source: &DataSource, options: &ParseOptions) -> Result<Dataset> {
    info!(%source, "loading dataset");
    let text = fetcher.fetch_text(source)?;
    let records = parse_records(&text, options).with_context(|| format!("parse {source}"))?;
    let dataset = Dataset::new(records);
    info!(
        %source,
        records = dataset.len(),
        groups = dataset.groups().len().saturating_sub(1),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Copies the archive byte-for-byte to `destination` and returns its size.
pub fn export_archive(fetcher: &Fetcher, archive: &DataSource, destination: &Path) -> Result<u64> {
    let bytes = fetcher.fetch_bytes(archive)?;
    if let Some(parent) = destination.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create export directory {}", parent.display()))?;
    }
    fs::write(destination, &bytes)
        .with_context(|| format!("write export {}", destination.display()))?;
    debug!(%archive, destination = %destination.display(), bytes = bytes.len(), "archive exported");
    Ok(bytes.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::{DataSource, validate_source};
    use anyhow::Result;
    use std::path::PathBuf;

    fn rejection(raw: &str) -> String {
        match validate_source(raw) {
            Ok(()) => panic!("{raw:?} should be rejected"),
            Err(error) => error.to_string(),
        }
    }

    #[test]
    fn validate_source_rejects_uri_forms() {
        assert!(rejection("").contains("must not be empty"));
        assert!(rejection("   ").contains("must not be empty"));
        assert!(rejection("ftp://example.com/genes.csv").contains("unsupported scheme ftp://"));
        assert!(rejection("file:///tmp/genes.csv").contains("pass a plain filesystem path"));
        assert!(rejection("file:genes.csv").contains("pass a plain filesystem path"));
        assert!(validate_source("https://example.com/genes.csv").is_ok());
        assert!(validate_source("/tmp/genes.csv").is_ok());
    }

    #[test]
    fn parse_distinguishes_urls_from_paths() -> Result<()> {
        assert_eq!(
            DataSource::parse("data/genes.csv")?,
            DataSource::File(PathBuf::from("data/genes.csv"))
        );
        assert!(matches!(
            DataSource::parse(" https://example.com/db/genes.csv ")?,
            DataSource::Url(_)
        ));
        Ok(())
    }

    #[test]
    fn file_name_comes_from_last_segment() -> Result<()> {
        assert_eq!(
            DataSource::parse(super::DEFAULT_ARCHIVE_URL)?.file_name(),
            Some("gene_length_database.zip".to_owned())
        );
        assert_eq!(
            DataSource::parse("/srv/data/genes.csv")?.file_name(),
            Some("genes.csv".to_owned())
        );
        assert_eq!(DataSource::parse("https://example.com/")?.file_name(), None);
        Ok(())
    }
}
