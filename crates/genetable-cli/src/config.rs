// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use genetable_app::{DEFAULT_PAGE_SIZE, InputField};
use genetable_data::{
    DEFAULT_ARCHIVE_URL, DEFAULT_DATASET_URL, DEFAULT_HEADER_LINES, DEFAULT_LINK_TEMPLATE,
    DataSource, GeneLinker, ParseOptions, validate_fields, validate_source,
};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_TIMEOUT: &str = "30s";
const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

pub const CONFIG_PATH_ENV: &str = "GENETABLE_CONFIG_PATH";
pub const DATASET_ENV: &str = "GENETABLE_DATASET";
pub const LOG_ENV: &str = "GENETABLE_LOG";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub view: View,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            source: Source::default(),
            view: View::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Source {
    pub dataset: Option<String>,
    pub archive: Option<String>,
    pub header_lines: Option<usize>,
    pub delimiter: Option<String>,
    pub fields: Option<Vec<String>>,
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct View {
    pub page_size: Option<usize>,
    pub default_group: Option<String>,
    pub link_template: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub path: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;

        let app_dir = config_root.join(genetable_data::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version; add `version = 1` and put values under [source], [view], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(dataset) = &self.source.dataset {
            validate_source(dataset)
                .with_context(|| format!("source.dataset in {}", path.display()))?;
        }
        if let Some(archive) = &self.source.archive {
            validate_source(archive)
                .with_context(|| format!("source.archive in {}", path.display()))?;
        }

        if let Some(delimiter) = &self.source.delimiter {
            parse_delimiter(delimiter)
                .with_context(|| format!("source.delimiter in {}", path.display()))?;
        }

        if let Some(fields) = &self.source.fields {
            parse_fields(fields)
                .with_context(|| format!("source.fields in {}", path.display()))?;
        }

        if let Some(timeout) = &self.source.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "source.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(page_size) = self.view.page_size
            && page_size == 0
        {
            bail!(
                "view.page_size in {} must be positive, got {}",
                path.display(),
                page_size
            );
        }

        if let Some(template) = &self.view.link_template {
            GeneLinker::new(template)
                .with_context(|| format!("view.link_template in {}", path.display()))?;
        }

        if let Some(level) = &self.log.level {
            validate_log_level(level)
                .with_context(|| format!("log.level in {}", path.display()))?;
        }

        if let Some(log_path) = &self.log.path
            && log_path.trim().is_empty()
        {
            bail!("log.path in {} must not be empty", path.display());
        }

        Ok(())
    }

    /// Configured dataset, then `$GENETABLE_DATASET`, then the public database.
    pub fn dataset_source(&self) -> Result<DataSource> {
        match &self.source.dataset {
            Some(dataset) => DataSource::parse(dataset),
            None => match env::var(DATASET_ENV) {
                Ok(value) if !value.trim().is_empty() => DataSource::parse(&value)
                    .with_context(|| format!("{DATASET_ENV} is not a valid dataset source")),
                _ => DataSource::parse(DEFAULT_DATASET_URL),
            },
        }
    }

    pub fn archive_source(&self) -> Result<DataSource> {
        DataSource::parse(self.source.archive.as_deref().unwrap_or(DEFAULT_ARCHIVE_URL))
    }

    pub fn parse_options(&self) -> Result<ParseOptions> {
        let delimiter = match &self.source.delimiter {
            Some(raw) => parse_delimiter(raw)?,
            None => ParseOptions::default().delimiter,
        };
        let fields = match &self.source.fields {
            Some(raw) => parse_fields(raw)?,
            None => InputField::GENES_CSV.to_vec(),
        };
        Ok(ParseOptions {
            header_lines: self.source.header_lines.unwrap_or(DEFAULT_HEADER_LINES),
            delimiter,
            fields,
        })
    }

    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(self.source.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn page_size(&self) -> usize {
        self.view.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn default_group(&self) -> Option<&str> {
        self.view.default_group.as_deref()
    }

    pub fn linker(&self) -> Result<GeneLinker> {
        GeneLinker::new(
            self.view
                .link_template
                .as_deref()
                .unwrap_or(DEFAULT_LINK_TEMPLATE),
        )
    }

    /// `$GENETABLE_LOG` wins over `log.level`.
    pub fn log_level(&self) -> String {
        match env::var(LOG_ENV) {
            Ok(value) if !value.trim().is_empty() => value,
            _ => self
                .log
                .level
                .clone()
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned()),
        }
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.log.path {
            return Ok(PathBuf::from(path));
        }
        let data_root = dirs::data_local_dir().ok_or_else(|| {
            anyhow!("cannot resolve data directory; set log.path in the config file")
        })?;
        Ok(data_root
            .join(genetable_data::APP_NAME)
            .join("genetable.log"))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# genetable config\n# Place this file at: {}\n\nversion = 1\n\n[source]\n# Local path or http(s) URL of the delimited gene table\ndataset = \"{}\"\n# Archive copied by `e` in the table view or by --export\narchive = \"{}\"\nheader_lines = {}\ndelimiter = \",\"\n# Meaning of each column, in file order. Use \"gene_type\" for a type tag column\nfields = [{}]\ntimeout = \"{}\"\n\n[view]\npage_size = {}\n# Optional. Defaults to the first chromosome in the dataset\n# default_group = \"chr1\"\nlink_template = \"{}\"\n\n[log]\nlevel = \"{}\"\n# Optional. Default is platform data dir (for example ~/.local/share/genetable/genetable.log)\n# path = \"/absolute/path/genetable.log\"\n",
            path.display(),
            DEFAULT_DATASET_URL,
            DEFAULT_ARCHIVE_URL,
            DEFAULT_HEADER_LINES,
            InputField::GENES_CSV
                .iter()
                .map(|field| format!("\"{}\"", field.key()))
                .collect::<Vec<_>>()
                .join(", "),
            DEFAULT_TIMEOUT,
            DEFAULT_PAGE_SIZE,
            DEFAULT_LINK_TEMPLATE,
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn parse_delimiter(raw: &str) -> Result<u8> {
    let bytes = raw.as_bytes();
    if bytes.len() != 1 || !bytes[0].is_ascii() {
        bail!("delimiter must be a single ASCII character, got {raw:?}");
    }
    if matches!(bytes[0], b'"' | b'\n' | b'\r') {
        bail!("delimiter {raw:?} conflicts with quoting or line breaks");
    }
    Ok(bytes[0])
}

fn parse_fields(raw: &[String]) -> Result<Vec<InputField>> {
    let fields = raw
        .iter()
        .map(|key| {
            InputField::parse(key.trim()).ok_or_else(|| {
                let known: Vec<&str> = InputField::TYPED
                    .iter()
                    .map(|field| field.key())
                    .chain([InputField::Seq.key()])
                    .collect();
                anyhow!("unknown field {key:?}; use one of: {}", known.join(", "))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    validate_fields(&fields)?;
    Ok(fields)
}

fn validate_log_level(raw: &str) -> Result<()> {
    if LOG_LEVELS.contains(&raw.trim().to_ascii_lowercase().as_str()) {
        return Ok(());
    }
    bail!(
        "unknown log level {raw:?}; use one of: {}",
        LOG_LEVELS.join(", ")
    )
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        let secs = mins
            .checked_mul(60)
            .ok_or_else(|| anyhow!("invalid timeout duration {raw:?}; value is too large"))?;
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 30s)")
}
