// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub fn build_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives.trim())
        .with_context(|| format!("invalid log filter {directives:?}; use a level such as info or debug"))
}

/// Appends formatted events to `path`; the terminal belongs to the table view.
pub fn init(directives: &str, path: &Path) -> Result<()> {
    let filter = build_filter(directives)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}; set log.path to a writable file", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))
}
