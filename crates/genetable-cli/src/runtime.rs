// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use genetable_data::{DataSource, Fetcher, GeneLinker, export_archive};
use genetable_tui::ExportSummary;
use std::path::{Path, PathBuf};
use tracing::info;

const FALLBACK_ARCHIVE_NAME: &str = "genetable-archive.zip";

pub struct DataRuntime {
    fetcher: Fetcher,
    linker: GeneLinker,
    archive: DataSource,
    export_dir: PathBuf,
}

impl DataRuntime {
    pub fn new(fetcher: Fetcher, linker: GeneLinker, archive: DataSource, export_dir: &Path) -> Self {
        Self {
            fetcher,
            linker,
            archive,
            export_dir: export_dir.to_path_buf(),
        }
    }

    pub fn export_destination(&self) -> PathBuf {
        let name = self
            .archive
            .file_name()
            .unwrap_or_else(|| FALLBACK_ARCHIVE_NAME.to_owned());
        self.export_dir.join(name)
    }
}

impl genetable_tui::AppRuntime for DataRuntime {
    fn gene_link(&self, gene_id: &str) -> String {
        self.linker.link(gene_id)
    }

    fn export_archive(&mut self) -> Result<ExportSummary> {
        let path = self.export_destination();
        let bytes = export_archive(&self.fetcher, &self.archive, &path)?;
        info!(archive = %self.archive, path = %path.display(), bytes, "archive exported");
        Ok(ExportSummary { path, bytes })
    }
}
