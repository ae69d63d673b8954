// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use url::Url;

pub const DEFAULT_LINK_TEMPLATE: &str =
    "https://www.ensembl.org/Homo_sapiens/Gene/Summary?db=core;g={id}";

const ID_PLACEHOLDER: &str = "{id}";

/// Builds gene-browser URLs by substituting the gene ID into a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneLinker {
    template: String,
}

impl GeneLinker {
    pub fn new(template: &str) -> Result<Self> {
        let template = template.trim();
        if !template.contains(ID_PLACEHOLDER) {
            bail!("link template {template:?} must contain {ID_PLACEHOLDER}");
        }
        Url::parse(&template.replace(ID_PLACEHOLDER, "ENSG00000000003"))
            .with_context(|| format!("link template {template:?} is not a valid URL"))?;
        Ok(Self {
            template: template.to_owned(),
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn link(&self, gene_id: &str) -> String {
        self.template.replace(ID_PLACEHOLDER, gene_id)
    }
}

impl Default for GeneLinker {
    fn default() -> Self {
        Self {
            template: DEFAULT_LINK_TEMPLATE.to_owned(),
        }
    }
}
