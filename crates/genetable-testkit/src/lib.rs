// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use genetable_app::{CellValue, InputField, Record};
use std::path::PathBuf;

const AUTOSOMES: usize = 22;

const GENE_PREFIXES: [&str; 24] = [
    "ABCA", "ACTB", "ADAM", "AKT", "BRCA", "CDK", "CYP", "DNAJ", "EGFR", "FOX", "GATA", "HOX",
    "IL", "KRT", "MAPK", "MYO", "NOTCH", "OR", "PAX", "RAB", "SLC", "TP", "WNT", "ZNF",
];

const GENE_TYPES: [&str; 8] = [
    "protein_coding",
    "protein_coding",
    "protein_coding",
    "lncRNA",
    "processed_pseudogene",
    "miRNA",
    "snRNA",
    "misc_RNA",
];

const MITO_GENES: [&str; 13] = [
    "MT-ND1", "MT-ND2", "MT-CO1", "MT-CO2", "MT-ATP8", "MT-ATP6", "MT-CO3", "MT-ND3", "MT-ND4L",
    "MT-ND4", "MT-ND5", "MT-ND6", "MT-CYB",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn range(&mut self, min: u64, max: u64) -> u64 {
        if max <= min {
            return min;
        }
        min + self.next_u64() % (max - min + 1)
    }
}

/// Seeded generator of plausible gene rows.
#[derive(Debug, Clone)]
pub struct GeneFaker {
    rng: DeterministicRng,
    next_id: u64,
}

impl GeneFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_id: 1_000 + normalized % 1_000,
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn gene(&mut self, chromosome: &str) -> Record {
        let prefix = GENE_PREFIXES[self.rng.int_n(GENE_PREFIXES.len())];
        let name = format!("{prefix}{}", self.rng.range(1, 40));
        self.gene_named(chromosome, &name)
    }

    pub fn gene_named(&mut self, chromosome: &str, name: &str) -> Record {
        let gene_id = format!("ENSG{:011}", self.next_id);
        self.next_id += 1;

        let gene_type = GENE_TYPES[self.rng.int_n(GENE_TYPES.len())];
        let transcripts = self.rng.range(1, 40);
        let max_length = self.rng.range(80, 120_000);
        let merged_length = max_length + self.rng.range(0, max_length / 2);
        let median_length = self.rng.range(60, max_length);
        let mean_tenths = self.rng.range(median_length * 10, max_length * 10);

        Record {
            seq: None,
            chromosome: chromosome.to_owned(),
            gene_id,
            gene_name: name.to_owned(),
            gene_type: gene_type.to_owned(),
            transcripts: transcripts as f64,
            merged_length: merged_length as f64,
            mean_length: mean_tenths as f64 / 10.0,
            median_length: median_length as f64,
            max_length: max_length as f64,
        }
    }

    /// Genes spread over every chromosome, larger autosomes getting more rows.
    pub fn genome(&mut self, genes_per_chromosome: usize) -> Vec<Record> {
        let mut records = Vec::new();
        for chromosome in chromosomes() {
            if chromosome == "chrM" {
                for name in MITO_GENES {
                    records.push(self.gene_named(&chromosome, name));
                }
                continue;
            }
            let count = match chromosome.as_str() {
                "chrY" => (genes_per_chromosome / 4).max(1),
                "chrX" => genes_per_chromosome,
                other => {
                    let number: usize = other.trim_start_matches("chr").parse().unwrap_or(1);
                    (genes_per_chromosome * (AUTOSOMES + 8 - number) / (AUTOSOMES + 8)).max(1)
                }
            };
            for _ in 0..count {
                records.push(self.gene(&chromosome));
            }
        }
        records
    }
}

/// `chr1`..`chr22`, `chrX`, `chrY`, `chrM` in karyotype order.
pub fn chromosomes() -> Vec<String> {
    (1..=AUTOSOMES)
        .map(|number| format!("chr{number}"))
        .chain(["chrX", "chrY", "chrM"].map(str::to_owned))
        .collect()
}

/// Demo dataset used by `--demo`.
pub fn demo_records() -> Vec<Record> {
    GeneFaker::new(38).genome(240)
}

/// Renders records in `fields` order, preceded by `header_lines` lines.
/// Records without a row number get their 1-based position.
pub fn to_delimited(
    records: &[Record],
    header_lines: usize,
    delimiter: u8,
    fields: &[InputField],
) -> Result<String> {
    let mut text = String::new();
    if header_lines > 0 {
        for index in 1..header_lines {
            text.push_str(&format!("# genetable fixture header {index}\n"));
        }
        let keys: Vec<&str> = fields.iter().map(|field| field.key()).collect();
        text.push_str(&keys.join(&char::from(delimiter).to_string()));
        text.push('\n');
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(Vec::new());
    for (index, record) in records.iter().enumerate() {
        let values: Vec<String> = fields
            .iter()
            .map(|field| match field {
                InputField::Seq => record.seq.unwrap_or(index as u64 + 1).to_string(),
                InputField::Value(column) => match record.value(*column) {
                    CellValue::Text(value) => value.to_owned(),
                    CellValue::Number(value) => value.to_string(),
                },
            })
            .collect();
        writer
            .write_record(&values)
            .with_context(|| format!("write fixture row {}", record.gene_id))?;
    }
    let bytes = writer.into_inner().context("flush fixture writer")?;
    text.push_str(&String::from_utf8(bytes).context("fixture rows are not UTF-8")?);
    Ok(text)
}

/// Comma-separated text shaped like the published genes.csv.
pub fn to_csv(records: &[Record]) -> Result<String> {
    to_delimited(records, 3, b',', &InputField::GENES_CSV)
}

/// Writes `text` into a fresh temp dir and returns its path.
pub fn temp_dataset_path(text: &str) -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("genes.csv");
    std::fs::write(&path, text).with_context(|| format!("write {}", path.display()))?;
    Ok((dir, path))
}
