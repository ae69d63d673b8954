// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Dataset, Record};

pub(crate) fn gene(chromosome: &str, gene_id: &str, gene_name: &str, merged_length: f64) -> Record {
    Record {
        seq: None,
        chromosome: chromosome.to_owned(),
        gene_id: gene_id.to_owned(),
        gene_name: gene_name.to_owned(),
        gene_type: "protein_coding".to_owned(),
        transcripts: 1.0,
        merged_length,
        mean_length: merged_length / 2.0,
        median_length: merged_length / 2.0,
        max_length: merged_length,
    }
}

pub(crate) fn typed(mut record: Record, gene_type: &str) -> Record {
    record.gene_type = gene_type.to_owned();
    record
}

pub(crate) fn small_dataset() -> Dataset {
    Dataset::new(vec![
        gene("chr1", "ENSG0001", "TP73", 80_000.0),
        gene("chr2", "ENSG0002", "MYCN", 6_500.0),
        gene("chr1", "ENSG0003", "GNB1", 70_000.0),
        typed(gene("chrX", "ENSG0004", "XIST", 32_000.0), "lncRNA"),
        gene("chr17", "ENSG001", "BRCA1", 125_000.0),
        gene("chr1", "ENSG0005", "mir-34a", 110.0),
        typed(gene("chrM", "ENSG0006", "MT-ND1", 956.0), "Mt_protein_coding"),
        gene("chr2", "ENSG0007", "BRCA2-AS", 2_100.0),
    ])
}

/// `count` genes on one chromosome with distinct merged lengths.
pub(crate) fn numbered(chromosome: &str, count: usize) -> Dataset {
    Dataset::new(
        (0..count)
            .map(|index| {
                gene(
                    chromosome,
                    &format!("ENSG{index:08}"),
                    &format!("GENE{index}"),
                    ((index * 37) % count) as f64 + index as f64 / 1_000.0,
                )
            })
            .collect(),
    )
}
