// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

/// Group selection that disables the group filter.
pub const ALL_GROUPS: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Chromosome,
    GeneId,
    GeneName,
    GeneType,
    Transcripts,
    MergedLength,
    MeanLength,
    MedianLength,
    MaxLength,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
}

impl Column {
    /// Field order of one input line.
    pub const ALL: [Self; 9] = [
        Self::Chromosome,
        Self::GeneId,
        Self::GeneName,
        Self::GeneType,
        Self::Transcripts,
        Self::MergedLength,
        Self::MeanLength,
        Self::MedianLength,
        Self::MaxLength,
    ];

    pub const SEARCHABLE: [Self; 3] = [Self::GeneId, Self::GeneName, Self::GeneType];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Chromosome => "chromosome",
            Self::GeneId => "gene_id",
            Self::GeneName => "gene_name",
            Self::GeneType => "gene_type",
            Self::Transcripts => "transcripts",
            Self::MergedLength => "merged_length",
            Self::MeanLength => "mean_length",
            Self::MedianLength => "median_length",
            Self::MaxLength => "max_length",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|column| column.key() == value)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Chromosome => "chr",
            Self::GeneId => "gene id",
            Self::GeneName => "name",
            Self::GeneType => "type",
            Self::Transcripts => "transcripts",
            Self::MergedLength => "merged",
            Self::MeanLength => "mean",
            Self::MedianLength => "median",
            Self::MaxLength => "max",
        }
    }

    pub const fn kind(self) -> ColumnKind {
        match self {
            Self::Chromosome | Self::GeneId | Self::GeneName | Self::GeneType => ColumnKind::Text,
            Self::Transcripts
            | Self::MergedLength
            | Self::MeanLength
            | Self::MedianLength
            | Self::MaxLength => ColumnKind::Number,
        }
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|column| *column == self)
            .unwrap_or(0)
    }
}

/// One position of an input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    /// Row number carried by the source file.
    Seq,
    Value(Column),
}

impl InputField {
    /// Shape of the published gene length database: row number first, no type tag.
    pub const GENES_CSV: [Self; 9] = [
        Self::Seq,
        Self::Value(Column::Chromosome),
        Self::Value(Column::GeneId),
        Self::Value(Column::GeneName),
        Self::Value(Column::Transcripts),
        Self::Value(Column::MergedLength),
        Self::Value(Column::MeanLength),
        Self::Value(Column::MedianLength),
        Self::Value(Column::MaxLength),
    ];

    /// Every column in display order, without a row number.
    pub const TYPED: [Self; 9] = [
        Self::Value(Column::Chromosome),
        Self::Value(Column::GeneId),
        Self::Value(Column::GeneName),
        Self::Value(Column::GeneType),
        Self::Value(Column::Transcripts),
        Self::Value(Column::MergedLength),
        Self::Value(Column::MeanLength),
        Self::Value(Column::MedianLength),
        Self::Value(Column::MaxLength),
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Seq => "seq",
            Self::Value(column) => column.key(),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        if value == Self::Seq.key() {
            return Some(Self::Seq);
        }
        Column::parse(value).map(Self::Value)
    }
}

/// One gene, as read from a single input line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
    pub chromosome: String,
    pub gene_id: String,
    pub gene_name: String,
    pub gene_type: String,
    pub transcripts: f64,
    pub merged_length: f64,
    pub mean_length: f64,
    pub median_length: f64,
    pub max_length: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Text(&'a str),
    Number(f64),
}

impl CellValue<'_> {
    pub fn display(self) -> String {
        match self {
            Self::Text(value) => value.to_owned(),
            Self::Number(value) if value.fract() == 0.0 => format!("{value:.0}"),
            Self::Number(value) => format!("{value:.1}"),
        }
    }
}

impl Record {
    pub fn value(&self, column: Column) -> CellValue<'_> {
        match column {
            Column::Chromosome => CellValue::Text(&self.chromosome),
            Column::GeneId => CellValue::Text(&self.gene_id),
            Column::GeneName => CellValue::Text(&self.gene_name),
            Column::GeneType => CellValue::Text(&self.gene_type),
            Column::Transcripts => CellValue::Number(self.transcripts),
            Column::MergedLength => CellValue::Number(self.merged_length),
            Column::MeanLength => CellValue::Number(self.mean_length),
            Column::MedianLength => CellValue::Number(self.median_length),
            Column::MaxLength => CellValue::Number(self.max_length),
        }
    }

    pub fn text(&self, column: Column) -> Option<&str> {
        match self.value(column) {
            CellValue::Text(value) => Some(value),
            CellValue::Number(_) => None,
        }
    }

    pub fn number(&self, column: Column) -> Option<f64> {
        match self.value(column) {
            CellValue::Number(value) => Some(value),
            CellValue::Text(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CellValue, Column, ColumnKind, InputField, Record};

    fn sample() -> Record {
        Record {
            seq: Some(1),
            chromosome: "chr17".to_owned(),
            gene_id: "ENSG00000012048".to_owned(),
            gene_name: "BRCA1".to_owned(),
            gene_type: "protein_coding".to_owned(),
            transcripts: 37.0,
            merged_length: 7_088.0,
            mean_length: 2_541.5,
            median_length: 1_930.0,
            max_length: 7_088.0,
        }
    }

    #[test]
    fn declared_kind_matches_record_value() {
        let record = sample();
        for column in Column::ALL {
            let matches = matches!(
                (column.kind(), record.value(column)),
                (ColumnKind::Text, CellValue::Text(_)) | (ColumnKind::Number, CellValue::Number(_))
            );
            assert!(matches, "column {} has mismatched kind", column.key());
        }
    }

    #[test]
    fn keys_round_trip_through_parse() {
        for column in Column::ALL {
            assert_eq!(Column::parse(column.key()), Some(column));
        }
        assert_eq!(Column::parse("seq"), None);
    }

    #[test]
    fn input_fields_parse_seq_and_column_keys() {
        assert_eq!(InputField::parse("seq"), Some(InputField::Seq));
        assert_eq!(
            InputField::parse("gene_type"),
            Some(InputField::Value(Column::GeneType))
        );
        assert_eq!(InputField::parse("type"), None);
        for field in InputField::GENES_CSV {
            assert_eq!(InputField::parse(field.key()), Some(field));
        }
    }

    #[test]
    fn published_layout_has_row_number_and_no_type_tag() {
        assert_eq!(InputField::GENES_CSV[0], InputField::Seq);
        assert_eq!(
            InputField::GENES_CSV[1],
            InputField::Value(Column::Chromosome)
        );
        assert!(!InputField::GENES_CSV.contains(&InputField::Value(Column::GeneType)));
        let typed: Vec<Column> = InputField::TYPED
            .iter()
            .filter_map(|field| match field {
                InputField::Value(column) => Some(*column),
                InputField::Seq => None,
            })
            .collect();
        assert_eq!(typed, Column::ALL);
    }

    #[test]
    fn index_follows_input_order() {
        assert_eq!(Column::Chromosome.index(), 0);
        assert_eq!(Column::GeneType.index(), 3);
        assert_eq!(Column::MaxLength.index(), 8);
    }

    #[test]
    fn numbers_display_without_noise() {
        let record = sample();
        assert_eq!(record.value(Column::Transcripts).display(), "37");
        assert_eq!(record.value(Column::MeanLength).display(), "2541.5");
        assert_eq!(record.value(Column::GeneName).display(), "BRCA1");
    }

    #[test]
    fn typed_accessors_reject_other_kind() {
        let record = sample();
        assert_eq!(record.text(Column::GeneId), Some("ENSG00000012048"));
        assert_eq!(record.text(Column::MaxLength), None);
        assert_eq!(record.number(Column::MergedLength), Some(7_088.0));
        assert_eq!(record.number(Column::Chromosome), None);
    }
}
