// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use genetable_app::{Column, ColumnKind, InputField, Record};

pub const DEFAULT_HEADER_LINES: usize = 3;
pub const DEFAULT_DELIMITER: u8 = b',';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub header_lines: usize,
    pub delimiter: u8,
    /// Meaning of each field of a line, in order.
    pub fields: Vec<InputField>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            header_lines: DEFAULT_HEADER_LINES,
            delimiter: DEFAULT_DELIMITER,
            fields: InputField::GENES_CSV.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    FieldCount { expected: usize, found: usize },
    EmptyField(Column),
    InvalidNumber { column: Column, value: String },
    InvalidSeq(String),
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldCount { expected, found } => {
                write!(f, "expected {expected} fields, found {found}")
            }
            Self::EmptyField(column) => write!(f, "{} must not be empty", column.key()),
            Self::InvalidNumber { column, value } => {
                write!(f, "{} is not a number: {value:?}", column.key())
            }
            Self::InvalidSeq(value) => write!(
                f,
                "seq is not a row number: {value:?}; check source.fields against the file"
            ),
        }
    }
}

impl std::error::Error for RecordError {}

/// Checks that a layout names every required column exactly once.
pub fn validate_fields(fields: &[InputField]) -> Result<()> {
    for (index, field) in fields.iter().enumerate() {
        if fields[..index].contains(field) {
            bail!("field {} is listed twice", field.key());
        }
    }

    let missing: Vec<&str> = Column::ALL
        .into_iter()
        .filter(|column| {
            matches!(column, Column::Chromosome | Column::GeneId)
                || column.kind() == ColumnKind::Number
        })
        .filter(|column| !fields.contains(&InputField::Value(*column)))
        .map(Column::key)
        .collect();
    if !missing.is_empty() {
        bail!("fields must include {}", missing.join(", "));
    }
    Ok(())
}

/// Parses the whole body or nothing: the first bad line aborts the load.
pub fn parse_records(text: &str, options: &ParseOptions) -> Result<Vec<Record>> {
    validate_fields(&options.fields)?;

    let trimmed = text.trim();
    let leading_lines = text[..text.len() - text.trim_start().len()]
        .matches('\n')
        .count();
    let body = skip_lines(trimmed, options.header_lines);
    let line_offset = leading_lines + options.header_lines;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|error| {
            let line = error
                .position()
                .map_or(0, |position| position.line() as usize);
            anyhow!("line {}: malformed delimited text: {error}", line + line_offset)
        })?;
        let line = row.position().map_or(0, |position| position.line() as usize) + line_offset;
        let record = parse_row(&row, &options.fields).with_context(|| format!("line {line}"))?;
        records.push(record);
    }

    if records.is_empty() {
        bail!(
            "no records after {} header line(s); check source.header_lines",
            options.header_lines
        );
    }
    Ok(records)
}

fn skip_lines(text: &str, count: usize) -> &str {
    let mut rest = text;
    for _ in 0..count {
        match rest.find('\n') {
            Some(index) => rest = &rest[index + 1..],
            None => return "",
        }
    }
    rest
}

fn parse_row(
    row: &csv::StringRecord,
    fields: &[InputField],
) -> std::result::Result<Record, RecordError> {
    if row.len() != fields.len() {
        return Err(RecordError::FieldCount {
            expected: fields.len(),
            found: row.len(),
        });
    }

    let mut record = Record::default();
    for (field, value) in fields.iter().zip(row.iter()) {
        match field {
            InputField::Seq => {
                let seq = value
                    .parse::<u64>()
                    .map_err(|_| RecordError::InvalidSeq(value.to_owned()))?;
                record.seq = Some(seq);
            }
            InputField::Value(column) => assign(&mut record, *column, value)?,
        }
    }
    Ok(record)
}

fn assign(record: &mut Record, column: Column, value: &str) -> std::result::Result<(), RecordError> {
    let required = || {
        if value.is_empty() {
            return Err(RecordError::EmptyField(column));
        }
        Ok(value.to_owned())
    };
    let number = || match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(RecordError::InvalidNumber {
            column,
            value: value.to_owned(),
        }),
    };

    match column {
        Column::Chromosome => record.chromosome = required()?,
        Column::GeneId => record.gene_id = required()?,
        Column::GeneName => record.gene_name = value.to_owned(),
        Column::GeneType => record.gene_type = value.to_owned(),
        Column::Transcripts => record.transcripts = number()?,
        Column::MergedLength => record.merged_length = number()?,
        Column::MeanLength => record.mean_length = number()?,
        Column::MedianLength => record.median_length = number()?,
        Column::MaxLength => record.max_length = number()?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ParseOptions, RecordError, parse_records, validate_fields};
    use anyhow::Result;
    use genetable_app::{Column, InputField};

    const HEADER: &str = "# gene length database\n# GRCh38\nchromosome,gene_id,gene_name,gene_type,transcripts,merged,mean,median,max\n";

    fn with_header(body: &str) -> String {
        format!("{HEADER}{body}")
    }

    fn typed() -> ParseOptions {
        ParseOptions {
            fields: InputField::TYPED.to_vec(),
            ..ParseOptions::default()
        }
    }

    #[test]
    fn published_shape_reads_row_number_first() -> Result<()> {
        let text = "h1\nh2\nh3\n1,chr1,ENSG00000186092,OR4F5,3,2618,1581.3,918,2618\n\
                    2,chr1,ENSG00000284733,OR4F29,1,939,939,939,939\n";
        let records = parse_records(text, &ParseOptions::default())?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].seq, Some(1));
        assert_eq!(records[0].chromosome, "chr1");
        assert_eq!(records[0].gene_id, "ENSG00000186092");
        assert_eq!(records[0].gene_name, "OR4F5");
        assert_eq!(records[0].gene_type, "");
        assert_eq!(records[0].transcripts, 3.0);
        assert_eq!(records[0].mean_length, 1581.3);
        assert_eq!(records[1].seq, Some(2));
        Ok(())
    }

    #[test]
    fn typed_row_under_published_layout_is_rejected() {
        let text = with_header("chr17,ENSG00000012048,BRCA1,protein_coding,37,7088,2541.5,1930,7088\n");
        let error = parse_records(&text, &ParseOptions::default())
            .expect_err("shifted columns should fail");
        assert!(error.to_string().contains("line 4"), "got {error:#}");
        assert_eq!(
            error.downcast_ref::<RecordError>(),
            Some(&RecordError::InvalidSeq("chr17".to_owned()))
        );
    }

    #[test]
    fn parses_rows_after_header_lines() -> Result<()> {
        let text = with_header(
            "chr17,ENSG00000012048,BRCA1,protein_coding,37,7088,2541.5,1930,7088\n\
             chrX,ENSG00000229807,XIST,lncRNA,15,32000,4000,3500,19000\n",
        );
        let records = parse_records(&text, &typed())?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].seq, None);
        assert_eq!(records[0].gene_name, "BRCA1");
        assert_eq!(records[0].mean_length, 2541.5);
        assert_eq!(records[1].chromosome, "chrX");
        assert_eq!(records[1].gene_type, "lncRNA");
        Ok(())
    }

    #[test]
    fn quoted_fields_and_padding_are_accepted() -> Result<()> {
        let text = with_header("chr1, ENSG1 ,\"FAM, member\",misc_RNA,1,2,3,4,5\n\n");
        let records = parse_records(&text, &typed())?;
        assert_eq!(records[0].gene_id, "ENSG1");
        assert_eq!(records[0].gene_name, "FAM, member");
        Ok(())
    }

    #[test]
    fn custom_delimiter_and_header_count() -> Result<()> {
        let options = ParseOptions {
            header_lines: 1,
            delimiter: b'\t',
            ..typed()
        };
        let text = "header\nchr2\tENSG2\tMYCN\tprotein_coding\t4\t6500\t3000\t2800\t6500\n";
        let records = parse_records(text, &options)?;
        assert_eq!(records[0].merged_length, 6500.0);
        Ok(())
    }

    #[test]
    fn custom_field_order_is_honored() -> Result<()> {
        let mut fields = vec![InputField::Value(Column::GeneId), InputField::Seq];
        fields.extend(InputField::TYPED.into_iter().filter(|field| {
            *field != InputField::Value(Column::GeneId)
        }));
        let options = ParseOptions {
            header_lines: 0,
            fields,
            ..ParseOptions::default()
        };
        let records = parse_records("ENSG7,7,chr7,CFTR,rRNA,1,2,3,4,5\n", &options)?;
        assert_eq!(records[0].gene_id, "ENSG7");
        assert_eq!(records[0].seq, Some(7));
        assert_eq!(records[0].chromosome, "chr7");
        assert_eq!(records[0].gene_type, "rRNA");
        assert_eq!(records[0].max_length, 5.0);
        Ok(())
    }

    #[test]
    fn non_numeric_measure_aborts_load_with_line_number() {
        let text = with_header(
            "chr1,ENSG1,A,protein_coding,1,2,3,4,5\n\
             chr1,ENSG2,B,protein_coding,1,lots,3,4,5\n",
        );
        let error = parse_records(&text, &typed()).expect_err("non-numeric length should fail");
        assert!(error.to_string().contains("line 5"), "got {error:#}");
        assert_eq!(
            error.downcast_ref::<RecordError>(),
            Some(&RecordError::InvalidNumber {
                column: Column::MergedLength,
                value: "lots".to_owned(),
            })
        );
    }

    #[test]
    fn field_count_mismatch_is_rejected() {
        let text = with_header("1,chr1,ENSG1,A,protein_coding,1,2,3,4,5\n");
        let error = parse_records(&text, &ParseOptions::default())
            .expect_err("extra column should fail");
        assert!(
            format!("{error:#}").contains("expected 9 fields, found 10"),
            "got {error:#}"
        );
    }

    #[test]
    fn infinite_values_are_not_numbers() {
        let text = with_header("chr1,ENSG1,A,protein_coding,inf,2,3,4,5\n");
        let error = parse_records(&text, &typed()).expect_err("infinite count should fail");
        assert!(matches!(
            error.downcast_ref::<RecordError>(),
            Some(RecordError::InvalidNumber {
                column: Column::Transcripts,
                ..
            })
        ));
    }

    #[test]
    fn missing_identifier_is_rejected() {
        let text = with_header("1,chr1,,A,1,2,3,4,5\n");
        let error = parse_records(&text, &ParseOptions::default())
            .expect_err("empty gene id should fail");
        assert_eq!(
            error.downcast_ref::<RecordError>(),
            Some(&RecordError::EmptyField(Column::GeneId))
        );
    }

    #[test]
    fn header_only_input_is_an_error() {
        let error = parse_records(HEADER, &ParseOptions::default())
            .expect_err("no data rows should fail");
        assert!(error.to_string().contains("no records"));
    }

    #[test]
    fn leading_blank_lines_shift_reported_line() {
        let text = format!("\n\n{}", with_header("chr1,ENSG1,A,t,x,2,3,4,5\n"));
        let error = parse_records(&text, &typed()).expect_err("bad count should fail");
        assert!(error.to_string().contains("line 6"), "got {error:#}");
    }

    #[test]
    fn layout_must_cover_required_columns_once() {
        assert!(validate_fields(&InputField::GENES_CSV).is_ok());
        assert!(validate_fields(&InputField::TYPED).is_ok());

        let error = validate_fields(&InputField::GENES_CSV[..8])
            .expect_err("missing max_length should fail");
        assert!(error.to_string().contains("max_length"), "got {error}");

        let mut doubled = InputField::TYPED.to_vec();
        doubled.push(InputField::Value(Column::GeneName));
        let error = validate_fields(&doubled).expect_err("duplicate field should fail");
        assert!(error.to_string().contains("gene_name is listed twice"));

        let options = ParseOptions {
            fields: Vec::new(),
            ..ParseOptions::default()
        };
        assert!(parse_records("a\nb\nc\n1,chr1,G,N,1,2,3,4,5\n", &options).is_err());
    }
}
