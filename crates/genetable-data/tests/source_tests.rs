// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use genetable_app::InputField;
use genetable_data::{DataSource, Fetcher, ParseOptions, export_archive, load_dataset};
use genetable_testkit::{GeneFaker, temp_dataset_path, to_csv, to_delimited};
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Response, Server};

fn serve_once(status: u16, body: Vec<u8>) -> Result<(String, thread::JoinHandle<String>)> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        let url = request.url().to_owned();
        let response = Response::from_data(body)
            .with_status_code(status)
            .with_header(
                Header::from_bytes("Content-Type", "text/csv").expect("valid content type header"),
            );
        request.respond(response).expect("response should succeed");
        url
    });
    Ok((addr, handle))
}

#[test]
fn loads_dataset_over_http() -> Result<()> {
    let records = GeneFaker::new(11).genome(3);
    let text = to_delimited(&records, 3, b',', &InputField::TYPED)?;
    let (addr, handle) = serve_once(200, text.into_bytes())?;

    let fetcher = Fetcher::new(Duration::from_secs(2))?;
    let source = DataSource::parse(&format!("{addr}/database/genes.csv"))?;
    let options = ParseOptions {
        fields: InputField::TYPED.to_vec(),
        ..ParseOptions::default()
    };
    let dataset = load_dataset(&fetcher, &source, &options)?;

    assert_eq!(dataset.records(), records.as_slice());
    assert_eq!(dataset.groups().first().map(String::as_str), Some("chr1"));
    assert_eq!(dataset.groups().last().map(String::as_str), Some("All"));
    assert_eq!(
        handle.join().expect("server thread should join"),
        "/database/genes.csv"
    );
    Ok(())
}

#[test]
fn http_error_status_fails_the_load() -> Result<()> {
    let (addr, handle) = serve_once(404, b"not found".to_vec())?;

    let fetcher = Fetcher::new(Duration::from_secs(2))?;
    let source = DataSource::parse(&format!("{addr}/genes.csv"))?;
    let error = load_dataset(&fetcher, &source, &ParseOptions::default())
        .expect_err("404 should fail the load");
    assert!(error.to_string().contains("404"), "got {error:#}");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn unreachable_host_names_the_network() -> Result<()> {
    let fetcher = Fetcher::new(Duration::from_millis(200))?;
    let source = DataSource::parse("http://127.0.0.1:1/genes.csv")?;
    let error = load_dataset(&fetcher, &source, &ParseOptions::default())
        .expect_err("unreachable host should fail");
    assert!(error.to_string().contains("check the network"), "got {error:#}");
    Ok(())
}

#[test]
fn loads_dataset_from_file() -> Result<()> {
    let records = GeneFaker::new(5).genome(2);
    let (_dir, path) = temp_dataset_path(&to_csv(&records)?)?;

    let fetcher = Fetcher::new(Duration::from_secs(1))?;
    let dataset = load_dataset(
        &fetcher,
        &DataSource::File(path),
        &ParseOptions::default(),
    )?;
    assert_eq!(dataset.len(), records.len());
    let first = &dataset.records()[0];
    assert_eq!(first.seq, Some(1));
    assert_eq!(first.chromosome, records[0].chromosome);
    assert_eq!(first.gene_id, records[0].gene_id);
    assert_eq!(first.max_length, records[0].max_length);
    Ok(())
}

#[test]
fn one_bad_row_discards_the_whole_file() -> Result<()> {
    let records = GeneFaker::new(5).genome(1);
    let mut text = to_csv(&records)?;
    text.push_str("999,chr1,ENSG99,BROKEN,many,1,1,1,1\n");
    let (_dir, path) = temp_dataset_path(&text)?;

    let fetcher = Fetcher::new(Duration::from_secs(1))?;
    let error = load_dataset(
        &fetcher,
        &DataSource::File(path),
        &ParseOptions::default(),
    )
    .expect_err("malformed row should fail the load");
    let message = format!("{error:#}");
    assert!(message.contains("transcripts"), "got {message}");
    assert!(
        message.contains(&format!("line {}", records.len() + 4)),
        "got {message}"
    );
    Ok(())
}

#[test]
fn missing_file_reports_path() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("absent.csv");
    let fetcher = Fetcher::new(Duration::from_secs(1))?;
    let error = load_dataset(
        &fetcher,
        &DataSource::File(path.clone()),
        &ParseOptions::default(),
    )
    .expect_err("missing file should fail");
    assert!(error.to_string().contains(&path.display().to_string()));
    Ok(())
}

#[test]
fn export_copies_archive_bytes() -> Result<()> {
    let payload: Vec<u8> = (0u8..=255).cycle().take(4096).collect();
    let (addr, handle) = serve_once(200, payload.clone())?;

    let dir = tempfile::tempdir()?;
    let destination = dir.path().join("nested").join("gene_length_database.zip");
    let fetcher = Fetcher::new(Duration::from_secs(2))?;
    let archive = DataSource::parse(&format!("{addr}/gene_length_database.zip"))?;
    let written = export_archive(&fetcher, &archive, &destination)?;

    assert_eq!(written, payload.len() as u64);
    assert_eq!(std::fs::read(&destination)?, payload);
    handle.join().expect("server thread should join");
    Ok(())
}
