// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod query;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use genetable_app::{Column, Dataset, LoadState, Session};
use genetable_data::{DataSource, Fetcher, export_archive, load_dataset};
use query::QueryOptions;
use runtime::DataRuntime;
use std::env;
use std::path::PathBuf;
use tracing::info;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `genetable --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    logging::init(&config.log_level(), &config.log_path()?)?;

    let fetcher = Fetcher::new(config.timeout()?).with_context(|| {
        format!(
            "invalid [source] config in {}; fix the timeout value",
            options.config_path.display()
        )
    })?;
    let linker = config.linker()?;
    let archive = config.archive_source()?;

    if let Some(destination) = &options.export {
        let bytes = export_archive(&fetcher, &archive, destination).with_context(|| {
            format!("export {archive}; set [source].archive to a reachable path or URL")
        })?;
        println!("exported {bytes} bytes to {}", destination.display());
        return Ok(());
    }

    let (label, loaded) = if options.demo {
        let records = genetable_testkit::demo_records();
        ("demo".to_owned(), Ok(Dataset::new(records)))
    } else {
        let source = match &options.dataset {
            Some(raw) => DataSource::parse(raw)?,
            None => config.dataset_source()?,
        };
        let parse_options = config.parse_options()?;
        let result = load_dataset(&fetcher, &source, &parse_options).with_context(|| {
            format!(
                "load dataset {source} -- set [source].dataset or GENETABLE_DATASET, or try --demo"
            )
        });
        (source.to_string(), result)
    };
    let load = LoadState::from_result(loaded.map(|dataset| {
        Session::new(dataset, config.page_size(), config.default_group())
    }));
    let mut session = load.into_session()?;
    if !options.query.is_empty() {
        info!(query = ?options.query, "applying initial view");
        query::apply_query(&mut session, &options.query)?;
    }

    if options.check_only {
        println!(
            "ok: {} genes in {} groups from {label}",
            session.dataset().len(),
            session.dataset().groups().len().saturating_sub(1)
        );
        return Ok(());
    }

    if options.json {
        let output = query::query_output(&session);
        let rendered = serde_json::to_string_pretty(&output).context("render JSON output")?;
        println!("{rendered}");
        return Ok(());
    }

    info!(source = %label, genes = session.dataset().len(), "starting table view");
    let export_dir = env::current_dir().context("resolve current directory for exports")?;
    let mut runtime = DataRuntime::new(fetcher, linker, archive, &export_dir);
    genetable_tui::run_app(&mut session, &mut runtime)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    dataset: Option<String>,
    print_config_path: bool,
    print_example: bool,
    demo: bool,
    check_only: bool,
    json: bool,
    query: QueryOptions,
    export: Option<PathBuf>,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        dataset: None,
        print_config_path: false,
        print_example: false,
        demo: false,
        check_only: false,
        json: false,
        query: QueryOptions::default(),
        export: None,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--dataset" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--dataset requires a path or http(s) URL"))?;
                genetable_data::validate_source(value.as_ref())?;
                options.dataset = Some(value.as_ref().to_owned());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--json" => {
                options.json = true;
            }
            "--group" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--group requires a chromosome name or All"))?;
                options.query.group = Some(value.as_ref().to_owned());
            }
            "--search" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--search requires a search term"))?;
                options.query.search = Some(value.as_ref().to_owned());
            }
            "--sort" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--sort requires a column name"))?;
                options.query.sort = Some(parse_sort_column(value.as_ref())?);
            }
            "--desc" => {
                options.query.descending = true;
            }
            "--page" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--page requires a page number"))?;
                options.query.page = Some(parse_page(value.as_ref())?);
            }
            "--export" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--export requires a destination file path"))?;
                options.export = Some(PathBuf::from(value.as_ref()));
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    if options.query.descending && options.query.sort.is_none() {
        bail!("--desc requires --sort <column>");
    }
    if options.demo && options.dataset.is_some() {
        bail!("--demo and --dataset cannot be combined; pick one data source");
    }

    Ok(options)
}

fn parse_sort_column(raw: &str) -> Result<Column> {
    Column::parse(raw.trim()).ok_or_else(|| {
        let keys: Vec<&str> = Column::ALL.iter().map(|column| column.key()).collect();
        anyhow!(
            "unknown sort column {raw:?}; use one of: {}",
            keys.join(", ")
        )
    })
}

fn parse_page(raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(page) if page > 0 => Ok(page),
        _ => bail!("--page must be a positive integer, got {raw:?}"),
    }
}

fn print_help() {
    println!("genetable: browse gene length tables");
    println!("  --config <path>          Use a specific config path");
    println!("  --dataset <path|url>     Load this dataset instead of [source].dataset");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Browse a generated demo dataset");
    println!("  --check                  Validate config and load the dataset, then exit");
    println!("  --json                   Print one page as JSON instead of opening the table");
    println!("  --group <name>           Initial chromosome group (or All)");
    println!("  --search <text>          Initial search over gene id, name, and type");
    println!("  --sort <column>          Initial sort column, for example merged_length");
    println!("  --desc                   Sort descending (requires --sort)");
    println!("  --page <n>               Initial page, clamped to the last page");
    println!("  --export <path>          Copy the configured archive to <path> and exit");
    println!("  --help                   Show this help");
}
