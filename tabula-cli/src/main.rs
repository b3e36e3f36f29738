mod cli;
mod paths;

use std::error::Error;
use std::fs;
use std::fs::File;
use std::path::Path;

use clap::Parser;
use simplelog::ColorChoice;
use simplelog::CombinedLogger;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::SharedLogger;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;
use tabula_lib::load::FetchOutcome;
use tabula_lib::load::RetryConfig;
use tabula_lib::load::fetch_fn_sync;
use tabula_lib::model::Column;
use tabula_lib::model::Row;
use tabula_lib::model::rows_from_json;
use tabula_lib::Table;
use tabula_lib::TableOptions;
use tabula_lib::ViewMode;

use cli::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("Error: failed to initialize logger: {}", e);
    }

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(args: &Args) -> Result<(), Box<dyn Error>> {
    let term_level = if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        term_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ));

    if let Some(path) = args.log_file.clone().or_else(paths::log_file) {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        loggers.push(WriteLogger::new(
            LevelFilter::Debug,
            Config::default(),
            File::create(path)?,
        ));
    }

    CombinedLogger::init(loggers)?;
    Ok(())
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let options = build_options(&args)?;
    let rows = rows_from_json(&fs::read_to_string(&args.path)?)?;
    log::debug!("Read {} rows from {}", rows.len(), args.path.display());

    let columns = build_columns(&rows, &args.sorter);
    let mut table = Table::new(options).with_columns(columns);

    if table.options().view_mode.is_progressive() {
        load_progressively(&mut table, rows, args.chunk_size).await;
    } else {
        table = table.with_data(rows);
    }

    table.set_sort(args.sort);
    for filter in args.filter {
        table.add_filter(filter);
    }
    if let Some(page) = args.page
        && !table.set_page(page)
    {
        log::warn!("Page {} is out of range 1..={}", page, table.total_pages());
    }
    table.select_rows(args.select);

    println!("{}", serde_json::to_string_pretty(&table.visible_rows())?);
    if table.options().view_mode.is_paginated() {
        println!("{}", table.page_info().counter_text(args.counter.into()));
    }

    let selected = table.selected_ids();
    if !selected.is_empty() {
        let ids: Vec<String> = selected.iter().map(ToString::to_string).collect();
        println!("Selected: {}", ids.join(", "));
    }
    Ok(())
}

/// Options from `--options`, the user config file, or defaults, with
/// command-line flags applied on top.
fn build_options(args: &Args) -> Result<TableOptions, Box<dyn Error>> {
    let mut options = match args.options.clone().or_else(default_options_file) {
        Some(path) => load_options(&path)?,
        None => TableOptions::default(),
    };

    if let Some(field) = &args.index_field {
        options = options.with_index_field(field.as_str());
    }
    if let Some(size) = args.page_size {
        options = options.with_view_mode(ViewMode::Paginated).with_page_size(size);
    }
    if args.page.is_some() && options.view_mode == ViewMode::All {
        options = options.with_view_mode(ViewMode::Paginated);
    }
    if args.progressive {
        options = options.with_view_mode(ViewMode::Progressive);
    }
    if args.retries > 0 {
        options = options.with_retry(RetryConfig::default().max_retries(args.retries));
    }
    Ok(options)
}

fn default_options_file() -> Option<std::path::PathBuf> {
    paths::options_file().filter(|path| path.exists())
}

fn load_options(path: &Path) -> Result<TableOptions, Box<dyn Error>> {
    log::debug!("Loading options from {}", path.display());
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Columns guessed from the first row, with `--sorter` overrides.
fn build_columns(rows: &[Row], sorters: &[(String, String)]) -> Vec<Column> {
    let mut columns = rows.first().map(Column::from_row).unwrap_or_default();
    for (field, sorter) in sorters {
        match columns.iter_mut().find(|column| column.field() == field.as_str()) {
            Some(column) => *column = column.clone().sorter(sorter.as_str()),
            None => columns.push(Column::new(field.as_str()).sorter(sorter.as_str())),
        }
    }
    columns
}

/// Serves `rows` in chunks through the progressive loader until exhausted.
///
/// The first chunk is the initial data; the loader then asks for page 2
/// onwards.
async fn load_progressively(table: &mut Table, rows: Vec<Row>, chunk_size: usize) {
    let mut chunks = rows
        .chunks(chunk_size.max(1))
        .map(<[Row]>::to_vec)
        .collect::<Vec<_>>()
        .into_iter();

    table.set_rows(chunks.next().unwrap_or_default());

    let rest: Vec<Vec<Row>> = chunks.collect();
    table.set_fetcher(fetch_fn_sync(move |page| {
        let chunk = page.checked_sub(2).and_then(|i| rest.get(i));
        FetchOutcome::from_rows(chunk.cloned().unwrap_or_default())
    }));

    while table.load_more_data().await > 0 {
        log::debug!("Loaded through page {}", table.cursor_page());
    }
}
