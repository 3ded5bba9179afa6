// src/main.rs
mod edgar;
mod extractors;
mod storage;
mod utils;

use clap::Parser;
use edgar::client;
use edgar::models::FilingInfo;
use extractors::{extract_html, segments, AnchorRecord, FilingSummary, HtmlContent, TableData};
use std::path::PathBuf;
use storage::StorageManager;
use utils::error::ExtractError;
use utils::{html_debug, AppError};

/// Command line interface for the filing decomposition engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ticker symbol to fetch filings for (EDGAR mode)
    #[arg(short, long, conflicts_with = "input")]
    ticker: Option<String>,

    /// Form type to select in EDGAR mode
    #[arg(long, default_value = "10-K")]
    form_type: String,

    /// Start year for the filings (optional)
    #[arg(long)]
    start_year: Option<u32>,

    /// End year for the filings (optional)
    #[arg(long)]
    end_year: Option<u32>,

    /// Local filing container file, or a directory of .txt containers
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory for extracted content
    #[arg(short, long, default_value = "./output")]
    output_dir: String,

    /// Debug mode - save raw and annotated HTML for each processed section
    #[arg(short, long)]
    debug: bool,
}

enum WorkItem {
    Remote(FilingInfo),
    Local(PathBuf),
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Initialize storage
    let storage = StorageManager::new(&args.output_dir)?;

    // 4. Build the worklist (local containers or EDGAR lookups)
    let work = build_worklist(&args).await?;
    if work.is_empty() {
        return Err(AppError::Config(
            "No filings to process for the given arguments".to_string(),
        ));
    }

    // 5. Process each filing; one bad filing never stops the run
    let mut success_count = 0;
    let mut failure_count = 0;

    for item in work {
        let (stem, source, content) = match load_item(&item).await {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::error!("Failed to load filing: {}", e);
                failure_count += 1;
                continue;
            }
        };
        tracing::info!("Processing filing '{}' ({} bytes)", stem, content.len());

        match process_filing(&content, &stem, &source, &storage, args.debug) {
            Ok(summary) => {
                tracing::info!(
                    "Processed '{}': {} section(s), {} HTML, {} anchor(s), {} table(s)",
                    stem,
                    summary.section_count,
                    summary.html_sections,
                    summary.anchor_count,
                    summary.table_count
                );
                if !summary.matches_form(&args.form_type) {
                    tracing::debug!(
                        "Filing '{}' declares no section of form type {}",
                        stem,
                        args.form_type
                    );
                }
                success_count += 1;
            }
            Err(e) => {
                tracing::error!("Failed to process filing '{}': {}", stem, e);
                failure_count += 1;
            }
        }
    }

    tracing::info!(
        "Processing finished. Success: {}, Failures: {}",
        success_count,
        failure_count
    );

    if success_count == 0 && failure_count > 0 {
        return Err(AppError::Processing(format!(
            "Failed to process all {} filing(s)",
            failure_count
        )));
    }

    Ok(())
}

async fn build_worklist(args: &Args) -> Result<Vec<WorkItem>, AppError> {
    if let Some(input) = &args.input {
        if input.is_dir() {
            let mut paths: Vec<_> = std::fs::read_dir(input)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
                .collect();
            paths.sort();
            return Ok(paths.into_iter().map(WorkItem::Local).collect());
        }
        return Ok(vec![WorkItem::Local(input.clone())]);
    }

    let Some(ticker) = &args.ticker else {
        return Err(AppError::Config(
            "Either --ticker or --input is required".to_string(),
        ));
    };

    tracing::info!("Finding {} filings for ticker: {}", args.form_type, ticker);
    let filings =
        client::find_filings(ticker, &args.form_type, args.start_year, args.end_year).await?;
    tracing::info!("Found {} {} filing(s)", filings.len(), args.form_type);

    Ok(filings.into_iter().map(WorkItem::Remote).collect())
}

/// Loads one work item into memory, returning (stem, source label, content).
/// Container files are ASCII-superset; stray non-UTF-8 bytes are replaced
/// here and stripped later by the table normalizer.
async fn load_item(item: &WorkItem) -> Result<(String, String, String), AppError> {
    match item {
        WorkItem::Remote(filing) => {
            let url = filing.container_url();
            let content = client::download_container(&url).await?;
            let stem = format!(
                "{}_{}",
                filing.ticker,
                filing.accession_number.replace('-', "")
            );
            Ok((stem, url, content))
        }
        WorkItem::Local(path) => {
            let bytes = std::fs::read(path)?;
            let content = String::from_utf8_lossy(&bytes).into_owned();
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("filing")
                .to_string();
            Ok((stem, path.display().to_string(), content))
        }
    }
}

/// Runs the full decomposition pipeline over one filing buffer.
///
/// Structural errors (missing header field, truncated wrapper, unterminated
/// anchor) unwind out of here and fail this filing only. An XBRL document
/// hiding behind an .htm name is a classification negative: logged,
/// counted, and skipped.
fn process_filing(
    buffer: &str,
    stem: &str,
    source: &str,
    storage: &StorageManager,
    debug: bool,
) -> Result<FilingSummary, AppError> {
    let mut summary = FilingSummary {
        source: source.to_string(),
        ..Default::default()
    };
    let mut anchors = Vec::new();
    let mut tables = Vec::new();

    for section in segments(buffer) {
        summary.section_count += 1;

        let file_type = section.file_type()?;
        if !summary.form_types.iter().any(|f| f == file_type) {
            summary.form_types.push(file_type.to_string());
        }

        let html = match extract_html(&section) {
            Ok(html) => html,
            Err(ExtractError::MisclassifiedXbrl(name)) => {
                tracing::info!(
                    "Section '{}' wraps an XBRL document, not indexing it as HTML",
                    name
                );
                summary.xbrl_sections += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if html.is_empty() {
            continue;
        }
        summary.html_sections += 1;

        let section_anchors = html.anchors().collect::<Result<Vec<_>, _>>()?;
        let section_tables: Vec<_> = html.tables().collect();

        if debug {
            save_debug_artifacts(
                &html,
                &section_anchors,
                &section_tables,
                stem,
                summary.html_sections,
                storage,
            )?;
        }

        summary.anchor_count += section_anchors.len();
        summary.table_count += section_tables.len();
        anchors.extend(section_anchors);
        tables.extend(section_tables);
    }

    if summary.has_html() {
        storage.save_anchors(stem, &anchors)?;
        storage.save_tables(stem, &tables)?;
        storage.save_metadata(stem, &summary)?;
    } else {
        tracing::info!("No HTML document in filing '{}', nothing persisted", stem);
    }

    Ok(summary)
}

/// Saves the raw section HTML plus an annotated copy with every yielded
/// anchor and table span highlighted.
fn save_debug_artifacts(
    html: &HtmlContent<'_>,
    anchors: &[AnchorRecord<'_>],
    tables: &[TableData<'_>],
    stem: &str,
    section_index: usize,
    storage: &StorageManager,
) -> Result<(), AppError> {
    let debug_dir = storage.filing_dir(stem)?.join("debug");
    std::fs::create_dir_all(&debug_dir)?;

    let raw_path = debug_dir.join(format!("section_{:02}.html", section_index));
    std::fs::write(&raw_path, html.text())?;
    tracing::info!("Saved raw section HTML to {}", raw_path.display());

    let mut highlights = Vec::new();
    for table in tables {
        if let Some((start, end)) = html_debug::span_in(html.text(), table.raw()) {
            highlights.push((start, end, "table"));
        }
    }
    for anchor in anchors {
        if let Some((start, end)) = html_debug::span_in(html.text(), anchor.raw) {
            highlights.push((start, end, "anchor"));
        }
    }

    let annotated_path = debug_dir.join(format!("section_{:02}_annotated.html", section_index));
    html_debug::save_annotated_html(html.text(), &annotated_path, &highlights)?;

    Ok(())
}
