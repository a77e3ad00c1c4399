use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use sheetseek::config;
use sheetseek::export::EXPORT_FILE_NAME;
use sheetseek::highlight::{highlight, render_ansi};
use sheetseek::response::SearchResponse;
use sheetseek::session::{
    BackendClient, SearchPhase, SearchSession, WorkbookFile, poll_session, worker,
};

/// Workbook keyword search client
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Search a multi-sheet workbook for a keyword via a search backend"
)]
struct Args {
    /// Workbook file to upload and search
    workbook: PathBuf,

    /// Keyword to search for
    query: String,

    /// Write the combined CSV export to this path (a directory gets the
    /// default file name)
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Override the backend search endpoint from config
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,
}

fn main() -> Result<()> {
    // Writes to /tmp/sheetseek-debug.log at DEBUG level
    #[cfg(debug_assertions)]
    init_debug_logging();

    color_eyre::install()?;

    // Parse args first so --help/--version never touch the config file
    let args = Args::parse();

    let config_result = config::load_config();
    if let Some(warning) = &config_result.warning {
        eprintln!("warning: {}", warning);
    }
    let endpoint = args
        .endpoint
        .clone()
        .unwrap_or_else(|| config_result.config.backend.endpoint.clone());

    let bytes = std::fs::read(&args.workbook)
        .wrap_err_with(|| format!("cannot read workbook {}", args.workbook.display()))?;
    let name = args
        .workbook
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workbook".to_string());

    let mut session = SearchSession::new();
    let (request_tx, request_rx) = mpsc::channel();
    let (response_tx, response_rx) = mpsc::channel();
    session.set_channels(request_tx, response_rx);
    worker::spawn_worker(
        BackendClient::new(endpoint, config_result.config.backend.use_semantic),
        request_rx,
        response_tx,
    );

    session.set_file(WorkbookFile { name, bytes });
    session.start_search(&args.query)?;

    while session.is_pending() {
        if !poll_session(&mut session) {
            std::thread::sleep(Duration::from_millis(25));
        }
    }

    match session.phase().clone() {
        SearchPhase::Succeeded { query, response } => {
            println!("{}", session.status_message());
            print_results(&response, &query);
            if let Some(path) = args.export {
                write_export(&mut session, &response, path)?;
            }
            Ok(())
        }
        SearchPhase::Failed { error, .. } => {
            eprintln!("search failed: {}", error);
            std::process::exit(1);
        }
        // Pending is excluded by the loop above; Idle cannot follow start_search
        _ => Ok(()),
    }
}

/// Print every matched row, highlighting keyword occurrences
fn print_results(response: &SearchResponse, query: &str) {
    for (sheet_name, sheet) in &response.results_by_sheet {
        if sheet.data.is_empty() {
            continue;
        }
        println!();
        println!(
            "== {} ({} row{})",
            sheet_name,
            sheet.data.len(),
            if sheet.data.len() == 1 { "" } else { "s" }
        );
        println!("{}", sheet.columns.join(" | "));
        for row in &sheet.data {
            let cells: Vec<String> = row
                .iter()
                .map(|cell| render_ansi(&highlight(cell, query)))
                .collect();
            println!("{}", cells.join(" | "));
        }
    }
}

/// Write the combined CSV export, if there is anything to export
fn write_export(session: &mut SearchSession, response: &SearchResponse, path: PathBuf) -> Result<()> {
    let path = if path.is_dir() {
        path.join(EXPORT_FILE_NAME)
    } else {
        path
    };

    if !session.export.prepare(&response.results_by_sheet) {
        println!("nothing to export");
        return Ok(());
    }
    if let Some(payload) = session.export.payload() {
        std::fs::write(&path, payload)
            .wrap_err_with(|| format!("cannot write export to {}", path.display()))?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

#[cfg(debug_assertions)]
fn init_debug_logging() {
    use std::io::Write;

    let log_file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("/tmp/sheetseek-debug.log")
    {
        Ok(file) => file,
        Err(_) => return,
    };

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Debug)
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .format(|buf, record| {
            use std::time::SystemTime;
            let datetime: chrono::DateTime<chrono::Local> = SystemTime::now().into();
            writeln!(
                buf,
                "[{}] [{}] {}",
                datetime.format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .init();

    log::debug!("=== SHEETSEEK DEBUG SESSION STARTED ===");
}
