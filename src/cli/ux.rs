use crate::cli::{OutputMode, QueryCli};
use crate::cli::commands::{Outcome, StatementReport};
use crate::cli::error::CliError;
use crate::cli::output::CliOutput;
use crate::db::{ResultSet, Row};
use clap::CommandFactory;
use comfy_table::{CellAlignment, Table, presets};
use std::fmt::Write;
use std::process::ExitCode;


pub const DONE_MESSAGE: &str = "Query executed successfully";
pub const NO_ROWS_MESSAGE: &str = "Query executed successfully (no rows returned)";
pub const NO_RESULTS_MESSAGE: &str = "Query executed successfully (no results to return)";
const NULL: &str = "NULL";


/// Logs go to stderr so stdout only carries results.
pub fn setup_logging(verbose: u8, quiet: bool, json: bool) -> Result<(), CliError> {
    if json {
        // Mute all logging if JSON output is enabled
        tracing::subscriber::set_global_default(tracing::subscriber::NoSubscriber::default())?;
        return Ok(());
    }

    let level = if quiet {
        tracing::Level::ERROR
    } else { match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }};

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}


/// Renders one statement's outcome for a human, with a trailing newline.
pub fn render_report(report: &StatementReport, mode: OutputMode) -> String {
    match (&report.outcome, mode) {
        (Outcome::Rows(result), OutputMode::Frame) => render_frame(result),
        (Outcome::Rows(result), _) => render_plain(result),
        (Outcome::Done, _) => format!("{DONE_MESSAGE}\n"),
        (Outcome::NoResults, _) => format!("{NO_RESULTS_MESSAGE}\n"),
    }
}

fn cells(row: &Row) -> impl Iterator<Item = &str> {
    row.iter().map(|cell| cell.as_deref().unwrap_or(NULL))
}

/// Header, dashed separator, then one `" | "`-joined line per row.
pub fn render_plain(result: &ResultSet) -> String {
    if result.is_empty() {
        return format!("{NO_ROWS_MESSAGE}\n");
    }

    let mut output = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(output, "{}", result.columns.join(" | "));

    let width = result.columns.iter().map(|c| c.chars().count()).sum::<usize>()
        + result.columns.len() * 3;
    let _ = writeln!(output, "{}", "-".repeat(width));

    for row in &result.rows {
        let _ = writeln!(output, "{}", cells(row).collect::<Vec<_>>().join(" | "));
    }

    output
}

/// DataFrame-style table: positional index, right-aligned, no borders.
pub fn render_frame(result: &ResultSet) -> String {
    if result.is_empty() {
        return format!(
            "Empty DataFrame\nColumns: [{}]\nIndex: []\n",
            result.columns.join(", ")
        );
    }

    let mut table = Table::new();
    table.load_preset(presets::NOTHING);

    let mut header = vec![String::new()];
    header.extend(result.columns.iter().cloned());
    table.set_header(header);

    for (index, row) in result.rows.iter().enumerate() {
        let mut line = vec![index.to_string()];
        line.extend(cells(row).map(String::from));
        table.add_row(line);
    }

    for column in table.column_iter_mut() {
        column.set_cell_alignment(CellAlignment::Right);
    }

    let mut output = String::new();
    for line in table.lines() {
        let _ = writeln!(output, "{}", line.trim_end());
    }
    output
}


pub fn render_error(error: &CliError) -> String {
    format!("❌ Error: {error}")
}

/// Shown when the ODBC layer itself is unusable.
pub fn render_environment_error(error: &CliError) -> String {
    format!(
        "{}
   Install the Impala ODBC driver and register it with your driver manager (odbcinst.ini),
   or pass --connection-string with a working DSN.",
        render_error(error)
    )
}

/// How a run ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Exit {
    Success,
    Failure,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        match exit {
            Exit::Success => ExitCode::SUCCESS,
            Exit::Failure => ExitCode::FAILURE,
        }
    }
}


/// Final stdout text and exit status of a `query-impala` run.
///
/// A "no results" error is a success wherever it was raised. In JSON mode
/// the envelope is the only output.
pub fn finish(
    result: Result<(), CliError>,
    mode: OutputMode,
    reports: Vec<StatementReport>,
) -> (Option<String>, Exit) {
    let mut quirk = false;
    let result = match result {
        Err(e) if e.is_no_results() => {
            tracing::debug!("Treating error as an empty result: {e}");
            quirk = true;
            Ok(())
        }
        other => other,
    };

    if mode == OutputMode::Json {
        let exit = if result.is_ok() { Exit::Success } else { Exit::Failure };
        return match serde_json::to_string_pretty(&CliOutput::new("query", reports, &result)) {
            Ok(json) => (Some(json), exit),
            Err(e) => (Some(format!("❌ Error: Failed to serialize output: {e}")), Exit::Failure),
        };
    }

    match result {
        Ok(()) if quirk => (Some(NO_RESULTS_MESSAGE.to_string()), Exit::Success),
        Ok(()) => (None, Exit::Success),
        Err(e) if e.is_environment() => (Some(render_environment_error(&e)), Exit::Failure),
        Err(e) => (Some(render_error(&e)), Exit::Failure),
    }
}

/// Nothing to run: usage goes to stdout and the run fails.
pub fn finish_without_query() -> (Option<String>, Exit) {
    let help = QueryCli::command().render_help().to_string();
    (Some(help), Exit::Failure)
}

/// Final stdout text and exit status of a `setup-impala-data` run.
pub fn finish_setup(result: Result<i64, CliError>, port: u16) -> (Option<String>, Exit) {
    match result {
        Ok(total) => {
            tracing::info!("Setup finished with {total} row(s) in place");
            (None, Exit::Success)
        }
        Err(e) if e.is_environment() => (Some(render_environment_error(&e)), Exit::Failure),
        Err(e) => (
            Some(format!("{}\n{}", render_error(&e), render_troubleshooting(port))),
            Exit::Failure,
        ),
    }
}


/// Shown when the setup fails.
pub fn render_troubleshooting(port: u16) -> String {
    format!(
        "
Make sure:
  1. Impala is running: docker compose -f docker-compose-impala.yml ps
  2. All services are healthy
  3. Port {port} is accessible"
    )
}
