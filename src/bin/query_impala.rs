use clap::Parser;
use impala_query::cli::commands::{self, StatementReport};
use impala_query::cli::error::CliError;
use impala_query::cli::ux::{self, Exit};
use impala_query::cli::{OutputMode, QueryCli};
use impala_query::db::OdbcDriver;
use std::io::Write;
use std::process::ExitCode;


fn print_report(report: StatementReport, mode: OutputMode) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(ux::render_report(&report, mode).as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn emit((message, exit): (Option<String>, Exit)) -> ExitCode {
    if let Some(message) = message {
        // A closed stdout must not turn into a panic
        let _ = writeln!(std::io::stdout(), "{}", message.trim_end());
    }
    exit.into()
}


/// Entry point for `query-impala`.
///
/// Reads SQL from the positional argument or `-f`, runs it against Impala,
/// and prints each statement's result. Exits with 1 when the ODBC driver is
/// unavailable, no query was given, or a statement fails. Impala's
/// "no results" errors count as success.
fn main() -> ExitCode {
    let args = QueryCli::parse();
    let mode = args.output_mode();

    if let Err(e) = ux::setup_logging(args.logging.verbose, args.logging.quiet, mode == OutputMode::Json) {
        return emit(ux::finish(Err(e), mode, vec![]));
    }

    let statements = match args.statements() {
        Ok(Some(statements)) => statements,
        Ok(None) => return emit(ux::finish_without_query()),
        Err(e) => return emit(ux::finish(Err(e), mode, vec![])),
    };

    let driver = match OdbcDriver::new(args.connection_settings())
        .and_then(|driver| driver.ensure_installed().map(|_| driver))
    {
        Ok(driver) => driver,
        Err(e) => return emit(ux::finish(Err(e.into()), mode, vec![])),
    };

    let options = args.session_options();
    let mut reports = vec![];
    let result = match mode {
        OutputMode::Json => commands::connect_and_query(|| driver.connect(), &statements, &options, |report| {
            reports.push(report);
            Ok(())
        }),
        _ => commands::connect_and_query(|| driver.connect(), &statements, &options, |report| {
            print_report(report, mode)
        }),
    };

    // The session is closed by now.
    emit(ux::finish(result, mode, reports))
}
