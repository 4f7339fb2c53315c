use clap::Parser;
use impala_query::cli::error::CliError;
use impala_query::cli::{commands, ux, SetupCli};
use impala_query::db::{ConnectionSettings, OdbcDriver};
use std::io::Write;
use std::process::ExitCode;


fn run_setup(settings: ConnectionSettings) -> Result<i64, CliError> {
    let driver = OdbcDriver::new(settings)?;
    driver.ensure_installed()?;

    let settings = driver.settings();
    if settings.connection_string.is_some() {
        println!("Connecting to Impala with the given connection string...");
    } else {
        println!("Connecting to Impala at {}:{}...", settings.host, settings.port);
    }
    let mut session = driver.connect()?;

    let mut stdout = std::io::stdout().lock();
    commands::setup(&mut session, settings, &mut stdout)
}


/// Entry point for `setup-impala-data`.
///
/// Creates `test_db.rbbn_test` if needed and seeds it with five rows when it
/// is empty. Safe to run repeatedly. Exits with 1 on any failure.
fn main() -> ExitCode {
    let args = SetupCli::parse();

    if let Err(e) = ux::setup_logging(args.logging.verbose, args.logging.quiet, false) {
        println!("{}", ux::render_error(&e));
        return ExitCode::FAILURE;
    }

    let (message, exit) = ux::finish_setup(run_setup(args.connection_settings()), args.connection.port);
    if let Some(message) = message {
        let _ = writeln!(std::io::stdout(), "{message}");
    }
    exit.into()
}
