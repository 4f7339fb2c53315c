use crate::cli::error::CliError;
use crate::db::{sql_common, ConnectionSettings, Engine, EngineError, ResultSet};
use serde::Serialize;
use std::io::Write;


/// Session constraints applied before the user's statements.
#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub mem_limit: String,
    pub mt_dop: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            mem_limit: sql_common::DEFAULT_MEM_LIMIT.to_string(),
            mt_dop: sql_common::DEFAULT_MT_DOP,
        }
    }
}


#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The statement returned column metadata.
    Rows(ResultSet),
    /// DDL or DML: nothing to fetch.
    Done,
    /// Impala claimed an error but only meant there was nothing to fetch.
    NoResults,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementReport {
    pub statement: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}


/// Applies the session options, then runs every statement in order on one
/// session, handing each report to `sink` as soon as it is available.
///
/// The first real error stops the run. "No results" errors are turned into
/// [`Outcome::NoResults`] and the run continues.
pub fn query<E, F>(
    engine: &mut E,
    statements: &[String],
    options: &SessionOptions,
    mut sink: F,
) -> Result<(), CliError>
where
    E: Engine,
    F: FnMut(StatementReport) -> Result<(), CliError>,
{
    apply_session_options(engine, options);

    for statement in statements {
        tracing::info!("Executing statement...");
        let outcome = match engine.execute(statement) {
            Ok(Some(result)) => Outcome::Rows(result),
            Ok(None) => Outcome::Done,
            Err(e) if e.is_no_results() => {
                tracing::debug!("Treating error as an empty result: {e}");
                Outcome::NoResults
            }
            Err(e) => return Err(e.into()),
        };

        sink(StatementReport { statement: statement.clone(), outcome })?;
    }

    Ok(())
}

/// Opens a session with `connect` and runs [`query`] on it. The session is
/// dropped before this returns.
pub fn connect_and_query<E, C, F>(
    connect: C,
    statements: &[String],
    options: &SessionOptions,
    sink: F,
) -> Result<(), CliError>
where
    E: Engine,
    C: FnOnce() -> Result<E, EngineError>,
    F: FnMut(StatementReport) -> Result<(), CliError>,
{
    let mut engine = connect()?;
    query(&mut engine, statements, options, sink)
}

/// Best effort: a failure is logged and the remaining options are skipped.
fn apply_session_options<E: Engine>(engine: &mut E, options: &SessionOptions) {
    let statements = [
        sql_common::set_mem_limit(&options.mem_limit),
        sql_common::set_mt_dop(options.mt_dop),
    ];

    for sql in statements {
        if let Err(e) = engine.execute(&sql) {
            tracing::debug!("Ignoring failed session option '{sql}': {e}");
            break;
        }
    }
}


/// Creates `test_db.rbbn_test` and seeds it when empty. Returns the final
/// row count. Progress is written to `out`.
pub fn setup<E: Engine>(
    engine: &mut E,
    settings: &ConnectionSettings,
    out: &mut impl Write,
) -> Result<i64, CliError> {
    writeln!(out, "Creating database...")?;
    engine.execute(sql_common::CREATE_TEST_DATABASE)?;

    writeln!(out, "Using {}...", sql_common::TEST_DATABASE)?;
    engine.execute(sql_common::USE_TEST_DATABASE)?;

    writeln!(out, "Creating table...")?;
    engine.execute(sql_common::CREATE_TEST_TABLE)?;

    writeln!(out, "Checking if table has data...")?;
    let count = engine.fetch_count(sql_common::QUERY_ROW_COUNT)?;

    if count == 0 {
        writeln!(out, "Inserting test data...")?;
        engine.execute(&sql_common::insert_seed_rows())?;
        writeln!(out, "✅ Test data inserted")?;
    } else {
        tracing::info!("Skipping seed insert, table is not empty");
        writeln!(out, "✅ Table already has {count} rows")?;
    }

    writeln!(out, "Verifying data...")?;
    let total = engine.fetch_count(sql_common::QUERY_TOTAL_ROWS)?;
    writeln!(out, "✅ Total rows: {total}")?;

    writeln!(out, "\n✅ Setup complete!")?;
    writeln!(out, "\nConnection details for Superset:")?;
    match superset_uri(settings) {
        Some(uri) => writeln!(out, "  SQLAlchemy URI: {uri}")?,
        None => writeln!(
            out,
            "  Connected through a custom ODBC connection string; build the SQLAlchemy URI from its host and port."
        )?,
    }

    Ok(total)
}

/// `None` when a connection string was used: host, port and auth flags
/// did not take part in the connection.
pub fn superset_uri(settings: &ConnectionSettings) -> Option<String> {
    if settings.connection_string.is_some() {
        return None;
    }

    Some(format!(
        "impala://{}:{}/{}?auth_mechanism={}",
        settings.host,
        settings.port,
        sql_common::TEST_DATABASE,
        settings.auth,
    ))
}
