pub mod commands;
pub mod error;
pub mod output;
pub mod ux;

use crate::cli::error::{CliError, CliErrorKind};
use crate::db::{self, AuthMechanism, ConnectionSettings};
use crate::parser;
pub use clap::{Args, Parser};
use std::fs;
use std::path::PathBuf;


#[derive(Args, Clone, Debug)]
pub struct ConnectionArgs {
    #[arg(
        long,
        help = "Impala host",
        default_value = "localhost",
        env = "IMPALA_HOST",
    )]
    pub host: String,

    #[arg(
        long,
        help = "Impala port",
        default_value_t = 21050,
        env = "IMPALA_PORT",
    )]
    pub port: u16,

    #[arg(
        long,
        help = "Name of the Impala ODBC driver, as registered with the driver manager",
        default_value = db::DEFAULT_DRIVER,
        env = "IMPALA_ODBC_DRIVER",
    )]
    pub driver: String,

    #[arg(
        long,
        help = "User name for PLAIN authentication [default: impala]",
        env = "IMPALA_USER",
    )]
    pub user: Option<String>,

    #[arg(
        long,
        help = "Password for PLAIN authentication",
        env = "IMPALA_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,

    #[arg(
        long,
        help = "Full ODBC connection string, e.g. 'DSN=impala'.
Overrides --host, --port, --auth, --driver, --user and --password.",
        env = "IMPALA_CONNECTION_STRING",
        hide_env_values = true
    )]
    pub connection_string: Option<String>,
}

impl ConnectionArgs {
    pub fn settings(&self, auth: AuthMechanism) -> ConnectionSettings {
        ConnectionSettings {
            host: self.host.clone(),
            port: self.port,
            auth,
            driver: self.driver.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            connection_string: self.connection_string.clone(),
        }
    }
}


#[derive(Args, Clone, Debug)]
pub struct LoggingArgs {
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Set level of verbosity. [default: INFO]\n\t-v: DEBUG\n\t-vv: TRACE\n--quiet takes precedence over --verbose."
    )]
    pub verbose: u8,

    #[arg(
        short,
        long,
        action = clap::ArgAction::SetTrue,
        help = "Disable all information logs (only ERROR level logs are shown).\n--quiet takes precedence over --verbose."
    )]
    pub quiet: bool,
}


/// How query results are written to stdout.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutputMode {
    Plain,
    Frame,
    Json,
}


#[derive(Parser, Debug)]
#[command(
    name = "query-impala",
    version,
    about = "Run SQL queries against Impala",
    after_help = "Examples:
  query-impala \"SHOW DATABASES\"
  query-impala \"SELECT * FROM test_db.rbbn_test LIMIT 10\"
  query-impala \"INSERT INTO test_db.rbbn_test VALUES (1, 'Test', 10.5)\"
  query-impala -f query.sql
  query-impala \"SELECT * FROM test_db.rbbn_test\" --pandas

Note: Use database.table format for queries, e.g., test_db.rbbn_test.
      A file may hold several ';'-separated statements; they share one session."
)]
pub struct QueryCli {
    #[arg(help = "SQL query to execute (or use -f for file)")]
    pub query: Option<String>,

    #[arg(short, long, help = "Read query from file")]
    pub file: Option<PathBuf>,

    #[arg(
        long,
        action = clap::ArgAction::SetTrue,
        help = "Output results as a DataFrame-style table"
    )]
    pub pandas: bool,

    #[arg(
        long,
        action = clap::ArgAction::SetTrue,
        conflicts_with = "pandas",
        help = "Enable JSON output format. Human readable output and logs are disabled when this flag is set."
    )]
    pub json: bool,

    #[arg(
        long,
        value_enum,
        help = "Authentication mechanism",
        default_value_t = AuthMechanism::Nosasl,
        env = "IMPALA_AUTH",
    )]
    pub auth: AuthMechanism,

    #[arg(
        long,
        help = "Session memory limit applied before the query (best effort)",
        default_value = db::sql_common::DEFAULT_MEM_LIMIT,
    )]
    pub mem_limit: String,

    #[arg(
        long,
        help = "Session MT_DOP applied before the query (best effort)",
        default_value_t = db::sql_common::DEFAULT_MT_DOP,
    )]
    pub mt_dop: u32,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

impl QueryCli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.pandas {
            OutputMode::Frame
        } else {
            OutputMode::Plain
        }
    }

    pub fn connection_settings(&self) -> ConnectionSettings {
        self.connection.settings(self.auth)
    }

    pub fn session_options(&self) -> commands::SessionOptions {
        commands::SessionOptions {
            mem_limit: self.mem_limit.clone(),
            mt_dop: self.mt_dop,
        }
    }

    /// The SQL text to run: the file's content when `-f` is given, otherwise
    /// the positional query. `None` when neither is usable.
    pub fn resolve_query(&self) -> Result<Option<String>, CliError> {
        if let Some(path) = &self.file {
            if self.query.is_some() {
                tracing::warn!("Both a query and --file were given, running {path:?}");
            }
            let sql = fs::read_to_string(path).map_err(|source| CliError {
                kind: CliErrorKind::ReadQueryFile { source, path: path.clone() },
            })?;
            return Ok(Some(sql));
        }

        Ok(self.query.clone().filter(|q| !q.trim().is_empty()))
    }

    /// The resolved query split into statements. `None` when there is
    /// nothing to run, comments and bare semicolons included.
    pub fn statements(&self) -> Result<Option<Vec<String>>, CliError> {
        let Some(sql) = self.resolve_query()? else {
            return Ok(None);
        };

        let statements = parser::split_statements(&sql);
        if statements.is_empty() {
            tracing::error!("No statements found in the given SQL");
            return Ok(None);
        }

        tracing::debug!("Running {} statement(s)", statements.len());
        Ok(Some(statements))
    }
}


#[derive(Parser, Debug)]
#[command(name = "setup-impala-data", version, about = "Set up test data in Impala")]
pub struct SetupCli {
    #[arg(
        long,
        value_enum,
        help = "Authentication mechanism",
        default_value_t = AuthMechanism::Plain,
        env = "IMPALA_AUTH",
    )]
    pub auth: AuthMechanism,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

impl SetupCli {
    pub fn connection_settings(&self) -> ConnectionSettings {
        self.connection.settings(self.auth)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn clis_are_well_formed() {
        QueryCli::command().debug_assert();
        SetupCli::command().debug_assert();
    }

    #[test]
    fn query_defaults_match_the_usual_deployment() {
        let args = QueryCli::try_parse_from(["query-impala", "SHOW DATABASES"]).unwrap();

        assert_eq!(args.connection.host, "localhost");
        assert_eq!(args.connection.port, 21050);
        assert_eq!(args.auth, AuthMechanism::Nosasl);
        assert_eq!(args.output_mode(), OutputMode::Plain);
        assert_eq!(args.resolve_query().unwrap().as_deref(), Some("SHOW DATABASES"));
    }

    #[test]
    fn setup_defaults_to_plain_auth() {
        let args = SetupCli::try_parse_from(["setup-impala-data", "--host", "impalad", "--port", "21000"]).unwrap();
        let settings = args.connection_settings();

        assert_eq!(settings.host, "impalad");
        assert_eq!(settings.port, 21000);
        assert_eq!(settings.auth, AuthMechanism::Plain);
    }

    #[test]
    fn missing_query_and_file_resolves_to_nothing() {
        let args = QueryCli::try_parse_from(["query-impala"]).unwrap();
        assert!(args.resolve_query().unwrap().is_none());

        let args = QueryCli::try_parse_from(["query-impala", "  "]).unwrap();
        assert!(args.resolve_query().unwrap().is_none());
    }

    #[test]
    fn comment_only_query_has_no_statements() {
        let args = QueryCli::try_parse_from(["query-impala", "/* nothing */ ;\n;"]).unwrap();
        assert!(args.statements().unwrap().is_none());

        let args = QueryCli::try_parse_from(["query-impala", "USE test_db; SHOW TABLES"]).unwrap();
        assert_eq!(args.statements().unwrap().unwrap(), vec!["USE test_db", "SHOW TABLES"]);
    }

    #[test]
    fn file_takes_precedence_over_positional_query() {
        let path = std::env::temp_dir().join(format!("query-impala-{}.sql", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "SELECT * FROM test_db.rbbn_test").unwrap();

        let args = QueryCli::try_parse_from([
            "query-impala",
            "SHOW TABLES",
            "-f",
            path.to_str().unwrap(),
        ]).unwrap();
        let query = args.resolve_query().unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(query.as_deref(), Some("SELECT * FROM test_db.rbbn_test\n"));
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let args = QueryCli::try_parse_from(["query-impala", "-f", "/nonexistent/query.sql"]).unwrap();
        let err = args.resolve_query().unwrap_err();

        assert!(matches!(err.kind, CliErrorKind::ReadQueryFile { .. }));
    }

    #[test]
    fn output_modes() {
        let pandas = QueryCli::try_parse_from(["query-impala", "SELECT 1", "--pandas"]).unwrap();
        let json = QueryCli::try_parse_from(["query-impala", "SELECT 1", "--json"]).unwrap();

        assert_eq!(pandas.output_mode(), OutputMode::Frame);
        assert_eq!(json.output_mode(), OutputMode::Json);
        assert!(QueryCli::try_parse_from(["query-impala", "SELECT 1", "--json", "--pandas"]).is_err());
    }
}
