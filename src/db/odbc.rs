use super::{Engine, EngineError, EngineErrorKind, ResultSet};
use odbc_api::{self as odbc, Cursor};
use std::fmt;


pub const DEFAULT_DRIVER: &str = "Cloudera ODBC Driver for Impala";
const DEFAULT_PLAIN_USER: &str = "impala";


/// Authentication handshake expected by the Impala daemon.
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum AuthMechanism {
    /// Raw Thrift transport, no SASL.
    Nosasl,
    /// SASL PLAIN with a user name and optional password.
    Plain,
}

impl fmt::Display for AuthMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMechanism::Nosasl => write!(f, "NOSASL"),
            AuthMechanism::Plain => write!(f, "PLAIN"),
        }
    }
}


/// Everything needed to open a session against one Impala daemon.
#[derive(Clone, Debug)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub auth: AuthMechanism,
    pub driver: String,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Used verbatim instead of the generated string when set.
    pub connection_string: Option<String>,
}

impl ConnectionSettings {
    pub fn new(host: &str, port: u16, auth: AuthMechanism) -> Self {
        ConnectionSettings {
            host: host.to_string(),
            port,
            auth,
            driver: DEFAULT_DRIVER.to_string(),
            user: None,
            password: None,
            connection_string: None,
        }
    }

    pub fn connection_string(&self) -> String {
        if let Some(conn_str) = &self.connection_string {
            return conn_str.clone();
        }

        let mut conn_str = format!(
            "Driver={};Host={};Port={};",
            escape_value(&self.driver),
            escape_value(&self.host),
            self.port,
        );

        match self.auth {
            AuthMechanism::Nosasl => conn_str.push_str("AuthMech=0;UseSASL=0;"),
            AuthMechanism::Plain => {
                let user = self.user.as_deref().unwrap_or(DEFAULT_PLAIN_USER);
                let password = self.password.as_deref().unwrap_or_default();
                conn_str.push_str(&format!(
                    "AuthMech=3;UseSASL=1;UID={};PWD={};",
                    escape_value(user),
                    escape_value(password),
                ));
            }
        }

        conn_str
    }
}

/// Brace-quotes attribute values that would otherwise break the
/// `key=value;` grammar of an ODBC connection string.
fn escape_value(value: &str) -> String {
    if value.contains([';', '{', '}', '=']) || value.starts_with(' ') || value.ends_with(' ') {
        format!("{{{}}}", value.replace('}', "}}"))
    } else {
        value.to_string()
    }
}


/// Owns the ODBC environment. Sessions borrow it.
pub struct OdbcDriver {
    env: odbc::Environment,
    settings: ConnectionSettings,
}

impl OdbcDriver {
    pub fn new(settings: ConnectionSettings) -> Result<Self, EngineError> {
        let env = odbc::Environment::new()
            .map_err(|e| EngineError { kind: EngineErrorKind::Environment(e) })?;

        Ok(OdbcDriver { env, settings })
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    /// Fails when the configured driver is not registered with the driver
    /// manager. A user-supplied connection string is trusted as-is.
    pub fn ensure_installed(&self) -> Result<(), EngineError> {
        if self.settings.connection_string.is_some() {
            return Ok(());
        }

        let available = self.env
            .drivers()
            .map_err(|e| EngineError { kind: EngineErrorKind::Environment(e) })?
            .into_iter()
            .map(|info| info.description)
            .collect::<Vec<_>>();

        if available.iter().any(|name| name == &self.settings.driver) {
            tracing::debug!("Found ODBC driver '{}'", self.settings.driver);
            Ok(())
        } else {
            Err(EngineError {
                kind: EngineErrorKind::DriverNotInstalled {
                    driver: self.settings.driver.clone(),
                    available,
                },
            })
        }
    }

    pub fn connect(&self) -> Result<OdbcSession<'_>, EngineError> {
        tracing::info!("Opening Impala session ({} authentication)", self.settings.auth);
        let conn = self.env.connect_with_connection_string(
            &self.settings.connection_string(),
            odbc::ConnectionOptions::default(),
        )?;

        Ok(OdbcSession { conn })
    }
}


/// One open Impala session. The connection closes when this is dropped.
pub struct OdbcSession<'env> {
    conn: odbc::Connection<'env>,
}

impl OdbcSession<'_> {
    fn read_result(mut cursor: impl Cursor) -> Result<Option<ResultSet>, odbc::Error> {
        let num_cols = cursor.num_result_cols()?;
        if num_cols <= 0 {
            return Ok(None);
        }

        let columns = (1..=num_cols as u16)
            .map(|index| cursor.col_name(index))
            .collect::<Result<Vec<_>, _>>()?;
        let mut result = ResultSet::new(columns);

        let mut buf = Vec::new();
        while let Some(mut row) = cursor.next_row()? {
            let mut cells = Vec::with_capacity(num_cols as usize);
            for index in 1..=num_cols as u16 {
                let cell = if row.get_text(index, &mut buf)? {
                    Some(String::from_utf8_lossy(&buf).into_owned())
                } else {
                    None
                };
                cells.push(cell);
            }
            result.push(cells);
        }

        Ok(Some(result))
    }
}

impl Engine for OdbcSession<'_> {
    fn execute(&mut self, sql: &str) -> Result<Option<ResultSet>, EngineError> {
        tracing::debug!("Executing: {sql}");

        let result = match self.conn.execute(sql, (), None) {
            Ok(Some(cursor)) => Self::read_result(cursor),
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        };

        result.map_err(|e| statement_error(sql, e))
    }
}

impl Drop for OdbcSession<'_> {
    fn drop(&mut self) {
        tracing::debug!("Closing Impala session");
    }
}

/// Keeps the server's own diagnostic text so callers can inspect it.
fn statement_error(sql: &str, error: odbc::Error) -> EngineError {
    match error {
        odbc::Error::Diagnostics { record, .. } => EngineError {
            kind: EngineErrorKind::Server {
                sql: sql.to_string(),
                message: record.to_string(),
            },
        },
        other => other.into(),
    }
}
