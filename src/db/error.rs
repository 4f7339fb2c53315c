use std::error::Error;
use std::fmt;


#[derive(Debug)]
#[non_exhaustive]
pub struct EngineError {
    pub kind: EngineErrorKind
}

impl EngineError {
    /// Errors raised before any network action: the ODBC driver manager
    /// or the Impala driver itself is unavailable on this machine.
    pub fn is_environment(&self) -> bool {
        matches!(
            self.kind,
            EngineErrorKind::Environment(_) | EngineErrorKind::DriverNotInstalled { .. }
        )
    }

    /// Whether this error is Impala's false "no results" complaint.
    pub fn is_no_results(&self) -> bool {
        super::is_no_results(&self.kind.to_string())
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EngineError: {}", self.kind)
    }
}

impl Error for EngineError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		Some(&self.kind)
	}
}

#[derive(Debug)]
pub enum EngineErrorKind {
    DriverNotInstalled { driver: String, available: Vec<String> },
    EmptyResult(String),
    Environment(odbc_api::Error),
    InvalidCount(String),
    Odbc(odbc_api::Error),
    Server { sql: String, message: String },
}

impl fmt::Display for EngineErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DriverNotInstalled { driver, available } => {
                if available.is_empty() {
                    write!(f, "ODBC driver '{driver}' is not installed (no drivers registered)")
                } else {
                    write!(f, "ODBC driver '{driver}' is not installed (available: {})", available.join(", "))
                }
            },
            Self::EmptyResult(sql) => write!(f, "Statement returned no rows: '{sql}'"),
            Self::Environment(e) => write!(f, "Failed to initialise the ODBC environment: {e}"),
            Self::InvalidCount(value) => write!(f, "Expected a row count, found: '{value}'"),
            Self::Odbc(e) => write!(f, "{e}"),
            Self::Server { message, .. } => write!(f, "{message}"),
        }
    }
}

impl Error for EngineErrorKind {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::Environment(source) => Some(source),
			Self::Odbc(source) => Some(source),
			_ => None,
		}
	}
}

impl From<odbc_api::Error> for EngineError {
    fn from(error: odbc_api::Error) -> Self {
        EngineError { kind: EngineErrorKind::Odbc(error) }
    }
}
