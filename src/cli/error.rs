use crate::db::EngineError;

use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use tracing::subscriber::SetGlobalDefaultError;


#[derive(Debug)]
pub struct CliError {
    pub kind: CliErrorKind
}

impl CliError {
    /// Impala's false "no results" error, which callers report as success.
    pub fn is_no_results(&self) -> bool {
        matches!(&self.kind, CliErrorKind::Engine(e) if e.is_no_results())
    }

    pub fn is_environment(&self) -> bool {
        matches!(&self.kind, CliErrorKind::Engine(e) if e.is_environment())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Error for CliError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.kind)
	}
}

#[derive(Debug)]
pub enum CliErrorKind {
    Engine(EngineError),
    Output(std::io::Error),
    ReadQueryFile { source: std::io::Error, path: PathBuf },
    SetGlobalDefault(SetGlobalDefaultError),
}

impl fmt::Display for CliErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Engine(error) => write!(f, "{}", error.kind),
            Self::Output(error) => write!(f, "Failed to write output: {error}"),
            Self::ReadQueryFile { source, path } => write!(f, "Failed to read query file {path:?}: {source}"),
            Self::SetGlobalDefault(error) => write!(f, "Failed to set global default subscriber: {error}"),
        }
    }
}

impl Error for CliErrorKind {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::Engine(source) => Some(source),
			Self::Output(source) => Some(source),
			Self::ReadQueryFile { source, .. } => Some(source),
			Self::SetGlobalDefault(source) => Some(source),
		}
	}
}

impl From<EngineError> for CliError {
    fn from(error: EngineError) -> Self {
        CliError { kind: CliErrorKind::Engine(error) }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError { kind: CliErrorKind::Output(error) }
    }
}

impl From<SetGlobalDefaultError> for CliError {
    fn from(error: SetGlobalDefaultError) -> Self {
        CliError { kind: CliErrorKind::SetGlobalDefault(error) }
    }
}
