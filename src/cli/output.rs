// {
//   "command": "query",
//   "status": "success",
//   "data": [
//     {"statement": "SHOW DATABASES", "outcome": "rows", "columns": ["name", "comment"], "rows": [["default", "Default Hive database"]]},
//     {"statement": "USE test_db", "outcome": "done"}
//   ],
//   "error": null
// }
use crate::cli::commands::StatementReport;
use crate::cli::error::{CliError, CliErrorKind};
use serde::Serialize;


#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CliErrorJson {
    Engine { message: String },
    Environment { message: String },
    Output { message: String },
    ReadQueryFile { message: String },
    SetGlobalDefault { message: String },
}

impl From<&CliError> for CliErrorJson {
    fn from(e: &CliError) -> Self {
        let message = e.to_string();

        match &e.kind {
            CliErrorKind::Engine(_) if e.is_environment() => Self::Environment { message },
            CliErrorKind::Engine(_) => Self::Engine { message },
            CliErrorKind::Output(_) => Self::Output { message },
            CliErrorKind::ReadQueryFile { .. } => Self::ReadQueryFile { message },
            CliErrorKind::SetGlobalDefault(_) => Self::SetGlobalDefault { message },
        }
    }
}


#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CliStatus {
    Success,
    Error,
}

#[derive(Serialize)]
pub struct CliOutput {
    pub command: String,
    pub status: CliStatus,
    pub data: Vec<StatementReport>,
    pub error: Option<CliErrorJson>,
}

impl CliOutput {
    pub fn new(command: &str, data: Vec<StatementReport>, result: &Result<(), CliError>) -> Self {
        match result {
            Ok(()) => CliOutput {
                command: command.to_string(),
                status: CliStatus::Success,
                data,
                error: None,
            },
            Err(e) => CliOutput {
                command: command.to_string(),
                status: CliStatus::Error,
                data,
                error: Some(CliErrorJson::from(e)),
            },
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::Outcome;
    use crate::db::{EngineError, EngineErrorKind};

    #[test]
    fn error_serializes_with_its_type() {
        let err: CliError = EngineError {
            kind: EngineErrorKind::DriverNotInstalled { driver: "Impala".into(), available: vec![] },
        }.into();
        let json = serde_json::to_value(CliErrorJson::from(&err)).unwrap();

        assert_eq!(json["type"], "environment");
        assert!(json["message"].as_str().unwrap().contains("'Impala' is not installed"));
    }

    #[test]
    fn envelope_keeps_partial_data_on_error() {
        let err: CliError = EngineError {
            kind: EngineErrorKind::Server { sql: "SELECT x".into(), message: "Could not resolve column".into() },
        }.into();
        let data = vec![StatementReport { statement: "USE test_db".into(), outcome: Outcome::Done }];

        let output = CliOutput::new("query", data, &Err(err));
        let json = serde_json::to_value(&output).unwrap();

        assert_eq!(output.status, CliStatus::Error);
        assert_eq!(json["status"], "error");
        assert_eq!(json["data"][0]["statement"], "USE test_db");
        assert_eq!(json["error"]["type"], "engine");
    }

    #[test]
    fn successful_envelope_has_null_error() {
        let output = CliOutput::new("query", vec![], &Ok(()));
        let json = serde_json::to_string(&output).unwrap();

        assert_eq!(json, r#"{"command":"query","status":"success","data":[],"error":null}"#);
    }
}
