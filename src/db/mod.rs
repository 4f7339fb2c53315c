mod error;
mod odbc;
pub mod sql_common;
#[cfg(test)]
pub(crate) mod fake;

pub use error::{EngineError, EngineErrorKind};
pub use odbc::{AuthMechanism, ConnectionSettings, OdbcDriver, OdbcSession, DEFAULT_DRIVER};

use serde::Serialize;


/// A single statement executor bound to one Impala session.
///
/// Session state (`SET`, `USE`) persists between calls on the same value.
pub trait Engine {
    /// Runs `sql` and materialises its result.
    ///
    /// Returns `Ok(None)` when the statement produced no column metadata,
    /// which is the case for DDL and DML.
    fn execute(&mut self, sql: &str) -> Result<Option<ResultSet>, EngineError>;

    /// Runs `sql` and returns the first cell of the first row.
    fn fetch_one(&mut self, sql: &str) -> Result<Option<String>, EngineError> {
        let result = self.execute(sql)?.ok_or_else(|| EngineError {
            kind: EngineErrorKind::EmptyResult(sql.to_string()),
        })?;

        result
            .rows
            .into_iter()
            .next()
            .map(|row| row.into_iter().next().flatten())
            .ok_or_else(|| EngineError {
                kind: EngineErrorKind::EmptyResult(sql.to_string()),
            })
    }

    /// Runs a `COUNT(*)`-like query and parses its single value.
    fn fetch_count(&mut self, sql: &str) -> Result<i64, EngineError> {
        let value = self.fetch_one(sql)?.unwrap_or_default();

        value.trim().parse::<i64>().map_err(|_| EngineError {
            kind: EngineErrorKind::InvalidCount(value),
        })
    }
}

/// One result row, cells in column order. `None` is SQL NULL.
pub type Row = Vec<Option<String>>;

/// Column names and every row of a statement's result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>) -> Self {
        ResultSet { columns, rows: vec![] }
    }

    /// Appends a row, padding or truncating it to the column count.
    pub fn push(&mut self, mut row: Row) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Impala reports some successful statements as failures whose message says
/// there are no results to fetch. Those are not real errors.
pub fn is_no_results(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("no results") || message.contains("fetch results")
}
