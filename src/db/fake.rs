//! Scripted in-memory engine for unit tests.
use super::{Engine, EngineError, EngineErrorKind, ResultSet};
use std::collections::HashMap;


enum Response {
    Rows(ResultSet),
    Fail(String),
}

#[derive(Default)]
pub struct FakeEngine {
    responses: HashMap<String, Response>,
    table_rows: Option<i64>,
    executed: Vec<String>,
}

fn normalize(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl FakeEngine {
    pub fn new() -> Self {
        FakeEngine::default()
    }

    /// Tracks a single table: `SELECT COUNT(*)` reports its size and every
    /// `INSERT ... VALUES` grows it by the number of tuples inserted.
    pub fn with_table_rows(mut self, rows: i64) -> Self {
        self.table_rows = Some(rows);
        self
    }

    pub fn respond(&mut self, sql: &str, columns: Vec<&str>, rows: Vec<Vec<&str>>) {
        let mut result = ResultSet::new(columns.into_iter().map(String::from).collect());
        for row in rows {
            result.push(
                row.into_iter()
                    .map(|cell| if cell == "NULL" { None } else { Some(cell.to_string()) })
                    .collect(),
            );
        }
        self.responses.insert(normalize(sql), Response::Rows(result));
    }

    pub fn fail(&mut self, sql: &str, message: &str) {
        self.responses.insert(normalize(sql), Response::Fail(message.to_string()));
    }

    pub fn executed(&self) -> Vec<&str> {
        self.executed.iter().map(String::as_str).collect()
    }
}

impl Engine for FakeEngine {
    fn execute(&mut self, sql: &str) -> Result<Option<ResultSet>, EngineError> {
        let sql = normalize(sql);
        self.executed.push(sql.clone());

        match self.responses.get(&sql) {
            Some(Response::Rows(result)) => return Ok(Some(result.clone())),
            Some(Response::Fail(message)) => {
                return Err(EngineError {
                    kind: EngineErrorKind::Server { sql, message: message.clone() },
                })
            }
            None => {}
        }

        let upper = sql.to_uppercase();
        if let Some(rows) = self.table_rows.as_mut() {
            if upper.starts_with("SELECT COUNT(*)") {
                let mut result = ResultSet::new(vec!["count(*)".into()]);
                result.push(vec![Some(rows.to_string())]);
                return Ok(Some(result));
            }
            if upper.starts_with("INSERT INTO") {
                if let Some((_, values)) = upper.split_once("VALUES") {
                    *rows += values.matches('(').count() as i64;
                }
            }
        }

        Ok(None)
    }
}
