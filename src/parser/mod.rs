mod dialect;

use dialect::DIALECT_IMPALA;
use sqlparser::tokenizer::{Location, Token, TokenWithSpan, Tokenizer};


/// Splits a script into the statements it contains, in order.
///
/// Impala executes one statement per call, so a file such as
/// `USE test_db; SELECT * FROM rbbn_test;` has to be sent piecewise.
/// Statements keep their original text, minus the terminating `;`.
/// Fragments made only of whitespace and comments are dropped.
///
/// If the script cannot be tokenized it is returned whole: the server
/// decides what is valid SQL.
pub fn split_statements(sql: &str) -> Vec<String> {
    let tokens = match Tokenizer::new(&DIALECT_IMPALA, sql).tokenize_with_location() {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::debug!("Tokenizer failed, sending script as one statement: {e}");
            return whole(sql);
        }
    };

    let mut statements = vec![];
    let mut start = 0;
    let mut actionable = false;

    for TokenWithSpan { token, span } in tokens {
        match token {
            Token::SemiColon => {
                let Some(end) = byte_offset(sql, &span.start) else {
                    tracing::debug!("Lost track of token positions, sending script as one statement");
                    return whole(sql);
                };
                if actionable {
                    statements.push(sql[start..end].trim().to_string());
                }
                start = end + 1;
                actionable = false;
            }
            Token::Whitespace(_) | Token::EOF => {}
            _ => actionable = true,
        }
    }

    // The last statement may not end with a semicolon
    if actionable {
        statements.push(sql[start..].trim().to_string());
    }

    statements
}

fn whole(sql: &str) -> Vec<String> {
    let sql = sql.trim();
    if sql.is_empty() { vec![] } else { vec![sql.to_string()] }
}

/// Byte offset of a 1-based line/column (in chars) location.
fn byte_offset(sql: &str, location: &Location) -> Option<usize> {
    let line = usize::try_from(location.line).ok()?.checked_sub(1)?;
    let column = usize::try_from(location.column).ok()?.checked_sub(1)?;

    let mut line_start = 0;
    for (index, text) in sql.split_inclusive('\n').enumerate() {
        if index == line {
            return text
                .char_indices()
                .nth(column)
                .map(|(offset, _)| line_start + offset);
        }
        line_start += text.len();
    }

    None
}
