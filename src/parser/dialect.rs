use sqlparser::dialect::{Dialect, HiveDialect};

const HIVE: HiveDialect = HiveDialect {};


/// Hive's lexical rules, plus backslash escapes inside string literals
/// (`'it\'s'`), which Impala accepts.
#[derive(Debug, Default)]
pub struct ImpalaDialect {}

impl Dialect for ImpalaDialect {
    fn is_delimited_identifier_start(&self, ch: char) -> bool {
        HIVE.is_delimited_identifier_start(ch)
    }

    fn is_identifier_start(&self, ch: char) -> bool {
        HIVE.is_identifier_start(ch)
    }

    fn is_identifier_part(&self, ch: char) -> bool {
        HIVE.is_identifier_part(ch)
    }

    fn supports_numeric_prefix(&self) -> bool {
        true
    }

    fn supports_string_literal_backslash_escape(&self) -> bool {
        true
    }
}

pub static DIALECT_IMPALA: ImpalaDialect = ImpalaDialect {};
