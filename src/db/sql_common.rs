//! Fixed statements issued by the tools.

pub const DEFAULT_MEM_LIMIT: &str = "128m";
pub const DEFAULT_MT_DOP: u32 = 1;

pub const TEST_DATABASE: &str = "test_db";
pub const TEST_TABLE: &str = "rbbn_test";

pub const CREATE_TEST_DATABASE: &str = "CREATE DATABASE IF NOT EXISTS test_db";
pub const USE_TEST_DATABASE: &str = "USE test_db";
pub const CREATE_TEST_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS rbbn_test (
        id INT,
        name STRING,
        value DOUBLE
    )
"#;
pub const QUERY_ROW_COUNT: &str = "SELECT COUNT(*) FROM rbbn_test";
pub const QUERY_TOTAL_ROWS: &str = "SELECT COUNT(*) AS total FROM rbbn_test";

/// The seed rows: (id, name, value).
pub const SEED_ROWS: [(i32, &str, f64); 5] = [
    (1, "Item 1", 10.5),
    (2, "Item 2", 20.3),
    (3, "Item 3", 30.7),
    (4, "Item 4", 40.1),
    (5, "Item 5", 50.9),
];

/// `SET MEM_LIMIT=...` for the current session.
pub fn set_mem_limit(limit: &str) -> String {
    format!("SET MEM_LIMIT={limit}")
}

/// `SET MT_DOP=...` for the current session.
pub fn set_mt_dop(dop: u32) -> String {
    format!("SET MT_DOP={dop}")
}

/// Single multi-row `INSERT` for [`SEED_ROWS`].
pub fn insert_seed_rows() -> String {
    let values = SEED_ROWS
        .iter()
        .map(|(id, name, value)| format!("({id}, '{name}', {value})"))
        .collect::<Vec<_>>()
        .join(",\n    ");

    format!("INSERT INTO {TEST_TABLE} VALUES\n    {values}")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_insert_lists_every_row_once() {
        let sql = insert_seed_rows();

        assert!(sql.starts_with("INSERT INTO rbbn_test VALUES"));
        assert!(sql.contains("(1, 'Item 1', 10.5)"));
        assert!(sql.contains("(5, 'Item 5', 50.9)"));
        assert_eq!(sql.matches('(').count(), SEED_ROWS.len());
    }

    #[test]
    fn session_options_render() {
        assert_eq!(set_mem_limit(DEFAULT_MEM_LIMIT), "SET MEM_LIMIT=128m");
        assert_eq!(set_mt_dop(DEFAULT_MT_DOP), "SET MT_DOP=1");
    }
}
