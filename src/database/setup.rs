use anyhow::{Context, Result};
use log::info;

use super::connection::DbConn;

const SCHEMA: &str = include_str!("schema.sql");

/// Drop and recreate the players, games and pairings tables
pub fn reset_database(conn: &mut DbConn) -> Result<()> {
    let statements = schema_statements(SCHEMA);

    for statement in &statements {
        conn.execute(statement, [])
            .with_context(|| format!("Failed to apply schema statement `{}`", first_line(statement)))?;
    }

    info!("  → Recreated league tables ({} statements)", statements.len());
    Ok(())
}

fn schema_statements(sql: &str) -> Vec<&str> {
    sql.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn first_line(statement: &str) -> &str {
    statement.lines().next().unwrap_or(statement)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_drop_blanks() {
        let statements = schema_statements("CREATE TABLE a (x INT);\n\n;CREATE TABLE b (y INT);");
        assert_eq!(statements, vec!["CREATE TABLE a (x INT)", "CREATE TABLE b (y INT)"]);
    }

    #[test]
    fn test_embedded_schema_creates_every_table() {
        let statements = schema_statements(SCHEMA);

        for table in ["players", "games", "pairings"] {
            let create = format!("CREATE TABLE {} (", table);
            assert!(statements.iter().any(|s| s.starts_with(&create)), "{}", table);
        }
    }

    #[test]
    fn test_first_line_of_statement() {
        assert_eq!(first_line("CREATE TABLE a (\n    x INT\n)"), "CREATE TABLE a (");
    }
}
