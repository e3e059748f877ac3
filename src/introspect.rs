//! Read-only SQLite schema introspection
//!
//! Opens the database file with `mode=ro` so a prompt-generation run can
//! never write to the source database, then pulls the verbatim CREATE
//! statements from sqlite_master and the ordered column lists from
//! `PRAGMA table_info`.

use crate::error::{PromptError, PromptResult};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use tracing::{debug, warn};

/// A single column as declared in the table definition
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    pub name: String,
    pub declared_type: String,
}

/// One user table: its verbatim creation statement and ordered columns
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: String,
    pub create_sql: String,
    pub columns: Vec<ColumnInfo>,
}

/// Quote an identifier for embedding in a SQL statement.
///
/// Plain alphanumeric/underscore names pass through unchanged; anything else
/// is wrapped in double quotes with embedded quotes doubled.
pub fn quote_identifier(name: &str) -> String {
    let plain = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

/// Read-only handle on a SQLite database file
pub struct SchemaReader {
    pool: SqlitePool,
}

impl SchemaReader {
    /// Open `path` read-only. Fails if the file does not exist or is not a
    /// database SQLite can open.
    pub async fn open(path: &Path) -> PromptResult<Self> {
        if !path.is_file() {
            return Err(PromptError::InvalidPath(format!(
                "database file not found: {}",
                path.display()
            )));
        }

        let database_url = format!("sqlite://{}?mode=ro", path.display());
        debug!("[SchemaReader::open] Connecting to: {}", database_url);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&database_url)
            .await
            .map_err(|e| PromptError::ConnectionError(e.to_string()))?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// List user tables with their verbatim CREATE statements, in
    /// sqlite_master order. Internal `sqlite_*` tables are excluded.
    pub async fn tables(&self) -> PromptResult<Vec<(String, String)>> {
        let rows = sqlx::query(
            "SELECT name, sql FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        )
        .fetch_all(&self.pool)
        .await?;

        let tables: Vec<(String, String)> = rows
            .iter()
            .map(|row| {
                let name: String = row.get("name");
                let sql: Option<String> = row.try_get("sql").unwrap_or(None);
                (name, sql.unwrap_or_default())
            })
            .collect();

        debug!("[SchemaReader::tables] Found {} tables", tables.len());
        Ok(tables)
    }

    /// Ordered column list for one table via `PRAGMA table_info`.
    pub async fn columns(&self, table: &str) -> PromptResult<Vec<ColumnInfo>> {
        let query = format!("PRAGMA table_info({})", quote_identifier(table));
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        let columns: Vec<ColumnInfo> = rows
            .iter()
            .map(|row| ColumnInfo {
                name: row.get("name"),
                declared_type: row.get("type"),
            })
            .collect();

        if columns.is_empty() {
            return Err(PromptError::SchemaError(format!(
                "no columns reported for table '{table}'"
            )));
        }
        Ok(columns)
    }

    /// Full snapshot of every user table. A table whose columns cannot be
    /// introspected is reported and skipped; siblings continue.
    pub async fn snapshot(&self) -> PromptResult<Vec<TableSchema>> {
        let mut schemas = Vec::new();
        for (name, create_sql) in self.tables().await? {
            match self.columns(&name).await {
                Ok(columns) => schemas.push(TableSchema {
                    name,
                    create_sql,
                    columns,
                }),
                Err(e) => {
                    warn!(
                        "[SchemaReader::snapshot] Skipping table '{}': {}",
                        name, e
                    );
                }
            }
        }
        Ok(schemas)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
