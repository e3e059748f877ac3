//! Second-stage prompt chaining
//!
//! Takes the essential-columns listing produced by the stage-one analysis,
//! re-queries the database for clean distinct instances of just those
//! columns, and fills the SQL-generation template.

use crate::error::PromptResult;
use crate::introspect::{quote_identifier, SchemaReader};
use crate::samples::{decode_value, RawValue};
use crate::templates::SQL_GENERATION_V1;
use sqlx::sqlite::SqlitePool;
use std::collections::HashSet;
use std::fmt::Write;
use std::path::Path;
use tracing::{info, warn};

/// Cap on distinct instances kept per column
pub const DEFAULT_VALUE_CAP: usize = 20;

/// Parse an essential-columns listing into `(table, column)` pairs.
///
/// One `table.column` reference per line; surrounding whitespace and double
/// quotes are tolerated, lines without a dot are ignored, duplicates
/// collapse while input order is preserved.
pub fn parse_column_list(input: &str) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();

    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((table, column)) = line.split_once('.') else {
            continue;
        };
        let table = table.trim().trim_matches('"').to_string();
        let column = column.trim().trim_matches('"').to_string();
        if table.is_empty() || column.is_empty() {
            continue;
        }
        if seen.insert((table.clone(), column.clone())) {
            columns.push((table, column));
        }
    }
    columns
}

/// Clean distinct instances for one column, capped at `cap`.
///
/// Excludes NULL and empty strings in SQL, trims text host-side and drops
/// values that become empty after trimming. Ordered by the column itself so
/// the block is stable across runs.
async fn clean_instances(
    pool: &SqlitePool,
    table: &str,
    column: &str,
    cap: usize,
) -> Result<Vec<RawValue>, sqlx::Error> {
    let col = quote_identifier(column);
    let query = format!(
        "SELECT DISTINCT {col} FROM {} WHERE {col} IS NOT NULL AND {col} != '' ORDER BY {col}",
        quote_identifier(table)
    );
    let rows = sqlx::query(&query).fetch_all(pool).await?;

    let mut values = Vec::new();
    for row in &rows {
        if values.len() >= cap {
            break;
        }
        match decode_value(row, 0) {
            RawValue::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    values.push(RawValue::Text(trimmed.to_string()));
                }
            }
            RawValue::Null => {}
            other => values.push(other),
        }
    }
    Ok(values)
}

/// Render the per-column instances as a JSON-like block, one column per
/// line, strings double-quoted.
pub fn render_sample_block(data: &[(String, Vec<RawValue>)]) -> String {
    let mut block = String::from("{\n");
    for (index, (key, values)) in data.iter().enumerate() {
        let rendered: Vec<String> = values
            .iter()
            .map(|value| match value {
                RawValue::Text(text) => format!("\"{text}\""),
                RawValue::Integer(v) => v.to_string(),
                RawValue::Real(v) => v.to_string(),
                RawValue::Blob(_) => "\"<BLOB>\"".to_string(),
                RawValue::Null => "null".to_string(),
            })
            .collect();
        write!(block, "    \"{key}\": [{}]", rendered.join(", ")).unwrap();
        if index + 1 < data.len() {
            block.push(',');
        }
        block.push('\n');
    }
    block.push('}');
    block
}

/// Extract clean instances for every column named in the analysis listing.
///
/// Columns whose query fails are logged and skipped; columns with no valid
/// values are omitted from the block.
pub async fn extract_clean_instances(
    pool: &SqlitePool,
    analysis: &str,
    cap: usize,
) -> Vec<(String, Vec<RawValue>)> {
    let mut data = Vec::new();
    for (table, column) in parse_column_list(analysis) {
        match clean_instances(pool, &table, &column, cap).await {
            Ok(values) if !values.is_empty() => {
                data.push((format!("{table}.{column}"), values));
            }
            Ok(_) => {}
            Err(e) => {
                warn!(
                    "[extract_clean_instances] Skipping {}.{}: {}",
                    table, column, e
                );
            }
        }
    }
    data
}

/// Run the second stage: re-query the listed columns and compose the
/// SQL-generation prompt.
pub async fn run_chain(
    db_path: &Path,
    analysis: &str,
    question: &str,
    cap: usize,
) -> PromptResult<String> {
    let reader = SchemaReader::open(db_path).await?;
    let data = extract_clean_instances(reader.pool(), analysis, cap).await;
    reader.close().await;

    info!(
        "[run_chain] Extracted instances for {} of the listed columns",
        data.len()
    );

    let samples = render_sample_block(&data);
    Ok(SQL_GENERATION_V1.render(&[
        ("analysis", analysis),
        ("samples", &samples),
        ("question", question),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    #[test]
    fn test_parse_column_list() {
        let input = "orders.status\n \"orders\".\"total\" \nnot-a-reference\n\norders.status\n";
        let columns = parse_column_list(input);
        assert_eq!(
            columns,
            vec![
                ("orders".to_string(), "status".to_string()),
                ("orders".to_string(), "total".to_string()),
            ]
        );
    }

    #[test]
    fn test_render_sample_block() {
        let data = vec![
            (
                "orders.status".to_string(),
                vec![
                    RawValue::Text("open".to_string()),
                    RawValue::Text("shipped".to_string()),
                ],
            ),
            ("orders.total".to_string(), vec![RawValue::Integer(12)]),
        ];
        let block = render_sample_block(&data);
        assert_eq!(
            block,
            "{\n    \"orders.status\": [\"open\", \"shipped\"],\n    \"orders.total\": [12]\n}"
        );
    }

    #[tokio::test]
    async fn test_extract_clean_instances_skips_failures_and_empties() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query("CREATE TABLE orders (status TEXT, note TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO orders VALUES ('  open ', NULL), ('shipped', ''), ('open', NULL)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let analysis = "orders.status\norders.note\nmissing.column\n";
        let data = extract_clean_instances(&pool, analysis, DEFAULT_VALUE_CAP).await;

        // note has no valid values, missing.column fails: both omitted.
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].0, "orders.status");
        let values: Vec<&RawValue> = data[0].1.iter().collect();
        // DISTINCT sees '  open ' and 'open' as different, trim collapses
        // them only host-side, so both survive as trimmed entries.
        assert!(values.contains(&&RawValue::Text("open".to_string())));
        assert!(values.contains(&&RawValue::Text("shipped".to_string())));
    }

    #[tokio::test]
    async fn test_value_cap_is_enforced() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query("CREATE TABLE t (n INTEGER)")
            .execute(&pool)
            .await
            .unwrap();
        for i in 1..=30 {
            sqlx::query("INSERT INTO t VALUES (?)")
                .bind(i)
                .execute(&pool)
                .await
                .unwrap();
        }

        let data = extract_clean_instances(&pool, "t.n", 20).await;
        assert_eq!(data[0].1.len(), 20);
    }
}
