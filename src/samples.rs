//! Randomized sample-value extraction
//!
//! Pulls a handful of representative values per column so a prompt can show
//! the downstream model what the data actually looks like. Values are
//! filtered twice: once in SQL (null, empty string and zero excluded) and
//! once host-side on the decoded value, guarding against driver-level type
//! coercion.

use crate::introspect::quote_identifier;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{Row, ValueRef};
use std::collections::HashSet;
use tracing::warn;

/// Row count for the widening pass when too few distinct values were found
const WIDEN_SCAN_LIMIT: usize = 100;

/// A decoded SQLite value, preserving the storage class
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl RawValue {
    /// Host-side validity predicate: null, zero and empty values are never
    /// presentable as examples.
    pub fn is_presentable(&self) -> bool {
        match self {
            RawValue::Null => false,
            RawValue::Integer(v) => *v != 0,
            RawValue::Real(v) => *v != 0.0,
            RawValue::Text(v) => !v.is_empty(),
            RawValue::Blob(v) => !v.is_empty(),
        }
    }

    /// Human-presentable form: text is trimmed and double-quoted, binary
    /// payloads collapse to a marker.
    pub fn format(&self) -> String {
        match self {
            RawValue::Null => "NULL".to_string(),
            RawValue::Integer(v) => v.to_string(),
            RawValue::Real(v) => v.to_string(),
            RawValue::Text(v) => format!("\"{}\"", v.trim()),
            RawValue::Blob(_) => "<BLOB>".to_string(),
        }
    }
}

/// Decode the first column of a row into a [`RawValue`].
///
/// SQLite is dynamically typed, so types are tried in order of likelihood,
/// mirroring how query results are decoded elsewhere in the sqlx ecosystem.
pub fn decode_value(row: &SqliteRow, index: usize) -> RawValue {
    if let Ok(value_ref) = row.try_get_raw(index) {
        if value_ref.is_null() {
            return RawValue::Null;
        }
    }
    if let Ok(v) = row.try_get::<i64, _>(index) {
        return RawValue::Integer(v);
    }
    if let Ok(v) = row.try_get::<f64, _>(index) {
        return RawValue::Real(v);
    }
    if let Ok(v) = row.try_get::<String, _>(index) {
        return RawValue::Text(v);
    }
    if let Ok(v) = row.try_get::<Vec<u8>, _>(index) {
        return RawValue::Blob(v);
    }
    RawValue::Null
}

/// Extractor bound to one open read-only database
pub struct SampleExtractor<'a> {
    pool: &'a SqlitePool,
    limit: usize,
}

impl<'a> SampleExtractor<'a> {
    pub fn new(pool: &'a SqlitePool, limit: usize) -> Self {
        Self { pool, limit }
    }

    /// SQL predicate excluding null, empty-string and zero values.
    fn base_filter(column: &str) -> String {
        let col = quote_identifier(column);
        format!("{col} IS NOT NULL AND {col} != '' AND {col} != 0")
    }

    /// Columns whose name ends in "id" additionally drop values that
    /// textually contain "ID", to keep opaque identifier codes out of the
    /// examples. SQLite's LIKE is a no-op match on non-text values, so
    /// numeric id columns pass through unchanged.
    fn id_suffix_filter(column: &str) -> Option<String> {
        if column.to_lowercase().ends_with("id") {
            Some(format!("{} NOT LIKE '%ID%'", quote_identifier(column)))
        } else {
            None
        }
    }

    /// Up to `limit` random presentable values for one column. Any query
    /// failure yields an empty set; sibling columns are unaffected.
    pub async fn random_samples(&self, table: &str, column: &str) -> Vec<String> {
        match self.fetch_random(table, column).await {
            Ok(samples) => samples,
            Err(e) => {
                warn!(
                    "[SampleExtractor::random_samples] Fetch failed for {}.{}: {}",
                    table, column, e
                );
                Vec::new()
            }
        }
    }

    async fn fetch_random(&self, table: &str, column: &str) -> Result<Vec<String>, sqlx::Error> {
        let mut query = format!(
            "SELECT {} FROM {} WHERE {}",
            quote_identifier(column),
            quote_identifier(table),
            Self::base_filter(column)
        );
        if let Some(filter) = Self::id_suffix_filter(column) {
            query.push_str(&format!(" AND {filter}"));
        }
        query.push_str(&format!(" ORDER BY RANDOM() LIMIT {}", self.limit));

        let rows = sqlx::query(&query).fetch_all(self.pool).await?;
        Ok(rows
            .iter()
            .map(|row| decode_value(row, 0))
            .filter(RawValue::is_presentable)
            .map(|value| value.format())
            .collect())
    }

    /// Up to `limit` distinct random presentable values. If the first pass
    /// finds fewer distinct formatted values than requested, one widening
    /// pass scans up to [`WIDEN_SCAN_LIMIT`] randomly ordered rows and keeps
    /// deduplicating until the limit is reached or the scan is exhausted.
    pub async fn distinct_samples(&self, table: &str, column: &str) -> Vec<String> {
        match self.fetch_distinct(table, column).await {
            Ok(samples) => samples,
            Err(e) => {
                warn!(
                    "[SampleExtractor::distinct_samples] Fetch failed for {}.{}: {}",
                    table, column, e
                );
                Vec::new()
            }
        }
    }

    async fn fetch_distinct(&self, table: &str, column: &str) -> Result<Vec<String>, sqlx::Error> {
        let mut query = format!(
            "SELECT DISTINCT {} FROM {} WHERE {}",
            quote_identifier(column),
            quote_identifier(table),
            Self::base_filter(column)
        );
        if let Some(filter) = Self::id_suffix_filter(column) {
            query.push_str(&format!(" AND {filter}"));
        }
        query.push_str(&format!(" ORDER BY RANDOM() LIMIT {}", self.limit));

        let rows = sqlx::query(&query).fetch_all(self.pool).await?;

        let mut seen = HashSet::new();
        let mut samples = Vec::new();
        Self::collect_distinct(&rows, self.limit, &mut seen, &mut samples);

        if samples.len() < self.limit {
            // Widening pass: larger random scan without DISTINCT or the
            // id-suffix filter, deduplicated host-side.
            let widen_query = format!(
                "SELECT {} FROM {} WHERE {} ORDER BY RANDOM() LIMIT {}",
                quote_identifier(column),
                quote_identifier(table),
                Self::base_filter(column),
                WIDEN_SCAN_LIMIT
            );
            let widen_rows = sqlx::query(&widen_query).fetch_all(self.pool).await?;
            Self::collect_distinct(&widen_rows, self.limit, &mut seen, &mut samples);
        }

        Ok(samples)
    }

    fn collect_distinct(
        rows: &[SqliteRow],
        limit: usize,
        seen: &mut HashSet<String>,
        samples: &mut Vec<String>,
    ) {
        for row in rows {
            if samples.len() >= limit {
                break;
            }
            let value = decode_value(row, 0);
            if !value.is_presentable() {
                continue;
            }
            let formatted = value.format();
            if seen.insert(formatted.clone()) {
                samples.push(formatted);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use sqlx::sqlite::SqlitePoolOptions;

    #[rstest]
    #[case(RawValue::Null, false)]
    #[case(RawValue::Integer(0), false)]
    #[case(RawValue::Integer(7), true)]
    #[case(RawValue::Real(0.0), false)]
    #[case(RawValue::Real(3.5), true)]
    #[case(RawValue::Text(String::new()), false)]
    #[case(RawValue::Text("x".into()), true)]
    #[case(RawValue::Blob(vec![]), false)]
    #[case(RawValue::Blob(vec![1]), true)]
    fn test_is_presentable(#[case] value: RawValue, #[case] expected: bool) {
        assert_eq!(value.is_presentable(), expected);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(RawValue::Null.format(), "NULL");
        assert_eq!(RawValue::Integer(42).format(), "42");
        assert_eq!(RawValue::Text("  Alice  ".into()).format(), "\"Alice\"");
        assert_eq!(RawValue::Blob(vec![0xde, 0xad]).format(), "<BLOB>");
    }

    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_samples_exclude_null_zero_and_empty() {
        let pool = memory_pool().await;
        sqlx::query("CREATE TABLE t (amount INTEGER)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO t VALUES (0), (NULL), (5)")
            .execute(&pool)
            .await
            .unwrap();

        let extractor = SampleExtractor::new(&pool, 10);
        let samples = extractor.random_samples("t", "amount").await;
        assert_eq!(samples, vec!["5"]);
    }

    #[tokio::test]
    async fn test_samples_respect_limit() {
        let pool = memory_pool().await;
        sqlx::query("CREATE TABLE t (name TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        for i in 1..=10 {
            sqlx::query("INSERT INTO t VALUES (?)")
                .bind(format!("name-{i}"))
                .execute(&pool)
                .await
                .unwrap();
        }

        let extractor = SampleExtractor::new(&pool, 2);
        let samples = extractor.random_samples("t", "name").await;
        assert_eq!(samples.len(), 2);
    }

    #[tokio::test]
    async fn test_id_suffix_heuristic_excludes_textual_ids() {
        let pool = memory_pool().await;
        sqlx::query("CREATE TABLE t (customer_id TEXT, amount TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO t VALUES ('ID123', 'ID123'), ('ID456', 'ID456')")
            .execute(&pool)
            .await
            .unwrap();

        let extractor = SampleExtractor::new(&pool, 5);
        // Column ends in "id": values containing "ID" are filtered out.
        let id_samples = extractor.random_samples("t", "customer_id").await;
        assert!(id_samples.is_empty());
        // Same values under a non-id column pass through.
        let amount_samples = extractor.random_samples("t", "amount").await;
        assert_eq!(amount_samples.len(), 2);
    }

    #[tokio::test]
    async fn test_distinct_samples_have_no_duplicates() {
        let pool = memory_pool().await;
        sqlx::query("CREATE TABLE t (status TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        for _ in 0..20 {
            sqlx::query("INSERT INTO t VALUES ('open'), ('closed')")
                .execute(&pool)
                .await
                .unwrap();
        }

        let extractor = SampleExtractor::new(&pool, 5);
        let samples = extractor.distinct_samples("t", "status").await;
        let unique: HashSet<_> = samples.iter().collect();
        assert_eq!(unique.len(), samples.len());
        assert_eq!(samples.len(), 2);
    }

    #[tokio::test]
    async fn test_widening_pass_fills_missing_distinct_values() {
        let pool = memory_pool().await;
        sqlx::query("CREATE TABLE t (status TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        // Five raw spellings are DISTINCT in SQL but collapse to two
        // formatted values, so the first pass always comes up short of the
        // limit and the widening scan supplies whatever is still missing.
        sqlx::query(
            "INSERT INTO t VALUES (' open'), ('open '), ('open'), ('closed '), ('closed')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let extractor = SampleExtractor::new(&pool, 3);
        let mut samples = extractor.distinct_samples("t", "status").await;
        samples.sort();
        assert_eq!(samples, vec!["\"closed\"", "\"open\""]);
    }

    #[tokio::test]
    async fn test_distinct_widening_relaxes_id_suffix_filter() {
        let pool = memory_pool().await;
        sqlx::query("CREATE TABLE t (ref_id TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO t VALUES ('ID-A'), ('ID-B')")
            .execute(&pool)
            .await
            .unwrap();

        let extractor = SampleExtractor::new(&pool, 2);
        // Non-distinct sampling keeps the id-suffix filter: nothing survives.
        let strict = extractor.random_samples("t", "ref_id").await;
        assert!(strict.is_empty());
        // The distinct first pass also finds nothing, but its widening scan
        // drops the id-suffix filter and the textual ID values reappear.
        let mut widened = extractor.distinct_samples("t", "ref_id").await;
        widened.sort();
        assert_eq!(widened, vec!["\"ID-A\"", "\"ID-B\""]);
    }

    #[tokio::test]
    async fn test_query_failure_yields_empty_set() {
        let pool = memory_pool().await;
        let extractor = SampleExtractor::new(&pool, 2);
        let samples = extractor.random_samples("missing_table", "col").await;
        assert!(samples.is_empty());
    }
}
