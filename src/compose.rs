//! Prompt document composition
//!
//! Merges the schema dump, the per-column sample annotations and the loaded
//! descriptions into the fixed templates. Composition is pure text work; all
//! database access happens upstream.

use crate::introspect::TableSchema;
use std::fmt::Write;

/// Samples and matched description for one column
#[derive(Debug, Clone)]
pub struct ColumnAnnotation {
    pub table: String,
    pub column: String,
    pub samples: Vec<String>,
    pub description: Option<String>,
}

/// Annotations for every column of one table, in declaration order
#[derive(Debug, Clone)]
pub struct TableAnnotations {
    pub table: String,
    pub columns: Vec<ColumnAnnotation>,
}

const SECTION_SEPARATOR: &str = "--------------------------------------------------";

/// Render the verbatim CREATE statements as the schema section.
pub fn schema_dump(tables: &[TableSchema]) -> String {
    let mut dump = String::new();
    for table in tables {
        writeln!(dump, "-- Table: {}", table.name).unwrap();
        writeln!(dump, "{};", table.create_sql).unwrap();
        writeln!(dump, "\n{SECTION_SEPARATOR}\n").unwrap();
    }
    dump
}

/// Flatten a multi-line description into one line for the annotation block.
pub fn flatten_description(description: &str) -> String {
    description
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the annotated-samples section.
///
/// A column with zero samples gets no line at all; a matched description is
/// appended in a warning-marked parenthetical.
pub fn annotation_block(tables: &[TableAnnotations]) -> String {
    let mut block = String::new();
    writeln!(block, "\n📊 Tables found: {}\n", tables.len()).unwrap();

    for table in tables {
        writeln!(block, " {}", table.table.to_uppercase()).unwrap();
        for column in &table.columns {
            if column.samples.is_empty() {
                continue;
            }
            write!(
                block,
                "  {}.{}: {}",
                column.table,
                column.column,
                column.samples.join(", ")
            )
            .unwrap();
            if let Some(description) = &column.description {
                write!(block, " (⚠️ {})", flatten_description(description)).unwrap();
            }
            writeln!(block).unwrap();
        }
        writeln!(block, "{SECTION_SEPARATOR}\n").unwrap();
    }
    block
}
