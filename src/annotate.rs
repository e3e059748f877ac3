//! In-place annotation of schema dump files
//!
//! Rewrites a plain-text schema dump, appending an inline `-- 'description'`
//! comment to every column-definition line whose normalized column name has
//! a loaded CSV description. The file is overwritten in place; the result
//! feeds the stage-one column-analysis prompt.

use crate::descriptions::DescriptionMap;
use crate::error::PromptResult;
use crate::normalize::normalize;
use regex::Regex;
use std::path::Path;
use tracing::info;

/// Lines that open a table or declare constraints are never annotated.
fn is_structural_line(line: &str) -> bool {
    let lowered = line.trim_start().to_lowercase();
    lowered.starts_with("create table")
        || lowered.starts_with("foreign key")
        || lowered.starts_with("primary key")
}

/// Append description comments to matching column-definition lines.
///
/// Returns the rewritten text and the number of lines annotated. Single
/// quotes inside descriptions are replaced with a typographic apostrophe so
/// the comment never closes its own quoting.
pub fn annotate_schema_text(schema: &str, descriptions: &DescriptionMap) -> (String, usize) {
    // A column definition: optionally quoted identifier, then a type token.
    let column_line =
        Regex::new(r#"^\s*("?[\w\s\[\]\-]+"?)\s+[\w()]+.*?,?\s*$"#).expect("static regex");

    let mut annotated = 0usize;
    let mut output = Vec::new();
    for line in schema.lines() {
        let mut rewritten = line.to_string();
        if !is_structural_line(line) {
            if let Some(captures) = column_line.captures(line) {
                let column_name = captures[1].trim_matches('"').trim();
                if let Some(description) = descriptions.get(&normalize(column_name)) {
                    let safe = description.replace('\'', "’");
                    rewritten = format!("{line} -- '{safe}'");
                    annotated += 1;
                }
            }
        }
        output.push(rewritten);
    }
    (output.join("\n"), annotated)
}

/// Annotate a schema dump file in place, returning how many lines were
/// annotated.
pub fn annotate_schema_file(path: &Path, descriptions: &DescriptionMap) -> PromptResult<usize> {
    let schema = std::fs::read_to_string(path)?;
    let (annotated_schema, count) = annotate_schema_text(&schema, descriptions);
    std::fs::write(path, annotated_schema)?;
    info!(
        "[annotate_schema_file] Annotated {} lines in {}",
        count,
        path.display()
    );
    Ok(count)
}
