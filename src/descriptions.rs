//! Loading of operator-written column descriptions from CSV files
//!
//! Each CSV file in the chosen directory carries `original_column_name`,
//! `column_description` and `value_description` columns. The loader builds a
//! single map keyed by normalized column name; the key is not scoped per
//! table, so the same column name in two tables shares one description.

use crate::error::PromptResult;
use crate::normalize::normalize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Mapping from normalized column name to composed description text
pub type DescriptionMap = HashMap<String, String>;

/// Load descriptions from every `*.csv` file in `dir`.
///
/// A missing or non-directory path yields an empty map. Files that cannot be
/// read or parsed are skipped with a warning; rows parsed before the failure
/// are kept. When two rows produce the same normalized key, the later one
/// wins. Files are visited in name order so the outcome is deterministic.
pub fn load_descriptions(dir: &Path) -> DescriptionMap {
    let mut descriptions = DescriptionMap::new();

    if !dir.is_dir() {
        debug!(
            "[load_descriptions] Not a directory, returning empty map: {}",
            dir.display()
        );
        return descriptions;
    }

    let mut csv_files: Vec<_> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
            })
            .collect(),
        Err(e) => {
            warn!(
                "[load_descriptions] Could not list directory {}: {}",
                dir.display(),
                e
            );
            return descriptions;
        }
    };
    csv_files.sort();

    for path in csv_files {
        if let Err(e) = load_file(&path, &mut descriptions) {
            warn!(
                "[load_descriptions] Skipping file {}: {}",
                path.display(),
                e
            );
        }
    }

    debug!(
        "[load_descriptions] Loaded {} description entries from {}",
        descriptions.len(),
        dir.display()
    );
    descriptions
}

/// Parse one CSV file into the shared map.
///
/// Header lookup tolerates a leading UTF-8 byte-order mark; missing fields
/// are treated as empty strings.
fn load_file(path: &Path, descriptions: &mut DescriptionMap) -> PromptResult<()> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let headers = reader.headers()?.clone();
    let field_index = |name: &str| {
        headers
            .iter()
            .position(|header| header.trim_start_matches('\u{feff}').trim() == name)
    };
    let name_idx = field_index("original_column_name");
    let desc_idx = field_index("column_description");
    let value_idx = field_index("value_description");

    for record in reader.records() {
        let record = record?;
        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("");

        let column_name = field(name_idx);
        if column_name.is_empty() {
            continue;
        }

        let column_description = field(desc_idx).trim();
        let value_description = field(value_idx).trim();

        let full_description = match (column_description.is_empty(), value_description.is_empty()) {
            (false, false) => format!("{column_description} ({value_description})"),
            (false, true) => column_description.to_string(),
            (true, false) => value_description.to_string(),
            (true, true) => continue,
        };

        descriptions.insert(normalize(column_name), full_description);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_missing_directory_yields_empty_map() {
        let map = load_descriptions(Path::new("/nonexistent/description/folder"));
        assert!(map.is_empty());
    }

    #[test]
    fn test_load_and_compose_descriptions() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "orders.csv",
            "original_column_name,column_description,value_description\n\
             status,Order status,\"P = pending, S = shipped\"\n\
             total_amount,Total in euros,\n\
             notes,,Free-form operator notes\n",
        );

        let map = load_descriptions(dir.path());
        assert_eq!(
            map.get("status").unwrap(),
            "Order status (P = pending, S = shipped)"
        );
        assert_eq!(map.get("total amount").unwrap(), "Total in euros");
        assert_eq!(map.get("notes").unwrap(), "Free-form operator notes");
    }

    #[test]
    fn test_last_file_wins_on_duplicate_keys() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "a_first.csv",
            "original_column_name,column_description,value_description\n\
             status,First description,\n",
        );
        write_csv(
            dir.path(),
            "b_second.csv",
            "original_column_name,column_description,value_description\n\
             Status,Second description,\n",
        );

        let map = load_descriptions(dir.path());
        assert_eq!(map.get("status").unwrap(), "Second description");
    }

    #[test]
    fn test_bom_in_header_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "bom.csv",
            "\u{feff}original_column_name,column_description,value_description\n\
             city,City of residence,\n",
        );

        let map = load_descriptions(dir.path());
        assert_eq!(map.get("city").unwrap(), "City of residence");
    }

    #[test]
    fn test_malformed_file_does_not_poison_siblings() {
        let dir = tempfile::tempdir().unwrap();
        // Invalid UTF-8 makes the record unreadable; rows parsed before the
        // failure are kept, the rest of the file is skipped.
        fs::write(
            dir.path().join("bad.csv"),
            b"original_column_name,column_description,value_description\n\
              early,Parsed before failure,\n\
              broken,\xff\xfe,\n\
              late,Never reached,\n" as &[u8],
        )
        .unwrap();
        write_csv(
            dir.path(),
            "good.csv",
            "original_column_name,column_description,value_description\n\
             name,Customer name,\n",
        );

        let map = load_descriptions(dir.path());
        assert_eq!(map.get("name").unwrap(), "Customer name");
        assert_eq!(map.get("early").unwrap(), "Parsed before failure");
        assert!(!map.contains_key("late"));
    }

    #[test]
    fn test_rows_without_name_or_text_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "sparse.csv",
            "original_column_name,column_description,value_description\n\
             ,Orphan description,\n\
             empty_desc,,\n\
             kept,Kept description,\n",
        );

        let map = load_descriptions(dir.path());
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("kept").unwrap(), "Kept description");
    }
}
