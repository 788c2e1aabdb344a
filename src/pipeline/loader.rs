//! CSV input loading.

use crate::models::{InputConfig, Record, Result, UpdaterError};
use std::path::Path;
use tracing::info;

/// Load all records from a CSV file, in file order.
///
/// The file must have a header row containing the configured id and list
/// columns. Cell contents are not validated here: a short row loads with
/// empty cells and is left for the updater to skip. A row longer than the
/// header is malformed and fails the load.
pub fn load_records(path: &Path, input: &InputConfig) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| UpdaterError::input(path, e.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|e| UpdaterError::input(path, e.to_string()))?
        .clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| UpdaterError::input(path, format!("missing column '{name}'")))
    };
    let id_idx = column(&input.id_column)?;
    let list_idx = column(&input.list_column)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|e| UpdaterError::input(path, e.to_string()))?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        if row.len() > headers.len() {
            return Err(UpdaterError::input(
                path,
                format!(
                    "line {line}: found {} fields, but the header has {}",
                    row.len(),
                    headers.len()
                ),
            ));
        }
        records.push(Record::new(
            row.get(id_idx).unwrap_or_default().trim(),
            row.get(list_idx).unwrap_or_default(),
            line,
        ));
    }

    info!(count = records.len(), path = %path.display(), "Loaded records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("input.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_loads_rows_in_order() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "id,title,topics_list\n1,Dune,\"['sci-fi', 'desert']\"\n2,Emma,bad\n 3 ,Ulysses,\"['modernism']\"\n",
        );

        let records = load_records(&path, &InputConfig::default()).unwrap();
        assert_eq!(
            records,
            vec![
                Record::new("1", "['sci-fi', 'desert']", 2),
                Record::new("2", "bad", 3),
                Record::new("3", "['modernism']", 4),
            ]
        );
    }

    #[test]
    fn test_custom_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "book_id,ai_topics\n10,\"[\"\"a\"\"]\"\n");
        let input = InputConfig {
            id_column: "book_id".to_string(),
            list_column: "ai_topics".to_string(),
        };

        let records = load_records(&path, &input).unwrap();
        assert_eq!(records, vec![Record::new("10", r#"["a"]"#, 2)]);
    }

    #[test]
    fn test_empty_list_cell_is_kept() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "id,topics_list\n1,\n");
        let records = load_records(&path, &InputConfig::default()).unwrap();
        assert_eq!(records, vec![Record::new("1", "", 2)]);
    }

    #[test]
    fn test_missing_file_is_input_error() {
        let dir = TempDir::new().unwrap();
        let err = load_records(&dir.path().join("nope.csv"), &InputConfig::default()).unwrap_err();
        assert!(matches!(err, UpdaterError::Input { .. }));
    }

    #[test]
    fn test_missing_column_is_input_error() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "id,topics\n1,\"['a']\"\n");
        let err = load_records(&path, &InputConfig::default()).unwrap_err();
        assert!(
            matches!(err, UpdaterError::Input { ref reason, .. } if reason.contains("topics_list"))
        );
    }

    #[test]
    fn test_short_row_loads_with_empty_cells() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "id,title,topics_list\n1,Dune,\"['a']\"\n2,Emma\n3,Ulysses,\"['c']\"\n",
        );

        let records = load_records(&path, &InputConfig::default()).unwrap();
        assert_eq!(
            records,
            vec![
                Record::new("1", "['a']", 2),
                Record::new("2", "", 3),
                Record::new("3", "['c']", 4),
            ]
        );
    }

    #[test]
    fn test_long_row_is_input_error() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "id,topics_list\n1,\"['a']\",extra\n");
        let err = load_records(&path, &InputConfig::default()).unwrap_err();
        assert!(
            matches!(err, UpdaterError::Input { ref reason, .. } if reason.contains("line 2"))
        );
    }
}
