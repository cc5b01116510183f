//! CSV export parsing
//!
//! The export is a plain comma-delimited table: a header row followed by one
//! row per release. There is no quoting, so a comma always ends a cell. The
//! four change-list columns hold Python-style lists such as `['fix', 'docs']`
//! and are decoded by [`parse_list_field`].

use crate::models::{RawRecord, COLUMNS, LIST_COLUMNS};
use std::collections::HashMap;
use tracing::debug;

const BYTE_ORDER_MARK: char = '\u{feff}';
const LIST_SEPARATOR: &str = "', '";

/// Parse the full text of an export into records, in file order
pub fn parse_records(text: &str) -> Vec<RawRecord> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    let mut lines = text.lines();

    let headers: Vec<&str> = match lines.next() {
        Some(header_line) => header_line.split(',').map(str::trim).collect(),
        None => return Vec::new(),
    };

    let records: Vec<RawRecord> = lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_row(&headers, line))
        .collect();

    debug!(
        columns = headers.len(),
        records = records.len(),
        "Parsed release export"
    );
    records
}

fn parse_row(headers: &[&str], line: &str) -> RawRecord {
    let mut cells = line.split(',');
    let row: HashMap<&str, &str> = headers
        .iter()
        .map(|header| (*header, cells.next().unwrap_or("")))
        .collect();

    let text = |column: &str| row.get(column).map(|v| v.trim().to_string()).unwrap_or_default();
    let list = |column: &str| row.get(column).map(|v| parse_list_field(v)).unwrap_or_default();

    RawRecord {
        id: text("id"),
        repo: text("repo"),
        package_name: text("package_name"),
        version: text("version"),
        author: text("author"),
        published_at_kst: text("published_at_kst"),
        is_prerelease: text("is_prerelease"),
        is_draft: text("is_draft"),
        major_changes: list("major_changes"),
        minor_changes: list("minor_changes"),
        patch_changes: list("patch_changes"),
        other_changes: list("other_changes"),
        working_days: text("working_days"),
        year: text("year"),
        month: text("month"),
    }
}

/// Decode a bracketed list cell like `['a', 'b']`
///
/// Malformed input never fails; whatever survives splitting and trimming is kept.
pub fn parse_list_field(value: &str) -> Vec<String> {
    let value = value.trim();
    if value.is_empty() || value == "[]" {
        return Vec::new();
    }

    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .unwrap_or(value);

    inner
        .split(LIST_SEPARATOR)
        .map(|item| strip_quote_layer(item.trim()).trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn strip_quote_layer(item: &str) -> &str {
    let is_quote = |c: char| c == '\'' || c == '"';
    let item = item.strip_prefix(is_quote).unwrap_or(item);
    item.strip_suffix(is_quote).unwrap_or(item)
}

/// Render a list back into the bracketed form read by [`parse_list_field`]
pub fn format_list_field(items: &[String]) -> String {
    if items.is_empty() {
        return "[]".to_string();
    }
    let quoted: Vec<String> = items.iter().map(|item| format!("'{}'", item)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Serialize records with the canonical header
///
/// Values containing commas cannot be represented and will split into extra
/// cells when read back.
pub fn write_records(records: &[RawRecord]) -> String {
    let mut out = COLUMNS.join(",");
    out.push('\n');

    for record in records {
        let cells: Vec<String> = COLUMNS
            .iter()
            .map(|column| {
                if LIST_COLUMNS.contains(column) {
                    format_list_field(record.list(column).unwrap_or_default())
                } else {
                    record.scalar(column).unwrap_or_default().to_string()
                }
            })
            .collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_field_empty_forms() {
        assert!(parse_list_field("").is_empty());
        assert!(parse_list_field("[]").is_empty());
        assert!(parse_list_field("  [] ").is_empty());
        assert!(parse_list_field("['']").is_empty());
    }

    #[test]
    fn test_parse_list_field_items() {
        assert_eq!(parse_list_field("['fix']"), vec!["fix"]);
        assert_eq!(
            parse_list_field("['add login', 'drop node 16']"),
            vec!["add login", "drop node 16"]
        );
        assert_eq!(parse_list_field("[\"quoted\"]"), vec!["quoted"]);
    }

    #[test]
    fn test_parse_list_field_without_brackets() {
        assert_eq!(parse_list_field("'a', 'b'"), vec!["a", "b"]);
        assert_eq!(parse_list_field("plain"), vec!["plain"]);
    }

    #[test]
    fn test_format_list_field() {
        assert_eq!(format_list_field(&[]), "[]");
        assert_eq!(
            format_list_field(&["a".to_string(), "b".to_string()]),
            "['a', 'b']"
        );
    }

    #[test]
    fn test_parse_strips_bom_and_blank_lines() {
        let text = "\u{feff}id,repo\n1,app\n\n   \n2,lib\n";
        let records = parse_records(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "1");
        assert_eq!(records[1].repo, "lib");
    }

    #[test]
    fn test_missing_trailing_cells_are_empty() {
        let records = parse_records("id,repo,author\n7,app\n");
        assert_eq!(records[0].id, "7");
        assert_eq!(records[0].repo, "app");
        assert_eq!(records[0].author, "");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_records("").is_empty());
        assert!(parse_records("id,repo\n").is_empty());
    }
}
