//! Turning scraped grids into records.

use crate::dom::HtmlTable;
use crate::portal::{GENERAL_SUBJECT, SUBJECT_HEADERS};
use crate::types::{RowMap, SubjectTable};

/// Pair headers with cells. Headers without a cell are left out.
pub fn row_map(headers: &[String], cells: &[String]) -> RowMap {
    headers
        .iter()
        .zip(cells)
        .map(|(h, c)| (h.as_str(), c.as_str()))
        .collect()
}

/// All data rows of a table as row maps. Rows with no cells (spacers,
/// pager rows rendered as headers) are skipped.
pub fn rows(table: &HtmlTable) -> Vec<RowMap> {
    table
        .rows
        .iter()
        .filter(|cells| !cells.is_empty())
        .map(|cells| row_map(&table.headers, cells))
        .collect()
}

/// The header naming the subject, matched case-insensitively.
pub fn subject_header(headers: &[String]) -> Option<&str> {
    headers
        .iter()
        .find(|h| {
            let lower = h.to_lowercase();
            SUBJECT_HEADERS.iter().any(|variant| lower.contains(variant))
        })
        .map(String::as_str)
}

/// Group a table's rows by subject. Rows with no subject column, or a blank
/// subject, land under `"General"`.
pub fn group_by_subject(table: &HtmlTable) -> SubjectTable {
    let header = subject_header(&table.headers).map(str::to_string);
    let mut grouped = SubjectTable::new();
    for row in rows(table) {
        let subject = header
            .as_deref()
            .and_then(|h| row.get(h))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(GENERAL_SUBJECT)
            .to_string();
        grouped.entry(subject).or_default().push(row);
    }
    grouped
}

/// Percentage from a label like `"Overall: 82.5"`: the text after the first
/// `": "`. Missing, malformed, or blank labels give `"0"`.
pub fn parse_percentage(label: Option<&str>) -> String {
    label
        .and_then(|text| text.split_once(": "))
        .map(|(_, rest)| rest.trim())
        .filter(|value| !value.is_empty())
        .unwrap_or("0")
        .to_string()
}
