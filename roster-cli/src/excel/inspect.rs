//! Structural summary of a workbook before it is trusted as a roster
//!
//! Used to answer "which sheet holds the data, what are its columns and how
//! complete is each one" and to dump the raw rows for manual review.

use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx, open_workbook};
use serde_json::{Map, Value};

use super::cells::{cell_text, cell_to_value, cell_type, header_name, is_missing};

/// Data rows shown per sheet
pub const PREVIEW_ROWS: usize = 5;

/// Overview of one sheet
#[derive(Debug, Clone)]
pub struct SheetSummary {
    pub name: String,
    /// Data rows, header excluded
    pub row_count: usize,
    pub columns: Vec<String>,
    /// Cell types found in each column, aligned with `columns`
    pub column_types: Vec<String>,
    /// First data rows as text, `None` for missing cells
    pub preview: Vec<Vec<Option<String>>>,
}

/// Non-null count for one column of the main sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnCount {
    pub name: String,
    pub non_null: usize,
    pub total: usize,
}

#[derive(Debug, Clone)]
pub struct WorkbookSummary {
    pub sheets: Vec<SheetSummary>,
    /// Sheet chosen as the participant data sheet
    pub main_sheet: String,
    pub columns: Vec<ColumnCount>,
    /// Every data row of the main sheet keyed by trimmed column name
    pub records: Vec<Map<String, Value>>,
}

/// Summarize every sheet and extract the rows of the main one
///
/// The main sheet is `preferred` when the workbook has it, otherwise the
/// first sheet whose name mentions "final" or "data", otherwise the first.
pub fn inspect_workbook<P: AsRef<Path>>(path: P, preferred: Option<&str>) -> Result<WorkbookSummary> {
    let path = path.as_ref();
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let main_sheet = choose_main_sheet(&sheet_names, preferred)
        .context("Excel file has no sheets")?;

    let mut sheets = Vec::with_capacity(sheet_names.len());
    let mut columns = Vec::new();
    let mut records = Vec::new();

    for sheet_name in &sheet_names {
        let range = workbook
            .worksheet_range(sheet_name)
            .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

        let rows: Vec<&[Data]> = range.rows().collect();
        let headers: Vec<String> = rows
            .first()
            .map(|h| column_names(h))
            .unwrap_or_default();
        let data_rows = rows.get(1..).unwrap_or_default();

        log::debug!("Sheet '{}': {} rows", sheet_name, data_rows.len());

        if *sheet_name == main_sheet {
            columns = count_non_null(&headers, data_rows);
            records = extract_records(&headers, data_rows);
        }

        sheets.push(SheetSummary {
            name: sheet_name.clone(),
            row_count: data_rows.len(),
            column_types: column_types(headers.len(), data_rows),
            preview: preview_rows(headers.len(), data_rows),
            columns: headers,
        });
    }

    Ok(WorkbookSummary {
        sheets,
        main_sheet,
        columns,
        records,
    })
}

fn choose_main_sheet(names: &[String], preferred: Option<&str>) -> Option<String> {
    if let Some(p) = preferred {
        if names.iter().any(|n| n == p) {
            return Some(p.to_string());
        }
    }
    names
        .iter()
        .find(|n| {
            let lower = n.to_lowercase();
            lower.contains("final") || lower.contains("data")
        })
        .or_else(|| names.first())
        .cloned()
}

/// Trimmed header names, with placeholders for blank header cells
fn column_names(header: &[Data]) -> Vec<String> {
    header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = header_name(cell);
            if name.is_empty() {
                format!("Unnamed: {}", i)
            } else {
                name
            }
        })
        .collect()
}

/// Distinct non-empty cell types per column, in order of first appearance
///
/// A column with no values at all reports "Empty".
fn column_types(width: usize, rows: &[&[Data]]) -> Vec<String> {
    (0..width)
        .map(|col| {
            let mut kinds: Vec<&str> = Vec::new();
            for cell in rows.iter().filter_map(|r| r.get(col)) {
                if is_missing(cell) && !matches!(cell, Data::Error(_)) {
                    continue;
                }
                let kind = cell_type(cell);
                if !kinds.contains(&kind) {
                    kinds.push(kind);
                }
            }
            if kinds.is_empty() {
                "Empty".to_string()
            } else {
                kinds.join("/")
            }
        })
        .collect()
}

fn preview_rows(width: usize, rows: &[&[Data]]) -> Vec<Vec<Option<String>>> {
    rows.iter()
        .take(PREVIEW_ROWS)
        .map(|row| (0..width).map(|col| row.get(col).and_then(cell_text)).collect())
        .collect()
}

fn count_non_null(headers: &[String], rows: &[&[Data]]) -> Vec<ColumnCount> {
    headers
        .iter()
        .enumerate()
        .map(|(col, name)| ColumnCount {
            name: name.clone(),
            non_null: rows
                .iter()
                .filter(|r| r.get(col).is_some_and(|c| !is_missing(c)))
                .count(),
            total: rows.len(),
        })
        .collect()
}

fn extract_records(headers: &[String], rows: &[&[Data]]) -> Vec<Map<String, Value>> {
    rows.iter()
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(col, name)| {
                    let value = row.get(col).map(cell_to_value).unwrap_or(Value::Null);
                    (name.clone(), value)
                })
                .collect()
        })
        .collect()
}
