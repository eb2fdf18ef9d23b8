//! `roster inspect`: sheet overview and raw row extract

use std::fs;

use anyhow::{Context, Result};
use colored::*;

use crate::cli::InspectArgs;
use crate::config::Config;
use crate::excel::{SheetSummary, inspect_workbook};

use super::{banner, pick};

pub fn handle_inspect_command(args: InspectArgs, config: &Config) -> Result<()> {
    let (path, sheet) = args.workbook.resolve(&config.workbook);
    let output = pick(&args.output, &config.inspect.output);

    let summary = inspect_workbook(&path, Some(sheet.as_str()))?;

    banner("WORKBOOK STRUCTURE");
    println!("File: {}", path.display().to_string().cyan());
    println!("Sheets: {}", summary.sheets.len());
    for s in &summary.sheets {
        println!();
        println!("{} ({} rows)", s.name.bold(), s.row_count);
        for line in column_lines(s) {
            println!("  {}", line);
        }
        if !s.preview.is_empty() {
            println!("  First {} rows:", s.preview.len());
            for row in &s.preview {
                println!("    {}", preview_line(row));
            }
        }
    }

    println!();
    banner(&format!("MAIN SHEET: {}", summary.main_sheet));
    for column in &summary.columns {
        println!(
            "  {:<30} {}/{} non-null",
            column.name, column.non_null, column.total
        );
    }

    let json = serde_json::to_string_pretty(&summary.records)
        .context("Failed to serialize extracted rows")?;
    fs::write(&output, json)
        .with_context(|| format!("Failed to write extract: {}", output.display()))?;

    println!();
    println!(
        "{} Extracted {} rows to {}",
        "✅".green(),
        summary.records.len(),
        output.display().to_string().cyan()
    );
    Ok(())
}

fn column_lines(sheet: &SheetSummary) -> Vec<String> {
    sheet
        .columns
        .iter()
        .zip(&sheet.column_types)
        .map(|(name, kind)| format!("{:<30} {}", name, kind))
        .collect()
}

fn preview_line(row: &[Option<String>]) -> String {
    row.iter()
        .map(|cell| cell.as_deref().unwrap_or("None"))
        .collect::<Vec<_>>()
        .join(" | ")
}
