//! Excel export of reconciliation reports
//!
//! Produces a workbook with:
//! - Summary sheet with counts and verdict
//! - Discrepancies, one row per field mismatch
//! - Missing In DB rows ready for manual entry
//! - Missing In Excel extra store records

use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::*;

use super::report::Report;

/// Export a report to an Excel file
pub fn export_report_to_excel(report: &Report, title: &str, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    create_summary_sheet(&mut workbook, report, title)?;
    create_discrepancy_sheet(&mut workbook, report)?;
    create_missing_in_db_sheet(&mut workbook, report)?;
    create_missing_in_excel_sheet(&mut workbook, report)?;

    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;

    log::info!("Report exported to: {}", path.display());
    Ok(())
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White)
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str]) -> Result<()> {
    let format = header_format();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &format)?;
    }
    Ok(())
}

fn write_opt(sheet: &mut Worksheet, row: u32, col: u16, value: Option<&str>) -> Result<()> {
    if let Some(v) = value {
        sheet.write_string(row, col, v)?;
    }
    Ok(())
}

fn create_summary_sheet(workbook: &mut Workbook, report: &Report, title: &str) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Summary")?;

    let title_format = Format::new().set_bold().set_font_size(16);
    let bold_format = Format::new().set_bold();

    sheet.write_string_with_format(0, 0, title, &title_format)?;
    sheet.write_string(
        1,
        0,
        format!("Generated: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S")),
    )?;

    let summary = &report.summary;
    let rows: [(&str, usize); 6] = [
        ("Excel records", summary.excel_count),
        ("Database records", summary.database_count),
        ("Matching records", summary.matching),
        ("Records with discrepancies", summary.discrepancies),
        ("Missing in database", summary.missing_in_db),
        ("In database but not in Excel", summary.missing_in_excel),
    ];

    sheet.write_string_with_format(3, 0, "Metric", &bold_format)?;
    sheet.write_string_with_format(3, 1, "Value", &bold_format)?;
    for (i, (label, value)) in rows.iter().enumerate() {
        let row = 4 + i as u32;
        sheet.write_string(row, 0, *label)?;
        sheet.write_number(row, 1, *value as f64)?;
    }

    let verdict = if report.passed() { "PASSED" } else { "NEEDS ATTENTION" };
    sheet.write_string_with_format(11, 0, "Verdict", &bold_format)?;
    sheet.write_string(11, 1, verdict)?;

    sheet.set_column_width(0, 32)?;
    sheet.set_column_width(1, 18)?;
    Ok(())
}

fn create_discrepancy_sheet(workbook: &mut Workbook, report: &Report) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Discrepancies")?;
    write_headers(sheet, &["Badge", "Name", "Issue"])?;

    let mut row = 1u32;
    for d in &report.discrepancies {
        for issue in &d.issues {
            sheet.write_number(row, 0, d.badge as f64)?;
            write_opt(sheet, row, 1, d.name.as_deref())?;
            sheet.write_string(row, 2, issue.to_string())?;
            row += 1;
        }
    }

    sheet.set_column_width(1, 30)?;
    sheet.set_column_width(2, 60)?;
    Ok(())
}

fn create_missing_in_db_sheet(workbook: &mut Workbook, report: &Report) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Missing In DB")?;
    write_headers(
        sheet,
        &["Badge", "Name", "Age", "Blood Group", "Emergency Contact", "Photo"],
    )?;

    for (i, m) in report.missing_in_db.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_number(row, 0, m.badge as f64)?;
        write_opt(sheet, row, 1, m.name.as_deref())?;
        if let Some(age) = m.age {
            sheet.write_number(row, 2, age as f64)?;
        }
        write_opt(sheet, row, 3, m.blood_group.as_deref())?;
        write_opt(sheet, row, 4, m.emergency_contact.as_deref())?;
        write_opt(sheet, row, 5, m.photo.as_deref())?;
    }
    Ok(())
}

fn create_missing_in_excel_sheet(workbook: &mut Workbook, report: &Report) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Missing In Excel")?;
    write_headers(sheet, &["Badge", "Name"])?;

    for (i, m) in report.missing_in_excel.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_number(row, 0, m.badge as f64)?;
        write_opt(sheet, row, 1, m.name.as_deref())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::compare::{Field, FieldMismatch};
    use crate::reconcile::report::{Discrepancy, ExtraInStore};
    use calamine::{Data, Reader, Xlsx, open_workbook};

    #[test]
    fn test_export_round_trips_through_calamine() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");

        let mut report = Report::default();
        report.discrepancies.push(Discrepancy {
            badge: 12,
            name: Some("Twelve".to_string()),
            issues: vec![
                FieldMismatch {
                    field: Field::Age,
                    excel: Some("30".to_string()),
                    store: None,
                },
                FieldMismatch {
                    field: Field::EmergencyContact,
                    excel: Some("1".to_string()),
                    store: Some("2".to_string()),
                },
            ],
        });
        report.missing_in_excel.push(ExtraInStore {
            badge: 40,
            name: Some("Forty".to_string()),
        });
        report.summary.discrepancies = 1;
        report.summary.missing_in_excel = 1;

        export_report_to_excel(&report, "Test report", &path).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(
            workbook.sheet_names(),
            vec!["Summary", "Discrepancies", "Missing In DB", "Missing In Excel"]
        );

        let discrepancies = workbook.worksheet_range("Discrepancies").unwrap();
        let rows: Vec<_> = discrepancies.rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2][2], Data::String("Emergency: Excel='1' vs DB='2'".to_string()));

        let summary = workbook.worksheet_range("Summary").unwrap();
        assert_eq!(
            summary.get_value((11, 1)),
            Some(&Data::String("NEEDS ATTENTION".to_string()))
        );
    }
}
