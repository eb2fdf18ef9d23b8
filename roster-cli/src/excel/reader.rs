//! Read participant rows from the roster sheet

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, Xlsx, open_workbook};

use super::cells::{cell_integer, cell_text, header_name, is_missing};

/// Column headers, matched after trimming
pub mod columns {
    pub const BADGE_NUMBER: &str = "Badge Number";
    pub const NAME: &str = "Name";
    pub const AGE: &str = "Age";
    pub const BLOOD_GROUP: &str = "Blood Group";
    pub const EMERGENCY_CONTACT: &str = "Emergency Contact Number";
    pub const PHOTO_LINK: &str = "Drive Photo Link";

    pub const ALL: [&str; 6] = [
        BADGE_NUMBER,
        NAME,
        AGE,
        BLOOD_GROUP,
        EMERGENCY_CONTACT,
        PHOTO_LINK,
    ];
}

/// One participant row as it appears in the workbook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    /// 1-based row number in the sheet, as Excel shows it
    pub row_number: usize,
    pub badge_number: u32,
    pub name: Option<String>,
    pub age: Option<i64>,
    pub blood_group: Option<String>,
    /// Digits of the emergency contact number
    pub emergency_contact: Option<String>,
    pub photo_uri: Option<String>,
}

/// All participant rows of a sheet, in sheet order
#[derive(Debug, Clone, Default)]
pub struct SourceSheet {
    pub sheet_name: String,
    pub rows: Vec<SourceRow>,
}

impl SourceSheet {
    /// Build a sheet from rows, rejecting duplicate badge numbers
    pub fn new(sheet_name: impl Into<String>, rows: Vec<SourceRow>) -> Result<Self> {
        let mut by_badge: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for row in &rows {
            by_badge
                .entry(row.badge_number)
                .or_default()
                .push(row.row_number);
        }

        let duplicates: Vec<String> = by_badge
            .iter()
            .filter(|(_, rows)| rows.len() > 1)
            .map(|(badge, rows)| {
                let rows: Vec<String> = rows.iter().map(|r| r.to_string()).collect();
                format!("{} (rows {})", badge, rows.join(", "))
            })
            .collect();
        if !duplicates.is_empty() {
            bail!("Duplicate badge numbers in workbook: {}", duplicates.join("; "));
        }

        Ok(Self {
            sheet_name: sheet_name.into(),
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn badge_numbers(&self) -> HashSet<u32> {
        self.rows.iter().map(|r| r.badge_number).collect()
    }
}

/// Read the participant rows of `sheet` from an Excel file
pub fn read_source_sheet<P: AsRef<Path>>(path: P, sheet: &str) -> Result<SourceSheet> {
    let path = path.as_ref();
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

    let range = workbook
        .worksheet_range(sheet)
        .with_context(|| format!("Failed to read sheet '{}' in {}", sheet, path.display()))?;

    let rows: Vec<&[Data]> = range.rows().collect();
    let Some((header, data_rows)) = rows.split_first() else {
        log::warn!("Sheet '{}' is empty", sheet);
        return SourceSheet::new(sheet, Vec::new());
    };

    let col = ColumnIndices::from_header(header)
        .with_context(|| format!("Unexpected layout in sheet '{}'", sheet))?;

    // The range starts at the first used cell, not necessarily A1
    let header_row = range.start().map_or(0, |(row, _)| row as usize) + 1;
    if header_row > 1 {
        log::debug!("Header of '{}' found on row {}", sheet, header_row);
    }

    let mut parsed = Vec::with_capacity(data_rows.len());
    for (idx, row) in data_rows.iter().enumerate() {
        let row_number = header_row + idx + 1;
        if row.iter().all(is_missing) {
            log::debug!("Skipping blank row {}", row_number);
            continue;
        }
        parsed.push(col.parse_row(row, row_number)?);
    }

    log::info!(
        "Read {} participant rows from '{}' in {}",
        parsed.len(),
        sheet,
        path.display()
    );

    SourceSheet::new(sheet, parsed)
}

static EMPTY_CELL: Data = Data::Empty;

struct ColumnIndices {
    badge: usize,
    name: usize,
    age: usize,
    blood: usize,
    emergency: usize,
    photo: usize,
}

impl ColumnIndices {
    fn from_header(header: &[Data]) -> Result<Self> {
        let names: Vec<String> = header.iter().map(header_name).collect();
        let by_name: HashMap<&str, usize> = names
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.is_empty())
            .map(|(i, n)| (n.as_str(), i))
            .collect();

        let missing: Vec<&str> = columns::ALL
            .iter()
            .copied()
            .filter(|c| !by_name.contains_key(c))
            .collect();
        if !missing.is_empty() {
            bail!(
                "Missing required columns: {} (found: {})",
                missing.join(", "),
                names.join(", ")
            );
        }

        Ok(Self {
            badge: by_name[columns::BADGE_NUMBER],
            name: by_name[columns::NAME],
            age: by_name[columns::AGE],
            blood: by_name[columns::BLOOD_GROUP],
            emergency: by_name[columns::EMERGENCY_CONTACT],
            photo: by_name[columns::PHOTO_LINK],
        })
    }

    fn parse_row(&self, row: &[Data], row_number: usize) -> Result<SourceRow> {
        let cell = |i: usize| row.get(i).unwrap_or(&EMPTY_CELL);

        let badge = match cell_integer(cell(self.badge)) {
            Ok(Some(b)) => u32::try_from(b).with_context(|| {
                format!("Row {}: badge number {} is out of range", row_number, b)
            })?,
            Ok(None) => bail!("Row {}: missing badge number", row_number),
            Err(text) => bail!("Row {}: badge number '{}' is not a number", row_number, text),
        };

        let age = cell_integer(cell(self.age)).unwrap_or_else(|text| {
            log::warn!("Row {}: ignoring non-numeric age '{}'", row_number, text);
            None
        });

        let emergency_contact = match cell_integer(cell(self.emergency)) {
            Ok(n) => n.map(|n| n.to_string()),
            Err(_) => cell_text(cell(self.emergency)),
        };

        Ok(SourceRow {
            row_number,
            badge_number: badge,
            name: cell_text(cell(self.name)),
            age,
            blood_group: cell_text(cell(self.blood)),
            emergency_contact,
            photo_uri: cell_text(cell(self.photo)),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    /// A row for building workbook fixtures
    pub struct FixtureRow<'a> {
        pub badge: f64,
        pub name: &'a str,
        pub age: Option<f64>,
        pub blood: Option<&'a str>,
        pub emergency: Option<f64>,
        pub photo: Option<&'a str>,
    }

    /// Write a roster workbook with padded headers, like the real export
    pub fn write_fixture(path: &Path, sheet: &str, rows: &[FixtureRow]) {
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        ws.set_name(sheet).unwrap();

        let headers = [
            " Badge Number",
            "Name ",
            "Age",
            "Blood Group  ",
            "Emergency Contact Number",
            "Drive Photo Link",
        ];
        for (c, h) in headers.iter().enumerate() {
            ws.write_string(0, c as u16, *h).unwrap();
        }

        for (i, r) in rows.iter().enumerate() {
            let row = (i + 1) as u32;
            ws.write_number(row, 0, r.badge).unwrap();
            ws.write_string(row, 1, r.name).unwrap();
            if let Some(age) = r.age {
                ws.write_number(row, 2, age).unwrap();
            }
            if let Some(blood) = r.blood {
                ws.write_string(row, 3, blood).unwrap();
            }
            if let Some(e) = r.emergency {
                ws.write_number(row, 4, e).unwrap();
            }
            if let Some(p) = r.photo {
                ws.write_string(row, 5, p).unwrap();
            }
        }

        workbook.save(path).unwrap();
    }

    #[test]
    fn test_read_source_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.xlsx");
        write_fixture(
            &path,
            "Sheet8",
            &[
                FixtureRow {
                    badge: 2.0,
                    name: " Beta Person ",
                    age: None,
                    blood: Some("A+"),
                    emergency: Some(9876543210.0),
                    photo: None,
                },
                FixtureRow {
                    badge: 1.0,
                    name: "Alpha",
                    age: Some(30.0),
                    blood: Some(" O+ "),
                    emergency: Some(111.0),
                    photo: Some("https://drive.example/a"),
                },
            ],
        );

        let sheet = read_source_sheet(&path, "Sheet8").unwrap();
        assert_eq!(sheet.len(), 2);

        let beta = &sheet.rows[0];
        assert_eq!(beta.row_number, 2);
        assert_eq!(beta.badge_number, 2);
        assert_eq!(beta.name.as_deref(), Some("Beta Person"));
        assert_eq!(beta.age, None);
        assert_eq!(beta.emergency_contact.as_deref(), Some("9876543210"));
        assert_eq!(beta.photo_uri, None);

        let alpha = &sheet.rows[1];
        assert_eq!(alpha.age, Some(30));
        assert_eq!(alpha.blood_group.as_deref(), Some("O+"));
        assert_eq!(alpha.photo_uri.as_deref(), Some("https://drive.example/a"));
    }

    #[test]
    fn test_missing_sheet_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.xlsx");
        write_fixture(&path, "Sheet1", &[]);

        assert!(read_source_sheet(&path, "Sheet8").is_err());
    }

    #[test]
    fn test_missing_columns_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.xlsx");
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        ws.set_name("Sheet8").unwrap();
        ws.write_string(0, 0, "Badge Number").unwrap();
        ws.write_string(0, 1, "Name").unwrap();
        ws.write_number(1, 0, 1.0).unwrap();
        workbook.save(&path).unwrap();

        let err = read_source_sheet(&path, "Sheet8").unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Missing required columns"));
        assert!(message.contains("Blood Group"));
    }

    #[test]
    fn test_duplicate_badges_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.xlsx");
        let row = |name: &'static str| FixtureRow {
            badge: 5.0,
            name,
            age: None,
            blood: None,
            emergency: None,
            photo: None,
        };
        write_fixture(&path, "Sheet8", &[row("A"), row("B")]);

        let err = read_source_sheet(&path, "Sheet8").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Duplicate badge numbers in workbook: 5 (rows 2, 3)"
        );
    }

    /// Header on row 3, badge and name only, below two empty rows
    fn write_offset_sheet(path: &Path, rows: &[(Option<f64>, &str)]) {
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        ws.set_name("Sheet8").unwrap();
        for (c, h) in columns::ALL.iter().enumerate() {
            ws.write_string(2, c as u16, *h).unwrap();
        }
        for (i, (badge, name)) in rows.iter().enumerate() {
            let row = (i + 3) as u32;
            if let Some(badge) = badge {
                ws.write_number(row, 0, *badge).unwrap();
            }
            ws.write_string(row, 1, *name).unwrap();
        }
        workbook.save(path).unwrap();
    }

    #[test]
    fn test_row_numbers_follow_sheet_offset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.xlsx");
        write_offset_sheet(&path, &[(Some(11.0), "First"), (Some(12.0), "Second")]);

        let sheet = read_source_sheet(&path, "Sheet8").unwrap();
        let numbers: Vec<usize> = sheet.rows.iter().map(|r| r.row_number).collect();
        assert_eq!(numbers, vec![4, 5]);
    }

    #[test]
    fn test_offset_sheet_errors_name_excel_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.xlsx");
        write_offset_sheet(&path, &[(None, "No Badge")]);

        let err = read_source_sheet(&path, "Sheet8").unwrap_err();
        assert!(err.to_string().contains("Row 4: missing badge number"));
    }

    #[test]
    fn test_missing_badge_names_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.xlsx");
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        ws.set_name("Sheet8").unwrap();
        for (c, h) in columns::ALL.iter().enumerate() {
            ws.write_string(0, c as u16, *h).unwrap();
        }
        ws.write_string(1, 1, "No Badge").unwrap();
        workbook.save(&path).unwrap();

        let err = read_source_sheet(&path, "Sheet8").unwrap_err();
        assert!(err.to_string().contains("Row 2: missing badge number"));
    }
}
